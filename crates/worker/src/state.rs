// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide Worker state: this worker's own address, the Manager's
//! address, and the cancellation token the control loop and heartbeat
//! emitter both observe.

use mr_core::WorkerAddr;
use tokio_util::sync::CancellationToken;

/// Period between heartbeat emissions.
pub const HEARTBEAT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);
/// Accept timeout for the Worker's dispatch loop.
pub const SERVER_ACCEPT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(1);

pub struct WorkerContext {
    pub self_addr: WorkerAddr,
    pub manager_addr: WorkerAddr,
    pub shutdown: CancellationToken,
}

impl WorkerContext {
    pub fn new(self_addr: WorkerAddr, manager_addr: WorkerAddr) -> Self {
        Self { self_addr, manager_addr, shutdown: CancellationToken::new() }
    }
}
