// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide Manager state, shared across the control loop, scheduler,
//! and heartbeat monitor tasks behind a single mutex per piece of mutable
//! state (per the concurrency model: one lock around the registry, plus
//! the job queue and replay queue each behind their own).

use crate::registry::WorkerRegistry;
use mr_core::{JobIdGen, JobSpec, TaskId, WorkerAddr};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How many missed heartbeats before a Worker is declared Dead.
pub const MISSED_HEARTBEAT_LIMIT: u32 = 5;
/// Period between heartbeat monitor sweeps and heartbeat emissions.
pub const HEARTBEAT_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);
/// Idle backoff when the scheduler has no Ready worker or no task to hand out.
pub const SCHEDULER_IDLE_BACKOFF: std::time::Duration = std::time::Duration::from_millis(100);
/// Accept/recv timeout for the Manager's TCP and UDP servers.
pub const SERVER_ACCEPT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(1);

pub struct ManagerState {
    pub registry: Mutex<WorkerRegistry>,
    pub job_queue: Mutex<VecDeque<JobSpec>>,
    pub replay: Mutex<VecDeque<TaskId>>,
    /// Set by the scheduler for the duration of one stage; the control
    /// loop forwards `finished` messages here. `None` when no stage is
    /// currently executing.
    completions: Mutex<Option<mpsc::UnboundedSender<(TaskId, WorkerAddr)>>>,
    pub job_id_gen: JobIdGen,
    pub manager_addr: WorkerAddr,
    pub shared_dir: Option<PathBuf>,
    pub shutdown: CancellationToken,
}

impl ManagerState {
    pub fn new(manager_addr: WorkerAddr, shared_dir: Option<PathBuf>) -> Self {
        Self {
            registry: Mutex::new(WorkerRegistry::new()),
            job_queue: Mutex::new(VecDeque::new()),
            replay: Mutex::new(VecDeque::new()),
            completions: Mutex::new(None),
            job_id_gen: JobIdGen::new(),
            manager_addr,
            shared_dir,
            shutdown: CancellationToken::new(),
        }
    }

    /// Forwards a `finished(task_id, worker_addr)` report to whichever
    /// stage is currently running. Dropped silently if no stage is active.
    pub fn dispatch_finished(&self, task_id: TaskId, worker_addr: WorkerAddr) {
        if let Some(tx) = self.completions.lock().as_ref() {
            let _ = tx.send((task_id, worker_addr));
        }
    }

    /// Installs a fresh completion channel for the stage about to run and
    /// returns the receiving half.
    pub(crate) fn open_completion_channel(&self) -> mpsc::UnboundedReceiver<(TaskId, WorkerAddr)> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.completions.lock() = Some(tx);
        rx
    }

    pub(crate) fn close_completion_channel(&self) {
        *self.completions.lock() = None;
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
