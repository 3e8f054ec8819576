// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat emitter: sends a UDP `heartbeat` to the Manager on a fixed
//! interval until the shutdown token fires.

use crate::state::{WorkerContext, HEARTBEAT_INTERVAL};
use std::sync::Arc;
use tokio::net::UdpSocket;

pub async fn run(context: Arc<WorkerContext>, socket: UdpSocket) {
    let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        tokio::select! {
            _ = context.shutdown.cancelled() => return,
            _ = ticker.tick() => {
                if let Err(err) =
                    mr_wire::send_heartbeat_udp(&socket, &context.manager_addr, &context.self_addr).await
                {
                    tracing::warn!(error = %err, "failed to send heartbeat");
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_tests.rs"]
mod tests;
