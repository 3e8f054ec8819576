// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat Monitor: every [`HEARTBEAT_INTERVAL`], ages every non-Dead
//! worker's missed-heartbeat counter and declares it Dead at
//! [`MISSED_HEARTBEAT_LIMIT`].

use crate::state::{ManagerState, HEARTBEAT_INTERVAL, MISSED_HEARTBEAT_LIMIT};
use std::sync::Arc;

pub async fn run(state: Arc<ManagerState>) {
    let mut ticker = tokio::time::interval(HEARTBEAT_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = state.shutdown.cancelled() => return,
        }

        let newly_dead = state.registry.lock().age_heartbeats(MISSED_HEARTBEAT_LIMIT);
        for (addr, orphaned_task) in newly_dead {
            tracing::warn!(%addr, "worker declared dead: missed heartbeat limit reached");
            if let Some(task_id) = orphaned_task {
                state.replay.lock().push_back(task_id);
            }
        }
    }
}

#[cfg(test)]
#[path = "heartbeat_monitor_tests.rs"]
mod tests;
