// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mr_core::{TaskId, WorkerAddr};

#[tokio::test(start_paused = true)]
async fn silent_busy_worker_is_declared_dead_and_its_task_replays() {
    let state = Arc::new(ManagerState::new(WorkerAddr::new("localhost", 7000), None));
    let worker_addr = WorkerAddr::new("localhost", 6001);
    state.registry.lock().register(worker_addr.clone());
    let popped = state.registry.lock().pop_ready().expect("ready worker");
    state.registry.lock().mark_busy(&popped, TaskId(4));

    let monitor = tokio::spawn(run(Arc::clone(&state)));
    for _ in 0..MISSED_HEARTBEAT_LIMIT {
        tokio::time::advance(HEARTBEAT_INTERVAL).await;
    }
    // give the just-ticked iteration a chance to run
    tokio::task::yield_now().await;

    assert_eq!(state.registry.lock().state_of(&worker_addr), Some(mr_core::WorkerState::Dead));
    assert_eq!(state.replay.lock().pop_front(), Some(TaskId(4)));

    state.shutdown.cancel();
    monitor.await.expect("monitor task");
}

#[tokio::test(start_paused = true)]
async fn heartbeats_received_in_between_keep_a_worker_alive() {
    let state = Arc::new(ManagerState::new(WorkerAddr::new("localhost", 7000), None));
    let worker_addr = WorkerAddr::new("localhost", 6002);
    state.registry.lock().register(worker_addr.clone());

    let monitor = tokio::spawn(run(Arc::clone(&state)));
    for _ in 0..(MISSED_HEARTBEAT_LIMIT - 1) {
        tokio::time::advance(HEARTBEAT_INTERVAL).await;
        state.registry.lock().record_heartbeat(&worker_addr);
    }
    tokio::task::yield_now().await;

    assert_eq!(state.registry.lock().state_of(&worker_addr), Some(mr_core::WorkerState::Ready));

    state.shutdown.cancel();
    monitor.await.expect("monitor task");
}
