// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mr_core::TaskId;

#[test]
fn dispatch_finished_without_an_active_stage_is_a_silent_no_op() {
    let state = ManagerState::new(WorkerAddr::new("localhost", 6000), None);
    state.dispatch_finished(TaskId(0), WorkerAddr::new("localhost", 6001));
}

#[tokio::test]
async fn dispatch_finished_reaches_the_open_completion_channel() {
    let state = ManagerState::new(WorkerAddr::new("localhost", 6000), None);
    let mut rx = state.open_completion_channel();
    state.dispatch_finished(TaskId(3), WorkerAddr::new("localhost", 6001));
    let (tid, addr) = rx.recv().await.expect("completion");
    assert_eq!(tid, TaskId(3));
    assert_eq!(addr, WorkerAddr::new("localhost", 6001));
    state.close_completion_channel();
}
