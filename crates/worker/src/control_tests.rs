// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mr_core::WorkerAddr;
use std::os::unix::fs::PermissionsExt;
use tokio::net::TcpListener;

fn write_script(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write script");
    let mut perms = std::fs::metadata(&path).expect("metadata").permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod");
    path
}

async fn spawn_manager_stub(expect_finished_task: Option<u32>) -> WorkerAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let message = mr_wire::read_one_message(&mut stream).await;
        match (expect_finished_task, message) {
            (Some(expected), Some(Message::Finished { task_id, .. })) => {
                assert_eq!(task_id.0, expected);
            }
            (None, Some(Message::Register { .. })) => {}
            (_, other) => panic!("unexpected message on manager stub: {other:?}"),
        }
    });
    WorkerAddr::new("127.0.0.1".to_string(), addr.port())
}

#[tokio::test]
async fn register_sends_a_register_message() {
    let manager_addr = spawn_manager_stub(None).await;
    let context = WorkerContext::new(WorkerAddr::new("127.0.0.1", 9000), manager_addr);
    assert!(register(&context).await);
}

#[tokio::test]
async fn register_fails_when_manager_is_unreachable() {
    let context = WorkerContext::new(
        WorkerAddr::new("127.0.0.1", 9000),
        WorkerAddr::new("127.0.0.1", 1),
    );
    assert!(!register(&context).await);
}

#[tokio::test]
async fn await_register_ack_accepts_a_matching_message() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");

    let sender = tokio::spawn(async move {
        let ack = Message::RegisterAck { worker_host: "127.0.0.1".into(), worker_port: 9000 };
        mr_wire::connect_and_send(&format!("127.0.0.1:{}", addr.port()), &ack).await
    });

    assert!(await_register_ack(&listener).await);
    assert!(sender.await.expect("join"));
}

#[tokio::test]
async fn successful_map_task_reports_finished() {
    let manager_addr = spawn_manager_stub(Some(7)).await;
    let context =
        Arc::new(WorkerContext::new(WorkerAddr::new("127.0.0.1", 9001), manager_addr));

    let mapper_dir = tempfile::tempdir().expect("mapper dir");
    let mapper = write_script(mapper_dir.path(), "mapper.sh", "cat");
    let output_dir = tempfile::tempdir().expect("output dir");

    let task = Task {
        id: TaskId(7),
        stage: Stage::Map,
        input_paths: vec![],
        executable: mapper,
        output_directory: output_dir.path().to_path_buf(),
        num_partitions: Some(1),
    };

    run_task(&context, task).await;
    assert!(!context.shutdown.is_cancelled());
}

#[tokio::test]
async fn failed_task_cancels_the_shutdown_token_and_sends_nothing() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub");
    let addr = listener.local_addr().expect("local addr");
    let manager_addr = WorkerAddr::new("127.0.0.1".to_string(), addr.port());
    let context =
        Arc::new(WorkerContext::new(WorkerAddr::new("127.0.0.1", 9002), manager_addr));

    // the stub never accepts, so any attempt to send `finished` would hang;
    // a failed task must shut down without trying.
    drop(listener);

    let mapper_dir = tempfile::tempdir().expect("mapper dir");
    let mapper = write_script(mapper_dir.path(), "mapper.sh", "exit 1");
    let input_path = mapper_dir.path().join("input01");
    std::fs::write(&input_path, "a\tb\n").expect("write input");
    let output_dir = tempfile::tempdir().expect("output dir");

    let task = Task {
        id: TaskId(8),
        stage: Stage::Map,
        input_paths: vec![input_path],
        executable: mapper,
        output_directory: output_dir.path().to_path_buf(),
        num_partitions: Some(1),
    };

    run_task(&context, task).await;
    assert!(context.shutdown.is_cancelled());
}
