// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mr_core::WorkerAddr;
use tokio::net::UdpSocket;

#[tokio::test(start_paused = true)]
async fn emits_heartbeats_on_the_configured_interval() {
    let manager_socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind manager");
    let manager_addr =
        WorkerAddr::new("127.0.0.1".to_string(), manager_socket.local_addr().unwrap().port());

    let worker_socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind worker");
    let self_addr =
        WorkerAddr::new("127.0.0.1".to_string(), worker_socket.local_addr().unwrap().port());

    let context = Arc::new(WorkerContext::new(self_addr, manager_addr));
    let runner = tokio::spawn(run(Arc::clone(&context), worker_socket));

    tokio::time::advance(HEARTBEAT_INTERVAL + std::time::Duration::from_millis(10)).await;
    let mut buf = [0u8; 4096];
    let (len, _) =
        tokio::time::timeout(std::time::Duration::from_secs(1), manager_socket.recv_from(&mut buf))
            .await
            .expect("timed out waiting for heartbeat")
            .expect("recv");
    let message: mr_wire::Message = serde_json::from_slice(&buf[..len]).expect("parse");
    assert!(matches!(message, mr_wire::Message::Heartbeat { .. }));

    context.shutdown.cancel();
    runner.await.expect("join");
}
