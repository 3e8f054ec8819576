// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn send_heartbeat_udp_then_recv_udp_round_trips() {
    let manager_socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind manager");
    let manager_addr_str = manager_socket.local_addr().expect("local_addr").to_string();
    let (host, port) = manager_addr_str.rsplit_once(':').expect("host:port");
    let manager_addr = WorkerAddr::new(host, port.parse().expect("port"));

    let worker_socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind worker");
    let worker_addr =
        WorkerAddr::new("127.0.0.1", worker_socket.local_addr().expect("local_addr").port());

    send_heartbeat_udp(&worker_socket, &manager_addr, &worker_addr).await.expect("send");

    let received = recv_udp(&manager_socket).await;
    assert_eq!(
        received,
        Some(Message::Heartbeat {
            worker_host: worker_addr.host.clone(),
            worker_port: worker_addr.port,
        })
    );
}

#[tokio::test]
async fn recv_udp_returns_none_on_malformed_datagram() {
    let manager_socket = UdpSocket::bind("127.0.0.1:0").await.expect("bind manager");
    let manager_addr = manager_socket.local_addr().expect("local_addr");

    let sender = UdpSocket::bind("127.0.0.1:0").await.expect("bind sender");
    sender.send_to(b"not json", manager_addr).await.expect("send");

    let received = recv_udp(&manager_socket).await;
    assert_eq!(received, None);
}
