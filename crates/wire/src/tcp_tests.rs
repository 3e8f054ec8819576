// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tokio::net::TcpListener;

#[tokio::test]
async fn connect_and_send_then_read_one_message_round_trips() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr").to_string();

    let sent = Message::Register { worker_host: "127.0.0.1".into(), worker_port: 6001 };
    let sent_clone = sent.clone();
    let sender = tokio::spawn(async move { connect_and_send(&addr, &sent_clone).await });

    let (mut stream, _) = listener.accept().await.expect("accept");
    let received = read_one_message(&mut stream).await;

    assert!(sender.await.expect("sender task"));
    assert_eq!(received, Some(sent));
}

#[tokio::test]
async fn connect_and_send_returns_false_when_nothing_is_listening() {
    let msg = Message::Shutdown;
    let ok = connect_and_send("127.0.0.1:1", &msg).await;
    assert!(!ok);
}

#[tokio::test]
async fn read_one_message_returns_none_on_malformed_json() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr").to_string();

    let writer = tokio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.expect("connect");
        stream.write_all(b"not json").await.expect("write");
        stream.shutdown().await.expect("shutdown");
    });

    let (mut stream, _) = listener.accept().await.expect("accept");
    let received = read_one_message(&mut stream).await;

    writer.await.expect("writer task");
    assert_eq!(received, None);
}

#[tokio::test]
async fn read_one_message_returns_none_on_empty_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local_addr").to_string();

    let writer = tokio::spawn(async move {
        let mut stream = TcpStream::connect(addr).await.expect("connect");
        stream.shutdown().await.expect("shutdown");
    });

    let (mut stream, _) = listener.accept().await.expect("accept");
    let received = read_one_message(&mut stream).await;

    writer.await.expect("writer task");
    assert_eq!(received, None);
}
