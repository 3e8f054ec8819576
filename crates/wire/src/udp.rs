// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! UDP heartbeat helpers. Heartbeats are unreliable by design — loss is a
//! liveness signal, not an error to recover from.

use crate::{Message, MAX_UDP_DATAGRAM};
use mr_core::WorkerAddr;
use tokio::net::UdpSocket;

/// Sends a `heartbeat` datagram to `manager_addr` identifying `worker_addr`.
/// Propagates I/O errors so the caller can log them; a dropped datagram is
/// not an error at this layer.
pub async fn send_heartbeat_udp(
    socket: &UdpSocket,
    manager_addr: &WorkerAddr,
    worker_addr: &WorkerAddr,
) -> std::io::Result<()> {
    let message = Message::Heartbeat {
        worker_host: worker_addr.host.clone(),
        worker_port: worker_addr.port,
    };
    let bytes = serde_json::to_vec(&message)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
    socket.send_to(&bytes, manager_addr.socket_addr_string()).await?;
    Ok(())
}

/// Receives one datagram (bounded to [`MAX_UDP_DATAGRAM`] bytes) and parses
/// it as a `Message`. Returns `None` on I/O error or malformed JSON, both
/// logged — never terminates the caller's loop.
pub async fn recv_udp(socket: &UdpSocket) -> Option<Message> {
    let mut buf = [0u8; MAX_UDP_DATAGRAM];
    let len = match socket.recv(&mut buf).await {
        Ok(len) => len,
        Err(err) => {
            tracing::warn!(error = %err, "udp recv failed");
            return None;
        }
    };
    match serde_json::from_slice(&buf[..len]) {
        Ok(message) => Some(message),
        Err(err) => {
            tracing::warn!(error = %err, "dropping malformed heartbeat");
            None
        }
    }
}

#[cfg(test)]
#[path = "udp_tests.rs"]
mod tests;
