// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP control-channel helpers: one `Message` per connection, framed by
//! EOF rather than a length prefix.

use crate::Message;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Connects to `addr`, writes `message` as JSON, then shuts down the write
/// half so the peer sees EOF. Returns `false` on any connect/write
/// failure — callers use that to mark the peer dead rather than
/// propagating the error.
pub async fn connect_and_send(addr: &str, message: &Message) -> bool {
    match try_connect_and_send(addr, message).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(%addr, error = %err, "failed to deliver message");
            false
        }
    }
}

async fn try_connect_and_send(addr: &str, message: &Message) -> Result<(), crate::ProtocolError> {
    let mut stream = TcpStream::connect(addr).await?;
    let bytes = serde_json::to_vec(message)?;
    stream.write_all(&bytes).await?;
    stream.shutdown().await?;
    Ok(())
}

/// Reads a connection to EOF and parses one `Message`. Returns `None` on
/// I/O error, a connection closed before any bytes arrived, or malformed
/// JSON (all logged) — the caller's accept loop keeps running either way.
pub async fn read_one_message(stream: &mut TcpStream) -> Option<Message> {
    match try_read_one_message(stream).await {
        Ok(message) => Some(message),
        Err(err) => {
            tracing::warn!(error = %err, "dropping connection");
            None
        }
    }
}

async fn try_read_one_message(stream: &mut TcpStream) -> Result<Message, crate::ProtocolError> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await?;
    if buf.is_empty() {
        return Err(crate::ProtocolError::ConnectionClosed);
    }
    Ok(serde_json::from_slice(&buf)?)
}

#[cfg(test)]
#[path = "tcp_tests.rs"]
mod tests;
