// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Message Transport for the Manager↔Worker control plane.
//!
//! Wire format: one `serde_json`-encoded [`Message`] per TCP connection
//! body. The sender writes the bytes and shuts down the write half; the
//! receiver reads to EOF and parses. No length prefix — each connection
//! carries exactly one message, so framing by EOF is sufficient.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod message;
mod tcp;
mod udp;

pub use message::Message;
pub use tcp::{connect_and_send, read_one_message};
pub use udp::{recv_udp, send_heartbeat_udp};

/// Datagrams larger than this are truncated by the kernel before we ever
/// see them; heartbeats are small enough that anything bigger is noise.
pub const MAX_UDP_DATAGRAM: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("connection closed before a complete message was read")]
    ConnectionClosed,
}
