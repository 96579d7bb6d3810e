// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error types and the gateway status-code table.

use thiserror::Error;

/// Result type for gateway client operations.
pub type ApnsResult<T> = Result<T, ApnsError>;

/// Errors surfaced by the gateway client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApnsError {
    /// Configuration rejected at construction; the client is not built.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    /// Device token failed hex or length validation. No socket I/O happened.
    #[error("invalid device token: {0}")]
    InvalidToken(String),

    /// Extra payload data used the reserved `aps` key.
    #[error("extra data must not contain the reserved key \"aps\"")]
    ReservedKey,

    /// TCP connect, name resolution, or TLS handshake failure.
    #[error("connect failed: {0}")]
    ConnectFailed(String),

    /// Operation attempted on a channel without a live socket.
    #[error("transport not connected")]
    NotConnected,

    /// The transport did not accept the whole frame.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// Transport failure while polling or reading.
    #[error("read failed: {0}")]
    ReadFailed(String),

    /// The gateway answered a nonzero status for a notification.
    #[error("gateway rejected notification: {reason} (status {code})")]
    GatewayRejected { code: u8, reason: &'static str },

    /// A frame did not match its fixed wire size.
    #[error("malformed frame: {0}")]
    Malformed(String),

    /// Payload serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Human-readable reason for a gateway status code.
///
/// The table matches the service's documented codes. Undefined codes share
/// the wording of code 255 instead of failing.
pub fn status_reason(code: u8) -> &'static str {
    match code {
        0 => "No errors encountered",
        1 => "Processing error",
        2 => "Missing device token",
        3 => "Missing topic",
        4 => "Missing payload",
        5 => "Invalid token size",
        6 => "Invalid topic size",
        7 => "Invalid payload size",
        8 => "Invalid token",
        // 255 is the service's explicit "unknown"; anything undocumented
        // gets the same text.
        _ => "None (unknown)",
    }
}
