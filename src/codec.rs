// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Binary wire codec for gateway frames.
//!
//! Two push frame layouts go out; two fixed-size layouts come back: 6-byte
//! status responses on the push socket and 38-byte records on the feedback
//! socket. All multi-byte integers are big-endian.

use crate::error::{ApnsError, ApnsResult};
use crate::token::{DeviceToken, TOKEN_LEN};

/// Command byte of a simple push frame.
pub const SIMPLE_COMMAND: u8 = 0;
/// Command byte of an extended push frame.
pub const EXTENDED_COMMAND: u8 = 1;
/// Command byte the gateway uses for status responses.
pub const STATUS_COMMAND: u8 = 8;
/// Size of a status-response frame in bytes.
pub const STATUS_FRAME_LEN: usize = 6;
/// Size of one feedback record in bytes.
pub const FEEDBACK_RECORD_LEN: usize = 38;

/// An outbound push frame.
#[derive(Debug, Clone)]
pub enum PushFrame<'a> {
    /// Fire-and-forget layout; the gateway acknowledges nothing.
    Simple {
        token: &'a DeviceToken,
        payload: &'a [u8],
    },
    /// Layout carrying an identifier and expiry, enabling the status
    /// read-back.
    Extended {
        identifier: u32,
        expiry: u32,
        token: &'a DeviceToken,
        payload: &'a [u8],
    },
}

impl PushFrame<'_> {
    /// Encodes the frame for the wire.
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            PushFrame::Simple { token, payload } => {
                debug_assert!(payload.len() <= usize::from(u16::MAX));
                let mut frame = Vec::with_capacity(1 + 2 + TOKEN_LEN + 2 + payload.len());
                frame.push(SIMPLE_COMMAND);
                frame.extend_from_slice(&(TOKEN_LEN as u16).to_be_bytes());
                frame.extend_from_slice(token.as_bytes());
                frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
                frame.extend_from_slice(payload);
                frame
            }
            PushFrame::Extended {
                identifier,
                expiry,
                token,
                payload,
            } => {
                debug_assert!(payload.len() <= usize::from(u16::MAX));
                let mut frame = Vec::with_capacity(1 + 4 + 4 + 2 + TOKEN_LEN + 2 + payload.len());
                frame.push(EXTENDED_COMMAND);
                frame.extend_from_slice(&identifier.to_be_bytes());
                frame.extend_from_slice(&expiry.to_be_bytes());
                frame.extend_from_slice(&(TOKEN_LEN as u16).to_be_bytes());
                frame.extend_from_slice(token.as_bytes());
                frame.extend_from_slice(&(payload.len() as u16).to_be_bytes());
                frame.extend_from_slice(payload);
                frame
            }
        }
    }
}

/// A 6-byte delivery-status frame read back on the push socket.
///
/// The gateway sends one only on error, then closes the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusResponse {
    /// Command byte, stored verbatim (the gateway sends 8).
    pub command: u8,
    /// Status code; 0 means no error.
    pub status: u8,
    /// Echo of the notification identifier the status refers to.
    pub identifier: u32,
}

impl StatusResponse {
    /// Decodes a status frame. Input must be exactly 6 bytes.
    pub fn decode(bytes: &[u8]) -> ApnsResult<Self> {
        if bytes.len() != STATUS_FRAME_LEN {
            return Err(ApnsError::Malformed(format!(
                "status frame must be {} bytes, got {}",
                STATUS_FRAME_LEN,
                bytes.len()
            )));
        }
        let mut identifier = [0u8; 4];
        identifier.copy_from_slice(&bytes[2..6]);
        Ok(StatusResponse {
            command: bytes[0],
            status: bytes[1],
            identifier: u32::from_be_bytes(identifier),
        })
    }

    /// Encodes the frame.
    pub fn encode(&self) -> [u8; STATUS_FRAME_LEN] {
        let mut frame = [0u8; STATUS_FRAME_LEN];
        frame[0] = self.command;
        frame[1] = self.status;
        frame[2..6].copy_from_slice(&self.identifier.to_be_bytes());
        frame
    }
}

/// One 38-byte feedback record: a token the gateway marked invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackRecord {
    /// When the token was invalidated, in unix seconds.
    pub timestamp: u32,
    /// Token length field as transmitted (32 in practice).
    pub token_length: u16,
    /// The invalidated device token.
    pub token: [u8; TOKEN_LEN],
}

impl FeedbackRecord {
    /// Decodes one record. Input must be exactly 38 bytes.
    pub fn decode(bytes: &[u8]) -> ApnsResult<Self> {
        if bytes.len() != FEEDBACK_RECORD_LEN {
            return Err(ApnsError::Malformed(format!(
                "feedback record must be {} bytes, got {}",
                FEEDBACK_RECORD_LEN,
                bytes.len()
            )));
        }
        let mut timestamp = [0u8; 4];
        timestamp.copy_from_slice(&bytes[0..4]);
        let mut token_length = [0u8; 2];
        token_length.copy_from_slice(&bytes[4..6]);
        let mut token = [0u8; TOKEN_LEN];
        token.copy_from_slice(&bytes[6..FEEDBACK_RECORD_LEN]);
        Ok(FeedbackRecord {
            timestamp: u32::from_be_bytes(timestamp),
            token_length: u16::from_be_bytes(token_length),
            token,
        })
    }

    /// Encodes the record.
    pub fn encode(&self) -> [u8; FEEDBACK_RECORD_LEN] {
        let mut frame = [0u8; FEEDBACK_RECORD_LEN];
        frame[0..4].copy_from_slice(&self.timestamp.to_be_bytes());
        frame[4..6].copy_from_slice(&self.token_length.to_be_bytes());
        frame[6..].copy_from_slice(&self.token);
        frame
    }

    /// The invalidated token as lowercase hex, the form callers store.
    pub fn token_hex(&self) -> String {
        hex::encode(self.token)
    }
}
