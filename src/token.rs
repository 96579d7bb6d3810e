//! Device token parsing and validation.

use std::fmt;

use crate::error::{ApnsError, ApnsResult};

/// Length of a raw device token in bytes.
pub const TOKEN_LEN: usize = 32;

/// A device token: 32 raw bytes, supplied as 64 hexadecimal characters.
///
/// Tokens are often pasted with embedded spaces (`"74ce8b70 ffa6..."`);
/// whitespace is stripped before validation so that form is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceToken([u8; TOKEN_LEN]);

impl DeviceToken {
    /// Parses a hex token string.
    ///
    /// Fails on non-hexadecimal input or any length other than 64
    /// characters after ASCII whitespace removal.
    pub fn parse(s: &str) -> ApnsResult<Self> {
        let cleaned: String = s.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        if cleaned.len() != TOKEN_LEN * 2 {
            return Err(ApnsError::InvalidToken(format!(
                "expected {} hex characters, got {}",
                TOKEN_LEN * 2,
                cleaned.len()
            )));
        }
        let bytes = hex::decode(&cleaned).map_err(|_| {
            ApnsError::InvalidToken("token contains non-hexadecimal characters".to_string())
        })?;
        let mut token = [0u8; TOKEN_LEN];
        token.copy_from_slice(&bytes);
        Ok(DeviceToken(token))
    }

    /// Raw token bytes as framed on the wire.
    pub fn as_bytes(&self) -> &[u8; TOKEN_LEN] {
        &self.0
    }
}

impl From<[u8; TOKEN_LEN]> for DeviceToken {
    fn from(bytes: [u8; TOKEN_LEN]) -> Self {
        DeviceToken(bytes)
    }
}

impl fmt::Display for DeviceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}
