// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Notification payload construction.
//!
//! The payload is a JSON object with one protocol-owned key, `aps`, plus
//! caller data merged at the top level. Absent fields are omitted from the
//! output entirely; `badge` in particular distinguishes "leave unchanged"
//! (key absent) from "clear" (`badge: 0`).

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ApnsError, ApnsResult};

/// Reserved top-level key owned by the protocol.
pub const APS_KEY: &str = "aps";

/// Badge behavior for a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Badge {
    /// Leave the badge untouched (key absent on the wire).
    #[default]
    Unset,
    /// Reset the badge to zero.
    Clear,
    /// Set the badge to a count.
    Count(u32),
}

impl Badge {
    fn wire_value(self) -> Option<u32> {
        match self {
            Badge::Unset => None,
            Badge::Clear => Some(0),
            Badge::Count(n) => Some(n),
        }
    }
}

/// A notification payload, serialized once per send.
#[derive(Debug, Clone)]
pub struct NotificationPayload {
    alert: String,
    badge: Badge,
    sound: Option<String>,
    content_available: bool,
    extra: Map<String, Value>,
}

/// The `aps` dictionary as framed on the wire.
#[derive(Serialize)]
struct Aps<'a> {
    alert: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<&'a str>,
    #[serde(rename = "content-available", skip_serializing_if = "Option::is_none")]
    content_available: Option<u8>,
}

#[derive(Serialize)]
struct Body<'a> {
    aps: Aps<'a>,
    #[serde(flatten)]
    extra: &'a Map<String, Value>,
}

impl NotificationPayload {
    /// Creates a payload carrying only an alert message.
    pub fn new(alert: impl Into<String>) -> Self {
        NotificationPayload {
            alert: alert.into(),
            badge: Badge::Unset,
            sound: None,
            content_available: false,
            extra: Map::new(),
        }
    }

    /// Sets the badge behavior.
    pub fn badge(mut self, badge: Badge) -> Self {
        self.badge = badge;
        self
    }

    /// Sets the notification sound.
    pub fn sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    /// Marks the notification as background content-available.
    pub fn content_available(mut self) -> Self {
        self.content_available = true;
        self
    }

    /// Merges caller data at the top level, next to `aps`.
    ///
    /// The reserved `aps` key is rejected; caller data can never shadow the
    /// protocol object.
    pub fn extra(mut self, extra: Map<String, Value>) -> ApnsResult<Self> {
        if extra.contains_key(APS_KEY) {
            return Err(ApnsError::ReservedKey);
        }
        self.extra = extra;
        Ok(self)
    }

    /// Serializes to the JSON body sent on the wire.
    pub fn to_json(&self) -> ApnsResult<Vec<u8>> {
        let body = Body {
            aps: Aps {
                alert: &self.alert,
                badge: self.badge.wire_value(),
                sound: self.sound.as_deref(),
                content_available: if self.content_available { Some(1) } else { None },
            },
            extra: &self.extra,
        };
        serde_json::to_vec(&body).map_err(|e| ApnsError::Serialization(e.to_string()))
    }
}
