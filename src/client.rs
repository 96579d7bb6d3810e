// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Push client: payload delivery and feedback retrieval.

use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde_json::{Map, Value};
use tracing::{debug, error, info};

use crate::codec::{FeedbackRecord, PushFrame, StatusResponse, STATUS_FRAME_LEN};
use crate::config::ApnsConfig;
use crate::connection::Connection;
use crate::error::{status_reason, ApnsError, ApnsResult};
use crate::feedback::drain_records;
use crate::payload::{Badge, NotificationPayload, APS_KEY};
use crate::tls::TlsTransport;
use crate::token::DeviceToken;
use crate::transport::Transport;

/// How long the status poll waits for the gateway to report an error.
pub const STATUS_POLL_WINDOW: Duration = Duration::from_secs(2);

/// Payload delivery mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Fire-and-forget simple frames; the protocol acknowledges nothing.
    #[default]
    Simple,
    /// Extended frames carrying an identifier and expiry; delivery errors
    /// can be read back after the write.
    Extended,
}

/// Per-send options.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Badge behavior (absent, clear, or count).
    pub badge: Badge,
    /// Notification sound name.
    pub sound: Option<String>,
    /// Expiry in seconds from now; the configured default applies when
    /// `None`. Extended mode only.
    pub expiry_secs: Option<u32>,
    /// Background content-available flag.
    pub content_available: bool,
}

/// Verdict of a send that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Simple mode: the frame was written. The protocol offers no
    /// acknowledgment beyond that.
    Sent,
    /// Extended mode: the gateway stayed silent through the poll window,
    /// which is the protocol's success signal.
    Accepted,
    /// Extended mode: the socket became readable but yielded less than a
    /// status frame. Delivery state is unknown; no error is recorded.
    Indeterminate,
}

/// Push-channel state guarded by one mutex: the connection lifecycle and
/// the notification identifier counter move together, so a concurrent send
/// cannot interleave frames or race the reconnect decision.
struct PushChannel<T: Transport> {
    connection: Connection<T>,
    id_counter: u32,
}

/// Client for the push gateway and its feedback service.
///
/// One instance owns one push channel and one feedback channel. All
/// methods take `&self`; sends are serialized internally and the feedback
/// fetch is single-flight. The instance is safe to share across threads.
///
/// # Example
///
/// ```ignore
/// use apns_gateway::{ApnsClient, ApnsConfig, DeliveryMode, SendOptions};
///
/// let config = ApnsConfig::new("certs/apns-dev.p12", "secret");
/// let client = ApnsClient::new(config)?;
///
/// client.set_mode(DeliveryMode::Extended);
/// client.send(token, "You have a new message", SendOptions::default())?;
///
/// for record in client.fetch_feedback()? {
///     remove_token(&record.token_hex());
/// }
/// ```
pub struct ApnsClient<T: Transport> {
    push: Mutex<PushChannel<T>>,
    feedback: Mutex<Connection<T>>,
    extra_data: Mutex<Map<String, Value>>,
    mode: Mutex<DeliveryMode>,
    last_error: Mutex<Option<ApnsError>>,
    default_expiry_secs: u32,
}

impl ApnsClient<TlsTransport> {
    /// Creates a client over real TLS transports.
    pub fn new(config: ApnsConfig) -> ApnsResult<Self> {
        Self::with_transports(config, TlsTransport::new(), TlsTransport::new())
    }
}

impl<T: Transport> ApnsClient<T> {
    /// Creates a client over the given transports.
    ///
    /// Fails with `ConfigInvalid` when the identity file does not exist;
    /// that is the one fatal startup condition. Nothing is connected yet.
    pub fn with_transports(config: ApnsConfig, push: T, feedback: T) -> ApnsResult<Self> {
        config.validate()?;

        let budget = Duration::from_secs(config.connect_timeout_secs);
        let push_connection =
            Connection::new(push, config.push_params(), budget, config.allow_reconnect);
        // The feedback channel opens fresh per fetch; the proactive
        // reconnect policy never applies to it.
        let feedback_connection =
            Connection::new(feedback, config.feedback_params(), budget, false);

        Ok(ApnsClient {
            push: Mutex::new(PushChannel {
                connection: push_connection,
                id_counter: 0,
            }),
            feedback: Mutex::new(feedback_connection),
            extra_data: Mutex::new(Map::new()),
            mode: Mutex::new(DeliveryMode::default()),
            last_error: Mutex::new(None),
            default_expiry_secs: config.expiry_secs,
        })
    }

    /// Switches between simple and extended delivery.
    pub fn set_mode(&self, mode: DeliveryMode) {
        *self.mode.lock().expect("mutex poisoned") = mode;
    }

    /// Current delivery mode.
    pub fn mode(&self) -> DeliveryMode {
        *self.mode.lock().expect("mutex poisoned")
    }

    /// Enables or disables the pre-flight reconnect on the push channel.
    pub fn set_allow_reconnect(&self, allowed: bool) {
        self.push
            .lock()
            .expect("mutex poisoned")
            .connection
            .set_reconnect_allowed(allowed);
    }

    /// Sets data merged into every payload at the top level, next to `aps`.
    ///
    /// Rejects maps containing the reserved `aps` key; the previous extra
    /// data is kept in that case.
    pub fn set_extra_data(&self, data: Map<String, Value>) -> ApnsResult<()> {
        if data.contains_key(APS_KEY) {
            error!("extra data rejected: key \"{}\" is reserved", APS_KEY);
            return Err(self.record(ApnsError::ReservedKey));
        }
        *self.extra_data.lock().expect("mutex poisoned") = data;
        Ok(())
    }

    /// The most recent recorded failure, if any. Cleared by the next send.
    pub fn last_error(&self) -> Option<ApnsError> {
        self.last_error.lock().expect("mutex poisoned").clone()
    }

    /// Opens the push connection, reusing a live one.
    pub fn connect_push(&self) -> ApnsResult<()> {
        let mut push = self.push.lock().expect("mutex poisoned");
        push.connection.ensure_connected().map_err(|e| self.record(e))
    }

    /// Closes the push connection; a no-op when already closed.
    pub fn disconnect_push(&self) -> ApnsResult<()> {
        self.push.lock().expect("mutex poisoned").connection.disconnect()
    }

    /// Opens a fresh feedback connection, replacing any previous one.
    pub fn connect_feedback(&self) -> ApnsResult<()> {
        let mut feedback = self.feedback.lock().expect("mutex poisoned");
        feedback.connect_fresh().map_err(|e| self.record(e))
    }

    /// Closes the feedback connection; a no-op when already closed.
    pub fn disconnect_feedback(&self) -> ApnsResult<()> {
        self.feedback.lock().expect("mutex poisoned").disconnect()
    }

    /// Sends a notification to `device_token`.
    ///
    /// The token is validated before any socket I/O. The connection is
    /// refreshed first when its session budget is nearly spent, which also
    /// covers the first connect. In extended mode the gateway is then
    /// polled for a status frame; silence counts as success.
    ///
    /// A failed write is surfaced, never retried.
    pub fn send(
        &self,
        device_token: &str,
        message: &str,
        options: SendOptions,
    ) -> ApnsResult<SendOutcome> {
        self.clear_error();

        let token = DeviceToken::parse(device_token).map_err(|e| {
            debug!("rejected device token: {}", e);
            self.record(e)
        })?;

        let mode = self.mode();
        let mut push = self.push.lock().expect("mutex poisoned");

        // Pre-flight refresh; also the first connect of a session.
        push.connection.try_reconnect();

        let payload = self.build_payload(message, &options).map_err(|e| self.record(e))?;

        push.id_counter = push.id_counter.wrapping_add(1);
        let identifier = push.id_counter;

        debug!("sending notification {} to {}", identifier, token);

        match mode {
            DeliveryMode::Simple => {
                let frame = PushFrame::Simple {
                    token: &token,
                    payload: &payload,
                }
                .encode();
                push.connection.write_frame(&frame).map_err(|e| self.record(e))?;
                Ok(SendOutcome::Sent)
            }
            DeliveryMode::Extended => {
                let expiry_secs = options.expiry_secs.unwrap_or(self.default_expiry_secs);
                let expiry = (unix_now() + u64::from(expiry_secs)) as u32;
                let frame = PushFrame::Extended {
                    identifier,
                    expiry,
                    token: &token,
                    payload: &payload,
                }
                .encode();
                push.connection.write_frame(&frame).map_err(|e| self.record(e))?;
                self.read_status(&mut push.connection)
            }
        }
    }

    /// Drains the feedback service, one fresh session per call.
    ///
    /// Returns the invalidated-token records in stream order. The
    /// connection is closed before returning, on every path.
    pub fn fetch_feedback(&self) -> ApnsResult<Vec<FeedbackRecord>> {
        let mut feedback = self.feedback.lock().expect("mutex poisoned");

        info!("fetching feedback records");
        feedback.connect_fresh().map_err(|e| self.record(e))?;

        let result = drain_records(&mut feedback);
        let _ = feedback.disconnect(); // Close even when the drain failed

        match result {
            Ok(records) => {
                info!("feedback returned {} invalidated tokens", records.len());
                Ok(records)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Polls the push socket for a delivery status after an extended write.
    ///
    /// The gateway says nothing on success. A status frame arrives only on
    /// error, after which the gateway closes the connection, so the socket
    /// is dropped and left for the next pre-flight reconnect.
    fn read_status(&self, connection: &mut Connection<T>) -> ApnsResult<SendOutcome> {
        match connection.poll_read(STATUS_FRAME_LEN, STATUS_POLL_WINDOW) {
            Ok(None) => Ok(SendOutcome::Accepted),
            Ok(Some(bytes)) if bytes.len() < STATUS_FRAME_LEN => {
                debug!(
                    "status poll returned {} bytes; delivery state unknown",
                    bytes.len()
                );
                Ok(SendOutcome::Indeterminate)
            }
            Ok(Some(bytes)) => {
                let response = StatusResponse::decode(&bytes).map_err(|e| self.record(e))?;
                if response.status == 0 {
                    return Ok(SendOutcome::Accepted);
                }
                let reason = status_reason(response.status);
                error!(
                    "gateway rejected notification {}: {} (status {})",
                    response.identifier, reason, response.status
                );
                let _ = connection.disconnect();
                Err(self.record(ApnsError::GatewayRejected {
                    code: response.status,
                    reason,
                }))
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Builds the JSON body for one send.
    fn build_payload(&self, message: &str, options: &SendOptions) -> ApnsResult<Vec<u8>> {
        let extra = self.extra_data.lock().expect("mutex poisoned").clone();

        let mut payload = NotificationPayload::new(message).badge(options.badge);
        if let Some(sound) = &options.sound {
            payload = payload.sound(sound.clone());
        }
        if options.content_available {
            payload = payload.content_available();
        }

        let body = payload.extra(extra)?.to_json()?;
        debug!("generated payload: {}", String::from_utf8_lossy(&body));
        Ok(body)
    }

    fn record(&self, error: ApnsError) -> ApnsError {
        *self.last_error.lock().expect("mutex poisoned") = Some(error.clone());
        error
    }

    fn clear_error(&self) {
        *self.last_error.lock().expect("mutex poisoned") = None;
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_secs()
}
