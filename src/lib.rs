//! APNs Gateway Library
//!
//! Client for Apple's legacy binary push protocol. Maintains a
//! client-certificate TLS connection to the push gateway, frames
//! notification payloads in the two binary layouts, polls for the
//! delivery-status frames the gateway sends only on error, and drains the
//! feedback service for device tokens that are no longer valid.
//!
//! The gateway is silent on success and drops idle connections without a
//! clean close, so the client refreshes its connection shortly before the
//! session budget runs out instead of reacting to failed writes.
//!
//! # Example
//!
//! ```ignore
//! use apns_gateway::{ApnsClient, ApnsConfig, DeliveryMode, SendOptions};
//!
//! let config = ApnsConfig::new("certs/apns-dev.p12", "secret");
//! let client = ApnsClient::new(config)?;
//!
//! client.set_mode(DeliveryMode::Extended);
//! client.send(device_token, "You have a new message", SendOptions::default())?;
//!
//! for record in client.fetch_feedback()? {
//!     forget_token(&record.token_hex());
//! }
//! ```

pub mod client;
pub mod codec;
pub mod config;
pub mod connection;
pub mod error;
mod feedback;
pub mod mock;
pub mod payload;
pub mod tls;
pub mod token;
pub mod transport;

pub use client::{ApnsClient, DeliveryMode, SendOptions, SendOutcome, STATUS_POLL_WINDOW};
pub use codec::{
    FeedbackRecord, PushFrame, StatusResponse, EXTENDED_COMMAND, FEEDBACK_RECORD_LEN,
    SIMPLE_COMMAND, STATUS_COMMAND, STATUS_FRAME_LEN,
};
pub use config::{
    ApnsConfig, FEEDBACK_GATEWAY, FEEDBACK_GATEWAY_SANDBOX, PUSH_GATEWAY, PUSH_GATEWAY_SANDBOX,
};
pub use connection::{Connection, RECONNECT_LEAD};
pub use error::{status_reason, ApnsError, ApnsResult};
pub use mock::{MockTransport, ReadScript};
pub use payload::{Badge, NotificationPayload, APS_KEY};
pub use tls::TlsTransport;
pub use token::{DeviceToken, TOKEN_LEN};
pub use transport::{ConnectParams, Transport, READ_TIMEOUT};
