// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client configuration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use zeroize::Zeroizing;

use crate::error::{ApnsError, ApnsResult};
use crate::transport::{ConnectParams, READ_TIMEOUT};

/// Production push gateway.
pub const PUSH_GATEWAY: &str = "gateway.push.apple.com:2195";
/// Sandbox push gateway.
pub const PUSH_GATEWAY_SANDBOX: &str = "gateway.sandbox.push.apple.com:2195";
/// Production feedback service.
pub const FEEDBACK_GATEWAY: &str = "feedback.push.apple.com:2196";
/// Sandbox feedback service.
pub const FEEDBACK_GATEWAY_SANDBOX: &str = "feedback.sandbox.push.apple.com:2196";

/// Configuration for [`ApnsClient`](crate::ApnsClient), consumed by value
/// at construction.
///
/// Defaults select the sandbox environment; call [`production`](Self::production)
/// for the live gateways. The timeout doubles as the connect-phase limit
/// and the session budget for the reconnect-before-timeout policy.
#[derive(Clone)]
pub struct ApnsConfig {
    /// Path to the PKCS#12 bundle holding the client certificate and key.
    pub identity_file: PathBuf,
    /// Passphrase protecting the private key. Zeroed on drop.
    pub passphrase: Zeroizing<String>,
    /// Selects the sandbox address pair when true.
    pub sandbox: bool,
    /// Production push gateway address.
    pub push_address: String,
    /// Sandbox push gateway address.
    pub push_address_sandbox: String,
    /// Production feedback service address.
    pub feedback_address: String,
    /// Sandbox feedback service address.
    pub feedback_address_sandbox: String,
    /// Connect timeout and session budget, in seconds.
    pub connect_timeout_secs: u64,
    /// Default notification expiry when a send does not override it, in
    /// seconds from now.
    pub expiry_secs: u32,
    /// Allows the pre-flight reconnect on the push channel.
    pub allow_reconnect: bool,
}

impl Default for ApnsConfig {
    fn default() -> Self {
        ApnsConfig {
            identity_file: PathBuf::new(),
            passphrase: Zeroizing::new(String::new()),
            sandbox: true,
            push_address: PUSH_GATEWAY.to_string(),
            push_address_sandbox: PUSH_GATEWAY_SANDBOX.to_string(),
            feedback_address: FEEDBACK_GATEWAY.to_string(),
            feedback_address_sandbox: FEEDBACK_GATEWAY_SANDBOX.to_string(),
            connect_timeout_secs: 60,
            expiry_secs: 86_400,
            allow_reconnect: true,
        }
    }
}

impl ApnsConfig {
    /// Creates a sandbox config for the given identity bundle and
    /// passphrase.
    pub fn new(identity_file: impl Into<PathBuf>, passphrase: &str) -> Self {
        ApnsConfig {
            identity_file: identity_file.into(),
            passphrase: Zeroizing::new(passphrase.to_string()),
            ..Default::default()
        }
    }

    /// Switches to the production address pair.
    pub fn production(mut self) -> Self {
        self.sandbox = false;
        self
    }

    /// Overrides the connect timeout and session budget.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    /// Overrides the default notification expiry.
    pub fn with_expiry(mut self, secs: u32) -> Self {
        self.expiry_secs = secs;
        self
    }

    /// Disables the pre-flight reconnect on the push channel.
    pub fn without_reconnect(mut self) -> Self {
        self.allow_reconnect = false;
        self
    }

    /// The push gateway address selected by the sandbox flag.
    pub fn push_endpoint(&self) -> &str {
        if self.sandbox {
            &self.push_address_sandbox
        } else {
            &self.push_address
        }
    }

    /// The feedback service address selected by the sandbox flag.
    pub fn feedback_endpoint(&self) -> &str {
        if self.sandbox {
            &self.feedback_address_sandbox
        } else {
            &self.feedback_address
        }
    }

    /// Startup validation: the identity file must exist.
    ///
    /// This is the one fatal precondition; everything else fails per
    /// operation.
    pub fn validate(&self) -> ApnsResult<()> {
        if !self.identity_file.exists() {
            return Err(ApnsError::ConfigInvalid(format!(
                "identity file not found: {}",
                self.identity_file.display()
            )));
        }
        Ok(())
    }

    pub(crate) fn push_params(&self) -> ConnectParams {
        self.params(self.push_endpoint())
    }

    pub(crate) fn feedback_params(&self) -> ConnectParams {
        self.params(self.feedback_endpoint())
    }

    fn params(&self, address: &str) -> ConnectParams {
        ConnectParams {
            address: address.to_string(),
            identity_file: self.identity_file.clone(),
            passphrase: self.passphrase.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            read_timeout: READ_TIMEOUT,
        }
    }
}

impl fmt::Debug for ApnsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApnsConfig")
            .field("identity_file", &self.identity_file)
            .field("passphrase", &"<redacted>")
            .field("sandbox", &self.sandbox)
            .field("push_address", &self.push_address)
            .field("push_address_sandbox", &self.push_address_sandbox)
            .field("feedback_address", &self.feedback_address)
            .field("feedback_address_sandbox", &self.feedback_address_sandbox)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("expiry_secs", &self.expiry_secs)
            .field("allow_reconnect", &self.allow_reconnect)
            .finish()
    }
}
