// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Test Fixtures
//!
//! Mock-backed clients and canonical inputs for integration tests.

use apns_gateway::{ApnsClient, ApnsConfig, MockTransport};
use tempfile::NamedTempFile;

/// A valid 64-character hex device token.
pub const TEST_TOKEN: &str = "74ce8b70bad38b18cc2a8e0caf2c64331e8a039a701ca2f1b2f2a174ce8b70ff";

/// A client over mock transports, plus probe handles into each transport.
///
/// The temp identity file must outlive the client, since construction
/// checks it exists.
pub struct MockClient {
    pub client: ApnsClient<MockTransport>,
    pub push: MockTransport,
    pub feedback: MockTransport,
    _identity: NamedTempFile,
}

/// Builds a mock-backed client with default (sandbox) configuration.
pub fn mock_client() -> MockClient {
    mock_client_with(ApnsConfig::default())
}

/// Builds a mock-backed client from `config`, swapping in a throwaway
/// identity file so construction-time validation passes.
pub fn mock_client_with(mut config: ApnsConfig) -> MockClient {
    let identity = NamedTempFile::new().expect("create temp identity file");
    config.identity_file = identity.path().to_path_buf();

    let push = MockTransport::new();
    let feedback = MockTransport::new();
    let client = ApnsClient::with_transports(config, push.clone(), feedback.clone())
        .expect("client construction");

    MockClient {
        client,
        push,
        feedback,
        _identity: identity,
    }
}
