//! Tests for error types and the status-code table

use apns_gateway::{status_reason, ApnsError};

#[test]
fn test_status_reason_table() {
    assert_eq!(status_reason(0), "No errors encountered");
    assert_eq!(status_reason(1), "Processing error");
    assert_eq!(status_reason(2), "Missing device token");
    assert_eq!(status_reason(3), "Missing topic");
    assert_eq!(status_reason(4), "Missing payload");
    assert_eq!(status_reason(5), "Invalid token size");
    assert_eq!(status_reason(6), "Invalid topic size");
    assert_eq!(status_reason(7), "Invalid payload size");
    assert_eq!(status_reason(8), "Invalid token");
    assert_eq!(status_reason(255), "None (unknown)");
}

#[test]
fn test_status_reason_undefined_codes_fall_back() {
    assert_eq!(status_reason(9), "None (unknown)");
    assert_eq!(status_reason(42), "None (unknown)");
    assert_eq!(status_reason(254), "None (unknown)");
}

#[test]
fn test_gateway_rejected_display() {
    let error = ApnsError::GatewayRejected {
        code: 8,
        reason: "Invalid token",
    };

    let text = error.to_string();
    assert!(text.contains("Invalid token"));
    assert!(text.contains("8"));
}

#[test]
fn test_error_display_carries_detail() {
    let error = ApnsError::ConnectFailed("connection refused".to_string());
    assert!(error.to_string().contains("connection refused"));

    let error = ApnsError::InvalidToken("expected 64 hex characters, got 8".to_string());
    assert!(error.to_string().contains("64"));
}

#[test]
fn test_not_connected_display() {
    assert_eq!(
        ApnsError::NotConnected.to_string(),
        "transport not connected"
    );
}

#[test]
fn test_errors_are_cloneable_and_comparable() {
    let error = ApnsError::GatewayRejected {
        code: 5,
        reason: "Invalid token size",
    };

    assert_eq!(error.clone(), error);
    assert_ne!(error, ApnsError::NotConnected);
}
