// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Property-Based Tests
//!
//! Uses proptest to verify wire-format and parsing properties that should
//! hold for all inputs, not just specific test cases.

mod common;

use proptest::prelude::*;
use serde_json::Value;

use apns_gateway::{
    Badge, DeviceToken, FeedbackRecord, NotificationPayload, PushFrame, StatusResponse,
    FEEDBACK_RECORD_LEN, STATUS_FRAME_LEN,
};
use common::strategies::{
    alert_strategy, badge_strategy, payload_strategy, timestamp_strategy, token_bytes_strategy,
    token_hex_strategy,
};

// ============================================================
// Token Properties
// ============================================================

proptest! {
    /// Property: parsing lowercase hex and re-displaying is the identity
    #[test]
    fn prop_token_hex_roundtrip(hex in token_hex_strategy()) {
        let token = DeviceToken::parse(&hex).unwrap();
        prop_assert_eq!(token.to_string(), hex);
    }

    /// Property: token parsing is case-insensitive
    #[test]
    fn prop_token_case_insensitive(hex in token_hex_strategy()) {
        let lower = DeviceToken::parse(&hex).unwrap();
        let upper = DeviceToken::parse(&hex.to_uppercase()).unwrap();
        prop_assert_eq!(lower, upper);
    }

    /// Property: any 64-char string with a non-hex character is rejected
    #[test]
    fn prop_token_rejects_non_hex(position in 0usize..64) {
        let mut chars: Vec<char> = "a".repeat(64).chars().collect();
        chars[position] = 'g';
        let input: String = chars.into_iter().collect();
        prop_assert!(DeviceToken::parse(&input).is_err());
    }
}

// ============================================================
// Push Frame Properties
// ============================================================

proptest! {
    /// Property: simple frame layout holds for arbitrary tokens and payloads
    #[test]
    fn prop_simple_frame_layout(
        token_bytes in token_bytes_strategy(),
        payload in payload_strategy()
    ) {
        let token = DeviceToken::from(token_bytes);
        let frame = PushFrame::Simple { token: &token, payload: &payload }.encode();

        prop_assert_eq!(frame.len(), 37 + payload.len());
        prop_assert_eq!(frame[0], 0u8);
        prop_assert_eq!(&frame[1..3], &(32u16).to_be_bytes());
        prop_assert_eq!(&frame[3..35], &token_bytes[..]);
        prop_assert_eq!(&frame[35..37], &(payload.len() as u16).to_be_bytes());
        prop_assert_eq!(&frame[37..], &payload[..]);
    }

    /// Property: extended frame layout holds for arbitrary inputs
    #[test]
    fn prop_extended_frame_layout(
        identifier in any::<u32>(),
        expiry in any::<u32>(),
        token_bytes in token_bytes_strategy(),
        payload in payload_strategy()
    ) {
        let token = DeviceToken::from(token_bytes);
        let frame = PushFrame::Extended {
            identifier,
            expiry,
            token: &token,
            payload: &payload,
        }
        .encode();

        prop_assert_eq!(frame.len(), 45 + payload.len());
        prop_assert_eq!(frame[0], 1u8);
        prop_assert_eq!(&frame[1..5], &identifier.to_be_bytes());
        prop_assert_eq!(&frame[5..9], &expiry.to_be_bytes());
        prop_assert_eq!(&frame[9..11], &(32u16).to_be_bytes());
        prop_assert_eq!(&frame[11..43], &token_bytes[..]);
        prop_assert_eq!(&frame[43..45], &(payload.len() as u16).to_be_bytes());
        prop_assert_eq!(&frame[45..], &payload[..]);
    }
}

// ============================================================
// Inbound Frame Properties
// ============================================================

proptest! {
    /// Property: status encode/decode recovers the exact triple
    #[test]
    fn prop_status_roundtrip(
        command in any::<u8>(),
        status in any::<u8>(),
        identifier in any::<u32>()
    ) {
        let response = StatusResponse { command, status, identifier };
        let decoded = StatusResponse::decode(&response.encode()).unwrap();
        prop_assert_eq!(decoded, response);
    }

    /// Property: status decode rejects every length except 6
    #[test]
    fn prop_status_rejects_wrong_sizes(len in 0usize..16) {
        prop_assume!(len != STATUS_FRAME_LEN);
        prop_assert!(StatusResponse::decode(&vec![0u8; len]).is_err());
    }

    /// Property: feedback encode/decode recovers timestamp and token
    #[test]
    fn prop_feedback_roundtrip(
        timestamp in timestamp_strategy(),
        token in token_bytes_strategy()
    ) {
        let record = FeedbackRecord { timestamp, token_length: 32, token };
        let decoded = FeedbackRecord::decode(&record.encode()).unwrap();
        prop_assert_eq!(decoded, record);
    }

    /// Property: feedback decode rejects every length except 38
    #[test]
    fn prop_feedback_rejects_wrong_sizes(len in 0usize..80) {
        prop_assume!(len != FEEDBACK_RECORD_LEN);
        prop_assert!(FeedbackRecord::decode(&vec![0u8; len]).is_err());
    }
}

// ============================================================
// Payload Properties
// ============================================================

proptest! {
    /// Property: the alert text always survives serialization verbatim
    #[test]
    fn prop_payload_alert_roundtrip(alert in alert_strategy()) {
        let body: Value =
            serde_json::from_slice(&NotificationPayload::new(alert.clone()).to_json().unwrap())
                .unwrap();
        prop_assert_eq!(&body["aps"]["alert"], &Value::from(alert));
    }

    /// Property: the badge key is present exactly when the badge is set
    #[test]
    fn prop_payload_badge_presence(alert in alert_strategy(), badge in badge_strategy()) {
        let body: Value = serde_json::from_slice(
            &NotificationPayload::new(alert).badge(badge).to_json().unwrap(),
        )
        .unwrap();

        match badge {
            Badge::Unset => prop_assert!(body["aps"].get("badge").is_none()),
            Badge::Clear => prop_assert_eq!(&body["aps"]["badge"], &Value::from(0u32)),
            Badge::Count(n) => prop_assert_eq!(&body["aps"]["badge"], &Value::from(n)),
        }
    }

    /// Property: extra keys never leak into the aps dictionary
    #[test]
    fn prop_payload_extra_stays_top_level(
        alert in alert_strategy(),
        key in "[a-z][a-z0-9_]{0,15}",
        value in "[a-zA-Z0-9 ]{0,30}"
    ) {
        prop_assume!(key != "aps");

        let mut extra = serde_json::Map::new();
        extra.insert(key.clone(), Value::from(value.clone()));

        let body: Value = serde_json::from_slice(
            &NotificationPayload::new(alert)
                .extra(extra)
                .unwrap()
                .to_json()
                .unwrap(),
        )
        .unwrap();

        prop_assert_eq!(&body[&key], &Value::from(value));
        prop_assert!(body["aps"].get(&key).is_none());
    }
}
