// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Proptest Strategies
//!
//! Reusable proptest strategies for property-based testing.

use apns_gateway::Badge;
use proptest::prelude::*;

/// Strategy for generating valid 64-char hex device tokens.
pub fn token_hex_strategy() -> impl Strategy<Value = String> {
    "[a-f0-9]{64}"
}

/// Strategy for generating raw 32-byte device tokens.
pub fn token_bytes_strategy() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

/// Strategy for generating payload bodies within the u16 length field.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..512)
}

/// Strategy for generating feedback timestamps (reasonable epoch range).
pub fn timestamp_strategy() -> impl Strategy<Value = u32> {
    1_000_000_000u32..2_000_000_000u32
}

/// Strategy for generating alert messages.
pub fn alert_strategy() -> impl Strategy<Value = String> {
    ".{1,80}"
}

/// Strategy for generating badge behaviors across all three variants.
pub fn badge_strategy() -> impl Strategy<Value = Badge> {
    prop_oneof![
        Just(Badge::Unset),
        Just(Badge::Clear),
        (1u32..10_000u32).prop_map(Badge::Count),
    ]
}
