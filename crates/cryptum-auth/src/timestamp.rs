// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timestamp freshness window.

use cryptum_core::AuthError;

use crate::codec::TIMESTAMP_LEN;

/// Default freshness window in seconds.
pub const DEFAULT_TOLERANCE_SECS: u32 = 300;

/// Accepts timestamps within `tolerance_secs` of the server clock, in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampWindow {
    tolerance_secs: u32,
}

impl Default for TimestampWindow {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_SECS)
    }
}

impl TimestampWindow {
    pub fn new(tolerance_secs: u32) -> Self {
        Self { tolerance_secs }
    }

    pub fn tolerance_secs(&self) -> u32 {
        self.tolerance_secs
    }

    /// Decode a little-endian timestamp and check it against `now` (Unix seconds).
    ///
    /// The boundary `|now - ts| == tolerance` is accepted.
    pub fn check(&self, raw: [u8; TIMESTAMP_LEN], now: i64) -> Result<u32, AuthError> {
        let timestamp = u32::from_le_bytes(raw);
        let skew = (now - i64::from(timestamp)).abs();
        if skew > i64::from(self.tolerance_secs) {
            return Err(AuthError::InvalidTimestamp { timestamp, now });
        }
        Ok(timestamp)
    }
}

/// Encode a Unix time as the 4-byte little-endian wire form.
///
/// Times outside the `u32` range saturate.
pub fn encode(unix_secs: i64) -> [u8; TIMESTAMP_LEN] {
    let clamped = unix_secs.clamp(0, i64::from(u32::MAX)) as u32;
    clamped.to_le_bytes()
}
