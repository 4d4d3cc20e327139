// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base64 transport decoding and the signed body layout.
//!
//! A signed body is `signature[64] ‖ timestamp[4, little-endian] ‖ payload`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cryptum_core::AuthError;

/// Length of an Ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Length of the little-endian `u32` timestamp.
pub const TIMESTAMP_LEN: usize = 4;

/// Minimum length of a decoded signed body.
pub const SIGNED_PREFIX_LEN: usize = SIGNATURE_LEN + TIMESTAMP_LEN;

/// A decoded body split into its fixed-offset parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBody {
    pub signature: [u8; SIGNATURE_LEN],
    pub timestamp: [u8; TIMESTAMP_LEN],
    pub payload: Vec<u8>,
}

/// Strictly decode standard base64, tagging failures with `field`.
///
/// Surrounding ASCII whitespace is ignored.
pub fn decode_base64(data: &[u8], field: &str) -> Result<Vec<u8>, AuthError> {
    STANDARD
        .decode(data.trim_ascii())
        .map_err(|_| AuthError::invalid_format(field))
}

/// Encode bytes as standard, padded base64.
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode a base64 field that must be exactly `N` bytes long.
pub fn decode_fixed<const N: usize>(data: &[u8], field: &str) -> Result<[u8; N], AuthError> {
    decode_base64(data, field)?
        .try_into()
        .map_err(|_| AuthError::invalid_format(field))
}

/// Trim a request body and unwrap it from a JSON string literal, if quoted.
///
/// Browser clients post the base64 text with `Content-Type: application/json`,
/// so it arrives as `"<base64>"`. The contents are left for strict decoding.
pub fn unquote_body(body: &[u8]) -> &[u8] {
    match body.trim_ascii() {
        [b'"', inner @ .., b'"'] => inner,
        trimmed => trimmed,
    }
}

/// Split a decoded body into signature, timestamp, and payload.
pub fn slice_body(body: &[u8]) -> Result<SignedBody, AuthError> {
    if body.len() < SIGNED_PREFIX_LEN {
        return Err(AuthError::BodyTooShort { len: body.len() });
    }
    let (signature, rest) = body.split_at(SIGNATURE_LEN);
    let (timestamp, payload) = rest.split_at(TIMESTAMP_LEN);

    Ok(SignedBody {
        signature: signature
            .try_into()
            .map_err(|_| AuthError::BodyTooShort { len: body.len() })?,
        timestamp: timestamp
            .try_into()
            .map_err(|_| AuthError::BodyTooShort { len: body.len() })?,
        payload: payload.to_vec(),
    })
}
