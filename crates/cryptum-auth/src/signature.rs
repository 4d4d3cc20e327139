// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ed25519 signature verification against the caller's public key.

use cryptum_core::AuthError;
use ed25519_dalek::{Signature, VerifyingKey};

use crate::codec::SIGNATURE_LEN;

/// Parse raw public key bytes into a verifying key.
///
/// Anything other than a 32-byte valid curve point is a format error on `field`.
pub fn parse_public_key(bytes: &[u8], field: &str) -> Result<VerifyingKey, AuthError> {
    let raw: [u8; 32] = bytes
        .try_into()
        .map_err(|_| AuthError::invalid_format(field))?;
    VerifyingKey::from_bytes(&raw).map_err(|_| AuthError::invalid_format(field))
}

/// Verify `signature` over `message`.
///
/// Uses strict verification, which rejects small-order keys and
/// non-canonical signatures.
pub fn verify(
    key: &VerifyingKey,
    message: &[u8],
    signature: &[u8; SIGNATURE_LEN],
) -> Result<(), AuthError> {
    let signature = Signature::from_bytes(signature);
    key.verify_strict(message, &signature)
        .map_err(|_| AuthError::InvalidSignature)
}
