// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Protector token generation.
//!
//! A protector is 32 bytes from the system CSPRNG, handed to the client once
//! as base64 text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cryptum_core::CryptumError;
use ring::rand::{SecureRandom, SystemRandom};

/// Length of a protector token in bytes.
pub const PROTECTOR_LEN: usize = 32;

/// Generate a fresh base64-encoded protector.
pub fn generate_protector() -> Result<String, CryptumError> {
    let rng = SystemRandom::new();
    let mut token = [0u8; PROTECTOR_LEN];
    rng.fill(&mut token)
        .map_err(|_| CryptumError::Internal("failed to generate protector".to_string()))?;
    Ok(STANDARD.encode(token))
}
