// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client-side request signing.
//!
//! Produces the header values and signed bodies a vault client sends. The
//! server never signs anything; this exists for tooling and tests.

use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;

use crate::codec::{SIGNATURE_LEN, encode_base64};
use crate::timestamp;

/// Base64 header values for a header-signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub public_key: String,
    pub timestamp: String,
    pub signature: String,
}

/// An Ed25519 client keypair.
pub struct RequestSigner {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl RequestSigner {
    /// Generate a new random Ed25519 keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let verifying_key = VerifyingKey::from(&signing_key);
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Reconstruct a keypair from private key bytes.
    pub fn from_bytes(private_bytes: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(private_bytes);
        let verifying_key = VerifyingKey::from(&signing_key);
        Self {
            signing_key,
            verifying_key,
        }
    }

    pub fn public_bytes(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// The `Public-Key` header value.
    pub fn public_key_base64(&self) -> String {
        encode_base64(&self.public_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LEN] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Headers for an operation that signs only the timestamp.
    pub fn sign_timestamp(&self, unix_secs: i64) -> SignedHeaders {
        let ts = timestamp::encode(unix_secs);
        SignedHeaders {
            public_key: self.public_key_base64(),
            timestamp: encode_base64(&ts),
            signature: encode_base64(&self.sign(&ts)),
        }
    }

    /// Base64 body `signature ‖ timestamp ‖ payload`, signing `timestamp ‖ payload`.
    pub fn sign_body(&self, unix_secs: i64, payload: &[u8]) -> String {
        let ts = timestamp::encode(unix_secs);
        let mut signed = Vec::with_capacity(ts.len() + payload.len());
        signed.extend_from_slice(&ts);
        signed.extend_from_slice(payload);

        let mut body = Vec::with_capacity(SIGNATURE_LEN + signed.len());
        body.extend_from_slice(&self.sign(&signed));
        body.extend_from_slice(&signed);
        encode_base64(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_base64, slice_body};
    use crate::signature;

    #[test]
    fn generate_produces_distinct_keys() {
        let a = RequestSigner::generate();
        let b = RequestSigner::generate();
        assert_ne!(a.public_bytes(), b.public_bytes());
    }

    #[test]
    fn from_bytes_is_deterministic() {
        let a = RequestSigner::from_bytes(&[3u8; 32]);
        let b = RequestSigner::from_bytes(&[3u8; 32]);
        assert_eq!(a.public_key_base64(), b.public_key_base64());
    }

    #[test]
    fn signed_body_verifies_over_timestamp_and_payload() {
        let signer = RequestSigner::generate();
        let body = signer.sign_body(1_700_000_000, b"hello");
        let decoded = decode_base64(body.as_bytes(), "body").unwrap();
        let sliced = slice_body(&decoded).unwrap();
        assert_eq!(sliced.payload, b"hello");

        let mut message = sliced.timestamp.to_vec();
        message.extend_from_slice(&sliced.payload);
        let key = signature::parse_public_key(&signer.public_bytes(), "Public-Key").unwrap();
        assert!(signature::verify(&key, &message, &sliced.signature).is_ok());
    }
}
