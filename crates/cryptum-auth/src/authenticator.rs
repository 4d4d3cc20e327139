// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-operation request authentication.
//!
//! Each [`Operation`] has a fixed [`OperationAuth`] entry naming the headers
//! it requires, where its timestamp (and signature) travel, and which bytes
//! the signature covers. [`RequestAuthenticator::authenticate`] applies that
//! entry in a fixed order: `Public-Key` presence and decoding, presence of
//! the remaining headers, their decoding, timestamp freshness, then
//! signature. Nothing here touches storage.

use cryptum_core::{AuthError, Operation};

use crate::codec::{self, SIGNATURE_LEN, TIMESTAMP_LEN};
use crate::signature;
use crate::timestamp::TimestampWindow;

/// Header names as sent by vault clients.
pub mod header {
    pub const PUBLIC_KEY: &str = "Public-Key";
    pub const TIMESTAMP: &str = "Timestamp";
    pub const SIGNATURE: &str = "Signature";
    pub const HASHED_PIN: &str = "Hashed-Pin";
    pub const PROTECTOR: &str = "Protector";
}

/// Field name used for errors about the request body.
pub const BODY_FIELD: &str = "body";

/// Where an operation carries its timestamp and signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofLocation {
    /// `Timestamp` (and `Signature`, when signed) headers.
    Headers,
    /// A base64 body of `signature ‖ timestamp ‖ payload`.
    Body,
}

/// Builds the byte string a signature covers from the timestamp and payload.
pub type SignedMessageFn = fn(&[u8; TIMESTAMP_LEN], &[u8]) -> Vec<u8>;

/// Authentication requirements of a single operation.
#[derive(Debug, Clone, Copy)]
pub struct OperationAuth {
    pub operation: Operation,
    pub required_headers: &'static [&'static str],
    pub proof: ProofLocation,
    /// `None` for operations that carry no signature.
    pub signed_message: Option<SignedMessageFn>,
}

impl OperationAuth {
    pub fn requires_signature(&self) -> bool {
        self.signed_message.is_some()
    }

    fn requires(&self, name: &str) -> bool {
        self.required_headers.contains(&name)
    }
}

fn timestamp_only(timestamp: &[u8; TIMESTAMP_LEN], _payload: &[u8]) -> Vec<u8> {
    timestamp.to_vec()
}

fn timestamp_and_payload(timestamp: &[u8; TIMESTAMP_LEN], payload: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(TIMESTAMP_LEN + payload.len());
    message.extend_from_slice(timestamp);
    message.extend_from_slice(payload);
    message
}

const PROFILE_READ: OperationAuth = OperationAuth {
    operation: Operation::ProfileGet,
    required_headers: &[header::PUBLIC_KEY, header::TIMESTAMP, header::SIGNATURE],
    proof: ProofLocation::Headers,
    signed_message: Some(timestamp_only),
};

/// Look up the authentication entry for an operation.
pub fn operation_auth(operation: Operation) -> OperationAuth {
    match operation {
        Operation::ProfileGet => PROFILE_READ,
        Operation::ProfileDelete => OperationAuth {
            operation,
            ..PROFILE_READ
        },
        Operation::ProfilePost => OperationAuth {
            operation,
            required_headers: &[header::PUBLIC_KEY],
            proof: ProofLocation::Body,
            signed_message: Some(timestamp_and_payload),
        },
        Operation::CredentialGet => OperationAuth {
            operation,
            required_headers: &[
                header::PUBLIC_KEY,
                header::HASHED_PIN,
                header::PROTECTOR,
                header::TIMESTAMP,
            ],
            proof: ProofLocation::Headers,
            signed_message: None,
        },
        Operation::CredentialPost => OperationAuth {
            operation,
            required_headers: &[header::PUBLIC_KEY, header::HASHED_PIN],
            proof: ProofLocation::Body,
            signed_message: Some(timestamp_and_payload),
        },
        Operation::CredentialDelete => OperationAuth {
            operation,
            required_headers: &[header::PUBLIC_KEY, header::PROTECTOR, header::TIMESTAMP],
            proof: ProofLocation::Headers,
            signed_message: None,
        },
    }
}

/// Read access to request headers by case-insensitive name.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<&[u8]>;
}

impl HeaderSource for http::HeaderMap {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.get(name).map(|value| value.as_bytes())
    }
}

impl<K: AsRef<str>, V: AsRef<[u8]>> HeaderSource for [(K, V)] {
    fn header(&self, name: &str) -> Option<&[u8]> {
        self.iter()
            .find(|(k, _)| k.as_ref().eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_ref())
    }
}

/// The validated identity and inputs of an accepted request.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedRequest {
    pub operation: Operation,
    /// `Public-Key` header text, used as the profile identifier.
    pub public_key: String,
    /// `Hashed-Pin` header text, when the operation requires it.
    pub hashed_pin: Option<String>,
    /// `Protector` header text, when the operation requires it.
    pub protector: Option<String>,
    pub timestamp: u32,
    /// Signed payload bytes; empty for header-only operations.
    pub payload: Vec<u8>,
}

impl std::fmt::Debug for AuthenticatedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedRequest")
            .field("operation", &self.operation)
            .field("public_key", &self.public_key)
            .field("hashed_pin", &self.hashed_pin.as_ref().map(|_| "[redacted]"))
            .field("protector", &self.protector.as_ref().map(|_| "[redacted]"))
            .field("timestamp", &self.timestamp)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}

/// Validates signed requests against the operation table.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAuthenticator {
    window: TimestampWindow,
}

impl RequestAuthenticator {
    pub fn new(window: TimestampWindow) -> Self {
        Self { window }
    }

    pub fn window(&self) -> TimestampWindow {
        self.window
    }

    /// Authenticate against the current system clock.
    pub fn authenticate<H: HeaderSource + ?Sized>(
        &self,
        operation: Operation,
        headers: &H,
        body: &[u8],
    ) -> Result<AuthenticatedRequest, AuthError> {
        self.authenticate_at(operation, headers, body, chrono::Utc::now().timestamp())
    }

    /// Authenticate with an explicit `now` in Unix seconds.
    pub fn authenticate_at<H: HeaderSource + ?Sized>(
        &self,
        operation: Operation,
        headers: &H,
        body: &[u8],
        now: i64,
    ) -> Result<AuthenticatedRequest, AuthError> {
        let entry = operation_auth(operation);

        let public_key_text = require_header(headers, header::PUBLIC_KEY)?;
        let public_key_bytes = codec::decode_base64(public_key_text, header::PUBLIC_KEY)?;

        for name in entry.required_headers {
            require_header(headers, name)?;
        }

        let hashed_pin = optional_base64_text(headers, &entry, header::HASHED_PIN)?;
        let protector = optional_base64_text(headers, &entry, header::PROTECTOR)?;

        let (timestamp_raw, signature_raw, payload) = match entry.proof {
            ProofLocation::Headers => {
                let ts = require_header(headers, header::TIMESTAMP)?;
                let ts = codec::decode_fixed::<TIMESTAMP_LEN>(ts, header::TIMESTAMP)?;
                let sig = if entry.requires_signature() {
                    let sig = require_header(headers, header::SIGNATURE)?;
                    Some(codec::decode_fixed::<SIGNATURE_LEN>(
                        sig,
                        header::SIGNATURE,
                    )?)
                } else {
                    None
                };
                (ts, sig, Vec::new())
            }
            ProofLocation::Body => {
                let body = codec::unquote_body(body);
                if body.trim_ascii().is_empty() {
                    return Err(AuthError::missing(BODY_FIELD));
                }
                let decoded = codec::decode_base64(body, BODY_FIELD)?;
                let sliced = codec::slice_body(&decoded)?;
                (sliced.timestamp, Some(sliced.signature), sliced.payload)
            }
        };

        let timestamp = self.window.check(timestamp_raw, now)?;

        if let (Some(build_message), Some(signature_raw)) = (entry.signed_message, signature_raw)
        {
            let key = signature::parse_public_key(&public_key_bytes, header::PUBLIC_KEY)?;
            let message = build_message(&timestamp_raw, &payload);
            signature::verify(&key, &message, &signature_raw)?;
        }

        tracing::debug!(%operation, timestamp, "request authenticated");

        Ok(AuthenticatedRequest {
            operation,
            public_key: header_text(public_key_text),
            hashed_pin,
            protector,
            timestamp,
            payload,
        })
    }
}

/// Returns the trimmed header value, or `MissingField` when absent or blank.
fn require_header<'a, H: HeaderSource + ?Sized>(
    headers: &'a H,
    name: &str,
) -> Result<&'a [u8], AuthError> {
    headers
        .header(name)
        .map(<[u8]>::trim_ascii)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AuthError::missing(name))
}

/// Validates a required base64 header and keeps it as text.
fn optional_base64_text<H: HeaderSource + ?Sized>(
    headers: &H,
    entry: &OperationAuth,
    name: &str,
) -> Result<Option<String>, AuthError> {
    if !entry.requires(name) {
        return Ok(None);
    }
    let raw = require_header(headers, name)?;
    codec::decode_base64(raw, name)?;
    Ok(Some(header_text(raw)))
}

// Decoded successfully as base64, so the bytes are ASCII.
fn header_text(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_base64;
    use crate::signer::RequestSigner;
    use crate::timestamp;

    const NOW: i64 = 1_700_000_000;

    fn auth() -> RequestAuthenticator {
        RequestAuthenticator::default()
    }

    fn profile_headers(signer: &RequestSigner, at: i64) -> Vec<(&'static str, String)> {
        let signed = signer.sign_timestamp(at);
        vec![
            (header::PUBLIC_KEY, signed.public_key),
            (header::TIMESTAMP, signed.timestamp),
            (header::SIGNATURE, signed.signature),
        ]
    }

    #[test]
    fn table_matches_operation_requirements() {
        assert!(operation_auth(Operation::ProfileGet).requires_signature());
        assert!(operation_auth(Operation::ProfileDelete).requires_signature());
        assert!(operation_auth(Operation::ProfilePost).requires_signature());
        assert!(operation_auth(Operation::CredentialPost).requires_signature());
        assert!(!operation_auth(Operation::CredentialGet).requires_signature());
        assert!(!operation_auth(Operation::CredentialDelete).requires_signature());

        assert_eq!(
            operation_auth(Operation::ProfileDelete).operation,
            Operation::ProfileDelete
        );
        assert_eq!(
            operation_auth(Operation::CredentialPost).proof,
            ProofLocation::Body
        );
    }

    #[test]
    fn profile_get_accepts_signed_timestamp() {
        let signer = RequestSigner::generate();
        let headers = profile_headers(&signer, NOW);
        let req = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap();
        assert_eq!(req.public_key, signer.public_key_base64());
        assert_eq!(req.timestamp, NOW as u32);
        assert!(req.payload.is_empty());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let signer = RequestSigner::generate();
        let signed = signer.sign_timestamp(NOW);
        let headers = vec![
            ("public-key", signed.public_key),
            ("TIMESTAMP", signed.timestamp),
            ("signature", signed.signature),
        ];
        assert!(
            auth()
                .authenticate_at(Operation::ProfileDelete, &headers[..], b"", NOW)
                .is_ok()
        );
    }

    #[test]
    fn http_header_map_is_a_header_source() {
        let signer = RequestSigner::generate();
        let signed = signer.sign_timestamp(NOW);
        let mut map = http::HeaderMap::new();
        map.insert("public-key", signed.public_key.parse().unwrap());
        map.insert("timestamp", signed.timestamp.parse().unwrap());
        map.insert("signature", signed.signature.parse().unwrap());
        assert!(
            auth()
                .authenticate_at(Operation::ProfileGet, &map, b"", NOW)
                .is_ok()
        );
    }

    #[test]
    fn missing_public_key_is_reported_first() {
        let headers: Vec<(&str, String)> = vec![];
        let err = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::missing(header::PUBLIC_KEY));
    }

    #[test]
    fn blank_header_counts_as_missing() {
        let signer = RequestSigner::generate();
        let mut headers = profile_headers(&signer, NOW);
        headers[2].1 = "   ".to_string();
        let err = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::missing(header::SIGNATURE));
    }

    #[test]
    fn malformed_public_key_is_a_format_error() {
        let signer = RequestSigner::generate();
        let mut headers = profile_headers(&signer, NOW);
        headers[0].1 = "%%%".to_string();
        let err = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::invalid_format(header::PUBLIC_KEY));
    }

    #[test]
    fn short_timestamp_is_a_format_error() {
        let signer = RequestSigner::generate();
        let mut headers = profile_headers(&signer, NOW);
        headers[1].1 = encode_base64(&[1, 2, 3]);
        let err = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::invalid_format(header::TIMESTAMP));
    }

    #[test]
    fn stale_timestamp_fails_even_with_valid_signature() {
        let signer = RequestSigner::generate();
        let headers = profile_headers(&signer, NOW - 301);
        let err = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidTimestamp { .. }));
    }

    #[test]
    fn signature_from_other_key_is_rejected() {
        let signer = RequestSigner::generate();
        let other = RequestSigner::generate();
        let mut headers = profile_headers(&signer, NOW);
        headers[2].1 = other.sign_timestamp(NOW).signature;
        let err = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn profile_post_verifies_body_signature() {
        let signer = RequestSigner::generate();
        let body = signer.sign_body(NOW, b"hello");
        let headers = vec![(header::PUBLIC_KEY, signer.public_key_base64())];
        let req = auth()
            .authenticate_at(Operation::ProfilePost, &headers[..], body.as_bytes(), NOW)
            .unwrap();
        assert_eq!(req.payload, b"hello");
    }

    #[test]
    fn profile_post_with_tampered_payload_fails() {
        let signer = RequestSigner::generate();
        let body = signer.sign_body(NOW, b"hello");
        let mut decoded = codec::decode_base64(body.as_bytes(), "body").unwrap();
        let last = decoded.len() - 1;
        decoded[last] ^= 0x01;
        let tampered = encode_base64(&decoded);

        let headers = vec![(header::PUBLIC_KEY, signer.public_key_base64())];
        let err = auth()
            .authenticate_at(Operation::ProfilePost, &headers[..], tampered.as_bytes(), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn json_quoted_body_is_accepted() {
        let signer = RequestSigner::generate();
        let body = format!("\"{}\"", signer.sign_body(NOW, b"hello"));
        let headers = vec![(header::PUBLIC_KEY, signer.public_key_base64())];
        let req = auth()
            .authenticate_at(Operation::ProfilePost, &headers[..], body.as_bytes(), NOW)
            .unwrap();
        assert_eq!(req.payload, b"hello");
    }

    #[test]
    fn empty_json_string_body_is_missing() {
        let signer = RequestSigner::generate();
        let headers = vec![(header::PUBLIC_KEY, signer.public_key_base64())];
        let err = auth()
            .authenticate_at(Operation::ProfilePost, &headers[..], b"\"\"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::missing(BODY_FIELD));
    }

    #[test]
    fn malformed_public_key_is_reported_before_missing_timestamp() {
        let headers = vec![(header::PUBLIC_KEY, "%%%".to_string())];
        let err = auth()
            .authenticate_at(Operation::ProfileGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::invalid_format(header::PUBLIC_KEY));
    }

    #[test]
    fn credential_post_with_tampered_entropy_fails() {
        let signer = RequestSigner::generate();
        let body = signer.sign_body(NOW, b"entropy");
        let mut decoded = codec::decode_base64(body.as_bytes(), BODY_FIELD).unwrap();
        let last = decoded.len() - 1;
        decoded[last] ^= 0x01;
        let tampered = encode_base64(&decoded);

        let headers = vec![
            (header::PUBLIC_KEY, signer.public_key_base64()),
            (header::HASHED_PIN, encode_base64(b"pin-hash")),
        ];
        let err = auth()
            .authenticate_at(Operation::CredentialPost, &headers[..], tampered.as_bytes(), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn credential_post_signature_must_cover_timestamp() {
        let signer = RequestSigner::generate();
        let ts = timestamp::encode(NOW);
        let mut body = signer.sign(b"entropy").to_vec();
        body.extend_from_slice(&ts);
        body.extend_from_slice(b"entropy");

        let headers = vec![
            (header::PUBLIC_KEY, signer.public_key_base64()),
            (header::HASHED_PIN, encode_base64(b"pin-hash")),
        ];
        let err = auth()
            .authenticate_at(
                Operation::CredentialPost,
                &headers[..],
                encode_base64(&body).as_bytes(),
                NOW,
            )
            .unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn empty_body_is_missing() {
        let signer = RequestSigner::generate();
        let headers = vec![(header::PUBLIC_KEY, signer.public_key_base64())];
        let err = auth()
            .authenticate_at(Operation::ProfilePost, &headers[..], b"  ", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::missing(BODY_FIELD));
    }

    #[test]
    fn short_body_is_rejected() {
        let signer = RequestSigner::generate();
        let headers = vec![(header::PUBLIC_KEY, signer.public_key_base64())];
        let body = encode_base64(&[0u8; 67]);
        let err = auth()
            .authenticate_at(Operation::ProfilePost, &headers[..], body.as_bytes(), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::BodyTooShort { len: 67 });
    }

    #[test]
    fn non_point_public_key_on_signed_op_is_a_format_error() {
        let signer = RequestSigner::generate();
        let body = signer.sign_body(NOW, b"x");
        let headers = vec![(header::PUBLIC_KEY, encode_base64(&[0u8; 16]))];
        let err = auth()
            .authenticate_at(Operation::ProfilePost, &headers[..], body.as_bytes(), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::invalid_format(header::PUBLIC_KEY));
    }

    #[test]
    fn credential_post_requires_hashed_pin() {
        let signer = RequestSigner::generate();
        let body = signer.sign_body(NOW, b"entropy");
        let headers = vec![(header::PUBLIC_KEY, signer.public_key_base64())];
        let err = auth()
            .authenticate_at(Operation::CredentialPost, &headers[..], body.as_bytes(), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::missing(header::HASHED_PIN));
    }

    #[test]
    fn credential_post_keeps_pin_text() {
        let signer = RequestSigner::generate();
        let pin = encode_base64(b"pin-hash");
        let body = signer.sign_body(NOW, b"entropy");
        let headers = vec![
            (header::PUBLIC_KEY, signer.public_key_base64()),
            (header::HASHED_PIN, pin.clone()),
        ];
        let req = auth()
            .authenticate_at(Operation::CredentialPost, &headers[..], body.as_bytes(), NOW)
            .unwrap();
        assert_eq!(req.hashed_pin.as_deref(), Some(pin.as_str()));
        assert_eq!(req.payload, b"entropy");
        assert!(req.protector.is_none());
    }

    #[test]
    fn credential_get_needs_no_signature() {
        let pk = encode_base64(&[9u8; 32]);
        let headers = vec![
            (header::PUBLIC_KEY, pk.clone()),
            (header::HASHED_PIN, encode_base64(b"pin")),
            (header::PROTECTOR, encode_base64(&[1u8; 32])),
            (header::TIMESTAMP, encode_base64(&timestamp::encode(NOW))),
        ];
        let req = auth()
            .authenticate_at(Operation::CredentialGet, &headers[..], b"", NOW)
            .unwrap();
        assert_eq!(req.public_key, pk);
        assert!(req.protector.is_some());
    }

    #[test]
    fn credential_get_still_checks_freshness() {
        let headers = vec![
            (header::PUBLIC_KEY, encode_base64(&[9u8; 32])),
            (header::HASHED_PIN, encode_base64(b"pin")),
            (header::PROTECTOR, encode_base64(&[1u8; 32])),
            (header::TIMESTAMP, encode_base64(&timestamp::encode(NOW - 1000))),
        ];
        let err = auth()
            .authenticate_at(Operation::CredentialGet, &headers[..], b"", NOW)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidTimestamp { .. }));
    }

    #[test]
    fn credential_delete_rejects_malformed_protector() {
        let headers = vec![
            (header::PUBLIC_KEY, encode_base64(&[9u8; 32])),
            (header::PROTECTOR, "not*base64".to_string()),
            (header::TIMESTAMP, encode_base64(&timestamp::encode(NOW))),
        ];
        let err = auth()
            .authenticate_at(Operation::CredentialDelete, &headers[..], b"", NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::invalid_format(header::PROTECTOR));
    }

    #[test]
    fn debug_redacts_pin_and_protector() {
        let req = AuthenticatedRequest {
            operation: Operation::CredentialGet,
            public_key: "pk".to_string(),
            hashed_pin: Some("SECRETPIN".to_string()),
            protector: Some("SECRETPROT".to_string()),
            timestamp: 1,
            payload: vec![],
        };
        let debug = format!("{req:?}");
        assert!(!debug.contains("SECRETPIN"));
        assert!(!debug.contains("SECRETPROT"));
    }
}
