// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Cryptum vault server.

use thiserror::Error;

/// Request authentication failures.
///
/// Every variant is a client-input error. They are raised before any storage
/// access, so a rejected request never has side effects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// A required header (or the request body) is absent or empty.
    #[error("{name} is required")]
    MissingField { name: String },

    /// A field is not valid base64, or decodes to the wrong shape.
    #[error("invalid {field} format")]
    InvalidFormat { field: String },

    /// The decoded body is shorter than the 68-byte signature + timestamp prefix.
    #[error("request body is too short ({len} bytes, need at least 68)")]
    BodyTooShort { len: usize },

    /// The timestamp lies outside the accepted freshness window.
    #[error("timestamp {timestamp} is too old or too new (server time {now})")]
    InvalidTimestamp { timestamp: u32, now: i64 },

    /// The Ed25519 signature does not match the signed content.
    #[error("invalid signature")]
    InvalidSignature,
}

impl AuthError {
    /// Name of the header or body field this error refers to.
    ///
    /// Used as the key of the `{field: message}` body of a 400 response.
    pub fn field(&self) -> &str {
        match self {
            AuthError::MissingField { name } => name,
            AuthError::InvalidFormat { field } => field,
            AuthError::BodyTooShort { .. } => "body",
            AuthError::InvalidTimestamp { .. } => "Timestamp",
            AuthError::InvalidSignature => "Signature",
        }
    }

    pub fn missing(name: &str) -> Self {
        AuthError::MissingField {
            name: name.to_string(),
        }
    }

    pub fn invalid_format(field: &str) -> Self {
        AuthError::InvalidFormat {
            field: field.to_string(),
        }
    }
}

/// The primary error type used across all Cryptum crates.
#[derive(Debug, Error)]
pub enum CryptumError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Request authentication failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// The addressed profile or credential does not exist.
    ///
    /// Surfaced as 403 so callers cannot probe which public keys are registered.
    #[error("{entity} not found")]
    NotFound { entity: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CryptumError {
    pub fn profile_not_found() -> Self {
        CryptumError::NotFound {
            entity: "profile".to_string(),
        }
    }

    pub fn credential_not_found() -> Self {
        CryptumError::NotFound {
            entity: "credential".to_string(),
        }
    }
}
