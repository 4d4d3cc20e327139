// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across adapter boundaries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A request-level operation exposed at the HTTP boundary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ProfileGet,
    ProfilePost,
    ProfileDelete,
    CredentialGet,
    CredentialPost,
    CredentialDelete,
}

/// A provisioned client profile.
///
/// `public_key` is the base64 text the client sends in the `Public-Key`
/// header. `services` is the base64 text of the opaque ciphertext blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub public_key: String,
    pub services: Option<String>,
}

impl Profile {
    /// Returns the stored blob, treating an empty blob the same as none.
    pub fn stored_services(&self) -> Option<&str> {
        self.services.as_deref().filter(|s| !s.is_empty())
    }
}

/// Result of clearing a profile's services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// A blob was stored and has been removed.
    Cleared,
    /// Nothing was stored.
    AlreadyEmpty,
}

/// A PIN-bound credential owned by a profile.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub id: i64,
    pub public_key: String,
    /// Base64 text of the client-side PIN hash.
    pub pin: String,
    /// Base64 text of the server-issued 32-byte capability token.
    pub protector: String,
    /// Base64 text of the opaque secret blob.
    pub entropy: Option<String>,
    /// RFC 3339 creation time; only used to order evictions.
    pub created_at: String,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("public_key", &self.public_key)
            .field("pin", &"[redacted]")
            .field("protector", &"[redacted]")
            .field("entropy", &self.entropy.as_ref().map(|_| "[redacted]"))
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// A credential about to be admitted.
#[derive(Clone)]
pub struct NewCredential {
    pub public_key: String,
    pub pin: String,
    pub protector: String,
    pub entropy: Option<String>,
}

impl std::fmt::Debug for NewCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewCredential")
            .field("public_key", &self.public_key)
            .field("pin", &"[redacted]")
            .field("protector", &"[redacted]")
            .field("entropy", &self.entropy.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

/// Outcome of a bounded credential insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Row id of the inserted credential.
    pub id: i64,
    /// Row id of the credential evicted to make room, if any.
    pub evicted: Option<i64>,
}
