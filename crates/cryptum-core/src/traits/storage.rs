// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for the profile and credential relations.

use async_trait::async_trait;

use crate::error::CryptumError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Admission, ClearOutcome, Credential, NewCredential, Profile};

/// Adapter for persistence backends.
///
/// Profiles are keyed by the base64 public key text. Credentials belong to
/// exactly one profile and are removed with it.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), CryptumError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), CryptumError>;

    // --- Provisioning ---

    /// Creates an empty profile. Returns `false` if it already existed.
    async fn create_profile(&self, public_key: &str) -> Result<bool, CryptumError>;

    /// Deletes a profile and its credentials. Returns `false` if it did not exist.
    async fn delete_profile(&self, public_key: &str) -> Result<bool, CryptumError>;

    // --- Profiles ---

    async fn get_profile(&self, public_key: &str) -> Result<Option<Profile>, CryptumError>;

    /// Replaces the stored services blob. Returns `false` if the profile does not exist.
    async fn set_services(&self, public_key: &str, services: &str) -> Result<bool, CryptumError>;

    /// Clears the stored services blob. Returns `None` if the profile does not exist.
    async fn clear_services(&self, public_key: &str)
    -> Result<Option<ClearOutcome>, CryptumError>;

    // --- Credentials ---

    /// Finds a credential by profile and protector, and by pin when given.
    async fn find_credential(
        &self,
        public_key: &str,
        protector: &str,
        pin: Option<&str>,
    ) -> Result<Option<Credential>, CryptumError>;

    /// Inserts a credential, first evicting the single oldest one when the
    /// profile already holds `capacity` or more.
    ///
    /// Implementations must run the count, evict, and insert steps atomically
    /// with respect to other writers on the same profile.
    async fn admit_credential(
        &self,
        credential: &NewCredential,
        capacity: usize,
    ) -> Result<Admission, CryptumError>;

    /// Deletes a credential by profile and protector. Returns `false` if none matched.
    async fn delete_credential(
        &self,
        public_key: &str,
        protector: &str,
    ) -> Result<bool, CryptumError>;

    /// Lists a profile's credentials, oldest first.
    async fn list_credentials(&self, public_key: &str) -> Result<Vec<Credential>, CryptumError>;
}
