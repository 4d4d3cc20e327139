// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile services blob store.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cryptum_core::types::{ClearOutcome, Profile};
use cryptum_core::{CryptumError, StorageAdapter};
use tracing::debug;

/// Reads and writes the opaque services blob of provisioned profiles.
///
/// Profiles are never created here; an unknown key is `NotFound`.
#[derive(Clone)]
pub struct ProfileStore {
    storage: Arc<dyn StorageAdapter>,
}

impl ProfileStore {
    pub fn new(storage: Arc<dyn StorageAdapter>) -> Self {
        Self { storage }
    }

    pub async fn get(&self, public_key: &str) -> Result<Profile, CryptumError> {
        self.storage
            .get_profile(public_key)
            .await?
            .ok_or_else(CryptumError::profile_not_found)
    }

    /// The stored base64 services text, or `None` when nothing is stored.
    pub async fn services(&self, public_key: &str) -> Result<Option<String>, CryptumError> {
        let profile = self.get(public_key).await?;
        Ok(profile.stored_services().map(str::to_string))
    }

    /// Replace the services blob with `blob`, stored base64-encoded.
    pub async fn set_services(&self, public_key: &str, blob: &[u8]) -> Result<(), CryptumError> {
        let encoded = STANDARD.encode(blob);
        if !self.storage.set_services(public_key, &encoded).await? {
            return Err(CryptumError::profile_not_found());
        }
        debug!(len = blob.len(), "services updated");
        Ok(())
    }

    pub async fn clear_services(&self, public_key: &str) -> Result<ClearOutcome, CryptumError> {
        self.storage
            .clear_services(public_key)
            .await?
            .ok_or_else(CryptumError::profile_not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::storage;

    #[tokio::test]
    async fn unknown_profile_is_not_found() {
        let (storage, _dir) = storage().await;
        let store = ProfileStore::new(storage);

        assert!(matches!(
            store.get("ghost").await,
            Err(CryptumError::NotFound { .. })
        ));
        assert!(matches!(
            store.set_services("ghost", b"x").await,
            Err(CryptumError::NotFound { .. })
        ));
        assert!(matches!(
            store.clear_services("ghost").await,
            Err(CryptumError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn blob_round_trips_as_base64() {
        let (storage, _dir) = storage().await;
        storage.create_profile("pk").await.unwrap();
        let store = ProfileStore::new(storage);

        assert_eq!(store.services("pk").await.unwrap(), None);
        store.set_services("pk", b"hello").await.unwrap();
        assert_eq!(
            store.services("pk").await.unwrap().as_deref(),
            Some("aGVsbG8=")
        );
    }

    #[tokio::test]
    async fn clear_is_idempotent() {
        let (storage, _dir) = storage().await;
        storage.create_profile("pk").await.unwrap();
        let store = ProfileStore::new(storage);

        store.set_services("pk", b"hello").await.unwrap();
        assert_eq!(
            store.clear_services("pk").await.unwrap(),
            ClearOutcome::Cleared
        );
        assert_eq!(
            store.clear_services("pk").await.unwrap(),
            ClearOutcome::AlreadyEmpty
        );
        assert_eq!(store.services("pk").await.unwrap(), None);
    }

    #[tokio::test]
    async fn empty_blob_reads_as_no_content() {
        let (storage, _dir) = storage().await;
        storage.create_profile("pk").await.unwrap();
        let store = ProfileStore::new(storage);

        store.set_services("pk", b"").await.unwrap();
        assert_eq!(store.services("pk").await.unwrap(), None);
    }
}
