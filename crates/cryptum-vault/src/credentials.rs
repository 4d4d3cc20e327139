// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded PIN credential admission.
//!
//! A profile holds at most `capacity` credentials. Admitting one more evicts
//! exactly one, the oldest by creation time. The storage backend performs the
//! count, eviction, and insert atomically.

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cryptum_core::types::{Credential, NewCredential};
use cryptum_core::{CryptumError, StorageAdapter};
use tracing::{debug, info};

use crate::protector::generate_protector;

/// Default number of credentials a profile may hold.
pub const DEFAULT_CAPACITY: usize = 10;

/// Creates, looks up, and deletes credentials for provisioned profiles.
#[derive(Clone)]
pub struct CredentialAdmission {
    storage: Arc<dyn StorageAdapter>,
    capacity: usize,
}

impl CredentialAdmission {
    pub fn new(storage: Arc<dyn StorageAdapter>, capacity: usize) -> Self {
        Self {
            storage,
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    async fn require_profile(&self, public_key: &str) -> Result<(), CryptumError> {
        match self.storage.get_profile(public_key).await? {
            Some(_) => Ok(()),
            None => Err(CryptumError::profile_not_found()),
        }
    }

    /// Find a credential by profile and protector, and by pin when given.
    pub async fn lookup(
        &self,
        public_key: &str,
        protector: &str,
        pin: Option<&str>,
    ) -> Result<Credential, CryptumError> {
        self.require_profile(public_key).await?;
        self.storage
            .find_credential(public_key, protector, pin)
            .await?
            .ok_or_else(CryptumError::credential_not_found)
    }

    /// Store `entropy` under a fresh protector, evicting the oldest credential
    /// when the profile is full. Returns the protector.
    pub async fn create(
        &self,
        public_key: &str,
        pin: &str,
        entropy: &[u8],
    ) -> Result<String, CryptumError> {
        self.require_profile(public_key).await?;

        let protector = generate_protector()?;
        let credential = NewCredential {
            public_key: public_key.to_string(),
            pin: pin.to_string(),
            protector: protector.clone(),
            entropy: Some(STANDARD.encode(entropy)),
        };

        let admission = self
            .storage
            .admit_credential(&credential, self.capacity)
            .await?;
        if let Some(evicted) = admission.evicted {
            info!(
                evicted,
                capacity = self.capacity,
                "credential limit reached, evicted oldest"
            );
        }
        debug!(id = admission.id, "credential created");
        Ok(protector)
    }

    /// Delete a credential by profile and protector; the pin is not required.
    pub async fn delete(&self, public_key: &str, protector: &str) -> Result<(), CryptumError> {
        self.require_profile(public_key).await?;
        if !self.storage.delete_credential(public_key, protector).await? {
            return Err(CryptumError::credential_not_found());
        }
        debug!("credential deleted");
        Ok(())
    }

    /// A profile's credentials, oldest first.
    pub async fn list(&self, public_key: &str) -> Result<Vec<Credential>, CryptumError> {
        self.require_profile(public_key).await?;
        self.storage.list_credentials(public_key).await
    }
}
