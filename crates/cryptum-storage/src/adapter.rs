// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use cryptum_config::model::StorageConfig;
use cryptum_core::types::{Admission, ClearOutcome, Credential, NewCredential, Profile};
use cryptum_core::{CryptumError, HealthStatus, PluginAdapter, StorageAdapter};

use crate::database::Database;
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily initialized on the first
/// call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: StorageAdapter::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, CryptumError> {
        self.db.get().ok_or_else(|| CryptumError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), CryptumError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, CryptumError> {
        let db = match self.db() {
            Ok(db) => db,
            Err(e) => return Ok(HealthStatus::Unhealthy(e.to_string())),
        };
        let probe = db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await;
        Ok(match probe {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        })
    }

    async fn shutdown(&self) -> Result<(), CryptumError> {
        // Shutdown delegates to close if the DB was initialized.
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), CryptumError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| CryptumError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), CryptumError> {
        Self::checkpoint(self.db()?).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Provisioning ---

    async fn create_profile(&self, public_key: &str) -> Result<bool, CryptumError> {
        queries::profiles::create_profile(self.db()?, public_key).await
    }

    async fn delete_profile(&self, public_key: &str) -> Result<bool, CryptumError> {
        queries::profiles::delete_profile(self.db()?, public_key).await
    }

    // --- Profiles ---

    async fn get_profile(&self, public_key: &str) -> Result<Option<Profile>, CryptumError> {
        queries::profiles::get_profile(self.db()?, public_key).await
    }

    async fn set_services(&self, public_key: &str, services: &str) -> Result<bool, CryptumError> {
        queries::profiles::set_services(self.db()?, public_key, services).await
    }

    async fn clear_services(
        &self,
        public_key: &str,
    ) -> Result<Option<ClearOutcome>, CryptumError> {
        queries::profiles::clear_services(self.db()?, public_key).await
    }

    // --- Credentials ---

    async fn find_credential(
        &self,
        public_key: &str,
        protector: &str,
        pin: Option<&str>,
    ) -> Result<Option<Credential>, CryptumError> {
        queries::credentials::find_credential(self.db()?, public_key, protector, pin).await
    }

    async fn admit_credential(
        &self,
        credential: &NewCredential,
        capacity: usize,
    ) -> Result<Admission, CryptumError> {
        queries::credentials::admit_credential(self.db()?, credential, capacity).await
    }

    async fn delete_credential(
        &self,
        public_key: &str,
        protector: &str,
    ) -> Result<bool, CryptumError> {
        queries::credentials::delete_credential(self.db()?, public_key, protector).await
    }

    async fn list_credentials(&self, public_key: &str) -> Result<Vec<Credential>, CryptumError> {
        queries::credentials::list_credentials(self.db()?, public_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_config(dir: &tempfile::TempDir) -> StorageConfig {
        StorageConfig {
            database_path: dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn initialize_then_health_check() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(test_config(&dir));
        storage.initialize().await.unwrap();

        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        assert_eq!(storage.name(), "sqlite");
        storage.close().await.unwrap();
    }

    #[tokio::test]
    async fn uninitialized_storage_is_unhealthy() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(test_config(&dir));
        assert!(matches!(
            storage.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
        assert!(storage.get_profile("pk").await.is_err());
    }

    #[tokio::test]
    async fn double_initialize_fails() {
        let dir = tempdir().unwrap();
        let storage = SqliteStorage::new(test_config(&dir));
        storage.initialize().await.unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let storage = SqliteStorage::new(test_config(&dir));
            storage.initialize().await.unwrap();
            storage.create_profile("pk").await.unwrap();
            storage.set_services("pk", "aGVsbG8=").await.unwrap();
            storage.shutdown().await.unwrap();
        }

        let storage = SqliteStorage::new(test_config(&dir));
        storage.initialize().await.unwrap();
        let profile = storage.get_profile("pk").await.unwrap().unwrap();
        assert_eq!(profile.stored_services(), Some("aGVsbG8="));
    }
}
