// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile blob store and PIN credential admission for the Cryptum vault server.
//!
//! Both services sit on an `Arc<dyn StorageAdapter>` and assume the caller
//! has already authenticated the request. Opaque payloads are stored
//! base64-encoded and never interpreted.

pub mod credentials;
pub mod profiles;
pub mod protector;

pub use credentials::{CredentialAdmission, DEFAULT_CAPACITY};
pub use profiles::ProfileStore;
pub use protector::generate_protector;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use cryptum_config::model::StorageConfig;
    use cryptum_core::StorageAdapter;
    use cryptum_storage::SqliteStorage;

    /// An initialized SQLite storage in a throwaway directory.
    pub async fn storage() -> (Arc<dyn StorageAdapter>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::new(StorageConfig {
            database_path: dir.path().join("vault.db").to_string_lossy().into_owned(),
            wal_mode: true,
        });
        storage.initialize().await.unwrap();
        (Arc::new(storage), dir)
    }
}
