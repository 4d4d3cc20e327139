// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile provisioning and credential inspection commands.
//!
//! Profiles are only ever created here, never by the HTTP API.

use cryptum_auth::codec::decode_base64;
use cryptum_auth::header;
use cryptum_config::model::StorageConfig;
use cryptum_core::{CryptumError, StorageAdapter};
use cryptum_storage::SqliteStorage;

async fn open_storage(config: &StorageConfig) -> Result<SqliteStorage, CryptumError> {
    let storage = SqliteStorage::new(config.clone());
    storage.initialize().await?;
    Ok(storage)
}

/// Keys are stored as the base64 text clients send, so reject anything else.
fn check_key(public_key: &str) -> Result<&str, CryptumError> {
    let public_key = public_key.trim();
    decode_base64(public_key.as_bytes(), header::PUBLIC_KEY)?;
    Ok(public_key)
}

/// `cryptum add-key`: provision a profile for a public key.
pub async fn add_key(config: &StorageConfig, public_key: &str) -> Result<String, CryptumError> {
    let public_key = check_key(public_key)?;
    let storage = open_storage(config).await?;
    let created = storage.create_profile(public_key).await?;
    storage.close().await?;

    Ok(if created {
        format!("Added public key {public_key}")
    } else {
        format!("Public key {public_key} already exists")
    })
}

/// `cryptum delete-key`: remove a profile and all of its credentials.
pub async fn delete_key(config: &StorageConfig, public_key: &str) -> Result<String, CryptumError> {
    let public_key = check_key(public_key)?;
    let storage = open_storage(config).await?;
    let deleted = storage.delete_profile(public_key).await?;
    storage.close().await?;

    Ok(if deleted {
        format!("Deleted public key {public_key}")
    } else {
        format!("Public key {public_key} does not exist")
    })
}

/// `cryptum list-credentials`: show credential ids and creation times, oldest first.
pub async fn list_credentials(
    config: &StorageConfig,
    public_key: &str,
) -> Result<String, CryptumError> {
    let public_key = check_key(public_key)?;
    let storage = open_storage(config).await?;
    if storage.get_profile(public_key).await?.is_none() {
        storage.close().await?;
        return Ok(format!("Public key {public_key} does not exist"));
    }
    let credentials = storage.list_credentials(public_key).await?;
    storage.close().await?;

    if credentials.is_empty() {
        return Ok("No credentials".to_string());
    }
    let lines: Vec<String> = credentials
        .iter()
        .map(|c| format!("{:>6}  {}", c.id, c.created_at))
        .collect();
    Ok(lines.join("\n"))
}
