// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile CRUD operations.

use cryptum_core::CryptumError;
use cryptum_core::types::{ClearOutcome, Profile};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

/// Create an empty profile. Returns `false` if one already exists for the key.
pub async fn create_profile(db: &Database, public_key: &str) -> Result<bool, CryptumError> {
    let public_key = public_key.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO profiles (public_key, services) VALUES (?1, NULL)",
                params![public_key],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a profile; its credentials go with it.
pub async fn delete_profile(db: &Database, public_key: &str) -> Result<bool, CryptumError> {
    let public_key = public_key.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute(
                "DELETE FROM profiles WHERE public_key = ?1",
                params![public_key],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Get a profile by public key.
pub async fn get_profile(db: &Database, public_key: &str) -> Result<Option<Profile>, CryptumError> {
    let public_key = public_key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Profile>, rusqlite::Error> {
            conn.query_row(
                "SELECT public_key, services FROM profiles WHERE public_key = ?1",
                params![public_key],
                |row| {
                    Ok(Profile {
                        public_key: row.get(0)?,
                        services: row.get(1)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the services blob. Returns `false` if the profile does not exist.
pub async fn set_services(
    db: &Database,
    public_key: &str,
    services: &str,
) -> Result<bool, CryptumError> {
    let public_key = public_key.to_string();
    let services = services.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE profiles SET services = ?2 WHERE public_key = ?1",
                params![public_key, services],
            )?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Clear the services blob, reporting whether anything was stored.
pub async fn clear_services(
    db: &Database,
    public_key: &str,
) -> Result<Option<ClearOutcome>, CryptumError> {
    let public_key = public_key.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<ClearOutcome>, rusqlite::Error> {
            let tx = conn.transaction()?;
            let current: Option<Option<String>> = tx
                .query_row(
                    "SELECT services FROM profiles WHERE public_key = ?1",
                    params![public_key],
                    |row| row.get(0),
                )
                .optional()?;

            let outcome = match current {
                None => None,
                Some(None) => Some(ClearOutcome::AlreadyEmpty),
                Some(Some(blob)) if blob.is_empty() => Some(ClearOutcome::AlreadyEmpty),
                Some(Some(_)) => {
                    tx.execute(
                        "UPDATE profiles SET services = NULL WHERE public_key = ?1",
                        params![public_key],
                    )?;
                    Some(ClearOutcome::Cleared)
                }
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}
