// SPDX-FileCopyrightText: 2026 Cryptum Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential queries and the bounded admission transaction.

use cryptum_core::CryptumError;
use cryptum_core::types::{Admission, Credential, NewCredential};
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use tracing::debug;

use crate::database::{Database, map_tr_err};

const CREDENTIAL_COLUMNS: &str = "id, public_key, pin, protector, entropy, created_at";

fn row_to_credential(row: &rusqlite::Row<'_>) -> Result<Credential, rusqlite::Error> {
    Ok(Credential {
        id: row.get(0)?,
        public_key: row.get(1)?,
        pin: row.get(2)?,
        protector: row.get(3)?,
        entropy: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Find a credential by owner and protector, also matching `pin` when given.
pub async fn find_credential(
    db: &Database,
    public_key: &str,
    protector: &str,
    pin: Option<&str>,
) -> Result<Option<Credential>, CryptumError> {
    let public_key = public_key.to_string();
    let protector = protector.to_string();
    let pin = pin.map(str::to_string);
    db.connection()
        .call(move |conn| -> Result<Option<Credential>, rusqlite::Error> {
            let sql = format!(
                "SELECT {CREDENTIAL_COLUMNS} FROM credentials
                 WHERE public_key = ?1 AND protector = ?2 AND (?3 IS NULL OR pin = ?3)
                 ORDER BY id DESC LIMIT 1"
            );
            conn.query_row(&sql, params![public_key, protector, pin], row_to_credential)
                .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert a credential, evicting the oldest first when the profile is at capacity.
///
/// Count, evict, and insert run in one `IMMEDIATE` transaction so concurrent
/// admissions for a profile cannot overshoot `capacity`.
pub async fn admit_credential(
    db: &Database,
    credential: &NewCredential,
    capacity: usize,
) -> Result<Admission, CryptumError> {
    let credential = credential.clone();
    let capacity = i64::try_from(capacity).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Admission, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let count: i64 = tx.query_row(
                "SELECT COUNT(*) FROM credentials WHERE public_key = ?1",
                params![credential.public_key],
                |row| row.get(0),
            )?;

            let evicted = if count >= capacity {
                let oldest: Option<i64> = tx
                    .query_row(
                        "SELECT id FROM credentials WHERE public_key = ?1
                         ORDER BY created_at ASC, id ASC LIMIT 1",
                        params![credential.public_key],
                        |row| row.get(0),
                    )
                    .optional()?;
                if let Some(id) = oldest {
                    tx.execute("DELETE FROM credentials WHERE id = ?1", params![id])?;
                }
                oldest
            } else {
                None
            };

            tx.execute(
                "INSERT INTO credentials (public_key, pin, protector, entropy)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    credential.public_key,
                    credential.pin,
                    credential.protector,
                    credential.entropy,
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            debug!(id, ?evicted, count, "credential admitted");
            Ok(Admission { id, evicted })
        })
        .await
        .map_err(map_tr_err)
}

/// Delete a credential by owner and protector.
pub async fn delete_credential(
    db: &Database,
    public_key: &str,
    protector: &str,
) -> Result<bool, CryptumError> {
    let public_key = public_key.to_string();
    let protector = protector.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let deleted = conn.execute(
                "DELETE FROM credentials WHERE public_key = ?1 AND protector = ?2",
                params![public_key, protector],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// List a profile's credentials in eviction order.
pub async fn list_credentials(
    db: &Database,
    public_key: &str,
) -> Result<Vec<Credential>, CryptumError> {
    let public_key = public_key.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Credential>, rusqlite::Error> {
            let sql = format!(
                "SELECT {CREDENTIAL_COLUMNS} FROM credentials
                 WHERE public_key = ?1 ORDER BY created_at ASC, id ASC"
            );
            let mut stmt = conn.prepare(&sql)?;
            stmt.query_map(params![public_key], row_to_credential)?
                .collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(map_tr_err)
}
