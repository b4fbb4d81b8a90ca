// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! SQLite-backed nonce store.
//!
//! Persists the single relation `(value, created_at)` with `value` as the
//! uniqueness key. `INSERT OR IGNORE` is the compare-and-insert primitive:
//! concurrent saves of the same value cannot corrupt state and the first
//! writer's `created_at` wins, which keeps `save` idempotent across retries
//! and across processes sharing the database file.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension as _};
use tracing::{debug, trace};

use lti1p3_abstractions::{Nonce, NonceRepository, NonceRepositoryError};

#[derive(thiserror::Error, Debug)]
pub enum SqliteNonceStoreError {
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Nonce store over a SQLite database.
pub struct SqliteNonceRepository {
    conn: Mutex<Connection>,
}

impl SqliteNonceRepository {
    /// Open (and initialize if needed) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SqliteNonceStoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory store, private to this handle.
    pub fn open_in_memory() -> Result<Self, SqliteNonceStoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, SqliteNonceStoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS nonce (
                 value      TEXT PRIMARY KEY,
                 created_at INTEGER NOT NULL
             );",
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Delete entries past the TTL window.
    ///
    /// Optional maintenance: the pipeline applies expiry at lookup time, so
    /// compaction only bounds storage growth. Returns the number of rows
    /// removed.
    pub fn purge_expired(
        &self,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<usize, SqliteNonceStoreError> {
        let purged = self.conn.lock().execute(
            "DELETE FROM nonce WHERE created_at + ?1 <= ?2",
            params![ttl.as_secs() as i64, now.timestamp()],
        )?;
        if purged > 0 {
            debug!(purged, "expired nonces purged");
        }
        Ok(purged)
    }
}

impl NonceRepository for SqliteNonceRepository {
    fn find(&self, value: &str) -> Result<Option<Nonce>, NonceRepositoryError> {
        let created_at: Option<i64> = self
            .conn
            .lock()
            .query_row(
                "SELECT created_at FROM nonce WHERE value = ?1",
                params![value],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| NonceRepositoryError::Message(e.to_string()))?;

        match created_at {
            None => Ok(None),
            Some(secs) => {
                let created_at = DateTime::from_timestamp(secs, 0).ok_or_else(|| {
                    NonceRepositoryError::Message(format!(
                        "stored created_at out of range: {secs}"
                    ))
                })?;
                Ok(Some(Nonce::new(value, created_at)))
            }
        }
    }

    fn save(&self, nonce: &Nonce) -> Result<(), NonceRepositoryError> {
        self.conn
            .lock()
            .execute(
                "INSERT OR IGNORE INTO nonce (value, created_at) VALUES (?1, ?2)",
                params![nonce.value(), nonce.created_at().timestamp()],
            )
            .map_err(|e| NonceRepositoryError::Message(e.to_string()))?;
        trace!(value = nonce.value(), "nonce persisted");
        Ok(())
    }
}
