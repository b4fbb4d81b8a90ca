// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Single-use nonces and the replay-protection store contract.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// A single-use value guarding against replay of an accepted launch token.
///
/// Expiry is a pure function of `(created_at, ttl, now)`; the store never
/// computes it. A stored nonce past its TTL is treated as re-usable: a second
/// launch that old could not plausibly be a replay attack, and the relaxation
/// lets stores be pruned without breaking idempotent retries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce {
    value: String,
    created_at: DateTime<Utc>,
}

impl Nonce {
    pub fn new(value: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            created_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.timestamp() - self.created_at.timestamp() > ttl.as_secs() as i64
    }
}

#[derive(thiserror::Error, Debug)]
pub enum NonceRepositoryError {
    #[error("{0}")]
    Message(String),
}

/// Store of consumed nonces.
///
/// Contract:
/// - `find` is a deterministic existence lookup with no side effects.
/// - `save` is idempotent, first-writer-wins on `value`: a repeat save of an
///   already stored value must keep the original `created_at`. Concurrent
///   saves of the same value must not corrupt state (implementations back
///   this with a uniqueness key or an insert-if-absent primitive).
///
/// Store I/O failures are reported through [`NonceRepositoryError`] and
/// propagate as-is; the pipeline never masks them as a nonce outcome.
pub trait NonceRepository: Send + Sync {
    fn find(&self, value: &str) -> Result<Option<Nonce>, NonceRepositoryError>;

    fn save(&self, nonce: &Nonce) -> Result<(), NonceRepositoryError>;
}
