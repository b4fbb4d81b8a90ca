// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Nonce generation and the in-memory replay store.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::trace;

use lti1p3_abstractions::{Nonce, NonceRepository, NonceRepositoryError};

/// Generates fresh single-use nonce values.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonceGenerator;

impl NonceGenerator {
    pub fn generate(&self) -> Nonce {
        Nonce::new(uuid::Uuid::new_v4().simple().to_string(), Utc::now())
    }
}

/// In-process nonce store.
///
/// Suitable for single-process deployments and tests. Saves are
/// insert-if-absent under one lock, so two concurrent saves of the same
/// value keep the first writer's `created_at`. Expired entries are not
/// evicted; expiry is applied at lookup time by the pipeline.
#[derive(Debug, Default)]
pub struct InMemoryNonceRepository {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryNonceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with already consumed nonces.
    pub fn from_nonces(nonces: impl IntoIterator<Item = Nonce>) -> Self {
        let entries = nonces
            .into_iter()
            .map(|n| (n.value().to_string(), n.created_at()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }
}

impl NonceRepository for InMemoryNonceRepository {
    fn find(&self, value: &str) -> Result<Option<Nonce>, NonceRepositoryError> {
        Ok(self
            .entries
            .lock()
            .get(value)
            .map(|created_at| Nonce::new(value, *created_at)))
    }

    fn save(&self, nonce: &Nonce) -> Result<(), NonceRepositoryError> {
        self.entries
            .lock()
            .entry(nonce.value().to_string())
            .or_insert_with(|| {
                trace!(value = nonce.value(), "nonce persisted");
                nonce.created_at()
            });
        Ok(())
    }
}
