// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Remote key fetch contract.

#[derive(thiserror::Error, Debug)]
pub enum JwksFetchError {
    #[error("{0}")]
    Message(String),
}

/// Fetches a platform public key from a JWKS endpoint.
///
/// Consulted by the key resolution policy only when the registration has no
/// statically configured platform public key. The fetch is a pure query: one
/// call per validation, and any caching belongs to the implementation, not
/// the pipeline. Network mechanics (transport, timeouts, retries) are the
/// implementation's concern.
pub trait JwksFetcher: Send + Sync {
    /// Returns the SubjectPublicKeyInfo DER bytes for `key_id` at `jwks_url`.
    fn fetch_key(&self, jwks_url: &str, key_id: &str) -> Result<Vec<u8>, JwksFetchError>;
}
