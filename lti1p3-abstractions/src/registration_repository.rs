// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Registration lookup contract.

use crate::Registration;

#[derive(thiserror::Error, Debug)]
pub enum RegistrationRepositoryError {
    #[error("{0}")]
    Message(String),
}

/// Resolves the trust configuration for an issuer / client identity pair.
///
/// Contract:
/// - Return `Ok(None)` when zero or ambiguous matches exist; the pipeline
///   reports "No matching registration found".
/// - Return `Err(...)` for lookup failures. The error message is surfaced
///   verbatim as the validation error, preserving diagnostic detail for
///   operators.
pub trait RegistrationRepository: Send + Sync {
    fn find_by_platform_issuer_and_client(
        &self,
        issuer: &str,
        client_id: &str,
    ) -> Result<Option<Registration>, RegistrationRepositoryError>;
}
