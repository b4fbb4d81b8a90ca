// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The launch-validation error taxonomy.
//!
//! Every variant renders as the exact user-facing message callers and tests
//! assert on. The pipeline never raises these to its caller: it captures the
//! rendered message into the [`crate::ValidationResult`]. The OIDC handshake
//! endpoints, by contrast, return them directly (a handshake failure happens
//! before a launch token even exists).

#[derive(thiserror::Error, Debug)]
pub enum LtiError {
    #[error("No matching registration found")]
    NoMatchingRegistration,

    #[error("Platform key chain not configured")]
    PlatformKeyChainNotConfigured,

    #[error("Tool key chain not configured")]
    ToolKeyChainNotConfigured,

    #[error("JWT id_token signature validation failure")]
    IdTokenSignatureFailure,

    #[error("JWT id_token is expired")]
    IdTokenExpired,

    #[error("JWT id_token nonce already used")]
    NonceAlreadyUsed,

    #[error("JWT id_token deployment_id claim not valid for this registration")]
    DeploymentIdNotValid,

    #[error("JWT OIDC state signature validation failure")]
    StateSignatureFailure,

    #[error("JWT OIDC state is expired")]
    StateExpired,

    /// The end user was rejected during the OIDC login step.
    #[error("User authentication failure")]
    UserAuthenticationFailure,

    /// A failure raised by an external collaborator, forwarded with its
    /// original message unmodified.
    #[error("{0}")]
    Collaborator(String),

    /// Any other failure (malformed token, missing parameter or claim).
    #[error("{0}")]
    Message(String),
}

impl From<crate::RegistrationRepositoryError> for LtiError {
    fn from(e: crate::RegistrationRepositoryError) -> Self {
        LtiError::Collaborator(e.to_string())
    }
}

impl From<crate::NonceRepositoryError> for LtiError {
    fn from(e: crate::NonceRepositoryError) -> Self {
        LtiError::Collaborator(e.to_string())
    }
}

impl From<crate::JwksFetchError> for LtiError {
    fn from(e: crate::JwksFetchError) -> Self {
        LtiError::Collaborator(e.to_string())
    }
}

impl From<crate::UserAuthenticationError> for LtiError {
    fn from(e: crate::UserAuthenticationError) -> Self {
        LtiError::Collaborator(e.to_string())
    }
}
