// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared interfaces and datatypes for the LTI 1.3 Rust crates.
//!
//! This crate exists to prevent circular dependencies across:
//! - high-level facade (`lti1p3`)
//! - collaborator implementations (`lti1p3-sqlite`, and other future stores)
//!
//! It is intentionally kept small and stable: trust configuration types,
//! the collaborator traits consumed by the launch validation pipeline and
//! the OIDC handshake endpoints, and the result/error taxonomy.

pub mod error;
pub mod jwks_fetcher;
pub mod key_chain;
pub mod launch_request;
pub mod message;
pub mod nonce;
pub mod registration;
pub mod registration_repository;
pub mod user_authenticator;
pub mod validation_result;

pub use error::LtiError;
pub use jwks_fetcher::{JwksFetchError, JwksFetcher};
pub use key_chain::{JwsAlgorithm, KeyChain};
pub use launch_request::LaunchRequest;
pub use message::{LtiMessage, ResourceLink, LTI_VERSION};
pub use nonce::{Nonce, NonceRepository, NonceRepositoryError};
pub use registration::{Platform, Registration, Tool};
pub use registration_repository::{RegistrationRepository, RegistrationRepositoryError};
pub use user_authenticator::{
    UserAuthenticationError, UserAuthenticationResult, UserAuthenticator, UserIdentity,
};
pub use validation_result::ValidationResult;
