// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! LTI 1.3 launch trust validation.
//!
//! This crate is the primary Rust entry point for accepting LTI 1.3 launches:
//! the OIDC login handshake ([`oidc::OidcLoginInitiator`],
//! [`oidc::OidcLoginAuthenticator`]), the launch validation pipeline
//! ([`launch::LtiLaunchValidator`]), and the request builders a platform side
//! uses to emit launches.
//!
//! Collaborator contracts (registration lookup, nonce store, JWKS fetch, user
//! authentication) live in `lti1p3-abstractions`; in-memory implementations
//! suitable for statically-configured deployments and for tests live here.

pub mod jwks;
pub mod jws;
pub mod launch;
pub mod message;
pub mod nonce;
pub mod oidc;
pub mod repository;

pub use jwks::{Jwk, JwkSet, StaticJwksFetcher};
pub use launch::builder::{LtiLaunchRequestBuilder, OidcLaunchRequestBuilder};
pub use launch::validator::LtiLaunchValidator;
pub use message::{MessageBuilder, MESSAGE_TTL};
pub use nonce::{InMemoryNonceRepository, NonceGenerator};
pub use oidc::{OidcLoginAuthenticator, OidcLoginInitiator};
pub use repository::InMemoryRegistrationRepository;
