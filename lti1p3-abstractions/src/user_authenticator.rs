// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! End-user authentication contract for the OIDC login step.

use serde::{Deserialize, Serialize};

/// Identity claims of an authenticated end user.
///
/// Serialized field names match the OIDC standard claims carried at the top
/// level of the launch token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(rename = "sub")]
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl UserIdentity {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            email: None,
            given_name: None,
            family_name: None,
            locale: None,
        }
    }
}

/// Outcome of an end-user authentication attempt.
///
/// `Authenticated { identity: None }` is a successful anonymous
/// authentication: the launch proceeds without user-identity claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAuthenticationResult {
    Authenticated { identity: Option<UserIdentity> },
    Rejected { reason: String },
}

#[derive(thiserror::Error, Debug)]
pub enum UserAuthenticationError {
    #[error("{0}")]
    Message(String),
}

/// Decides whether the end user identified by a login hint may launch.
///
/// Invoked by the OIDC login authenticator only; the launch validation
/// pipeline never authenticates users.
pub trait UserAuthenticator: Send + Sync {
    fn authenticate(
        &self,
        login_hint: &str,
    ) -> Result<UserAuthenticationResult, UserAuthenticationError>;
}
