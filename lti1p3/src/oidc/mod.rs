// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The OIDC login handshake.
//!
//! The initiator (tool side) answers a platform's login initiation with an
//! authentication redirect carrying a self-issued, signed state; the
//! authenticator (platform side) authenticates the end user and re-emits the
//! launch as a forwardable request carrying the `id_token` plus the state.

pub mod authenticator;
pub mod initiator;

pub use authenticator::OidcLoginAuthenticator;
pub use initiator::OidcLoginInitiator;

use lti1p3_abstractions::{LaunchRequest, LtiError};

pub(crate) fn mandatory_parameter<'a>(
    request: &'a LaunchRequest,
    name: &str,
) -> Result<&'a str, LtiError> {
    request
        .parameter(name)
        .ok_or_else(|| LtiError::Message(format!("Missing mandatory parameter: {name}")))
}
