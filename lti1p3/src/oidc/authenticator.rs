// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! OIDC login authentication (platform side).

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use lti1p3_abstractions::{
    LaunchRequest, LtiError, RegistrationRepository, UserAuthenticationResult, UserAuthenticator,
};

use crate::jws::parse_jws;
use crate::message::{mandatory_claim_str, MessageBuilder};
use crate::oidc::mandatory_parameter;

/// Completes the handshake: authenticates the end user and re-issues the
/// original launch parameters as a forwardable launch request.
///
/// The launch message arrives as the `lti_message_hint` produced at
/// initiation time; its claims are re-signed into the `id_token` with the
/// nonce minted by the initiator and, for non-anonymous authentications, the
/// user-identity claims. A rejected user is a handshake failure, a class of
/// its own, surfaced before a launch token even exists.
pub struct OidcLoginAuthenticator {
    registration_repository: Arc<dyn RegistrationRepository>,
    user_authenticator: Arc<dyn UserAuthenticator>,
}

impl OidcLoginAuthenticator {
    pub fn new(
        registration_repository: Arc<dyn RegistrationRepository>,
        user_authenticator: Arc<dyn UserAuthenticator>,
    ) -> Self {
        Self {
            registration_repository,
            user_authenticator,
        }
    }

    pub fn authenticate(&self, request: &LaunchRequest) -> Result<LaunchRequest, LtiError> {
        let state = mandatory_parameter(request, "state")?;
        let login_hint = mandatory_parameter(request, "login_hint")?;
        let nonce = mandatory_parameter(request, "nonce")?;
        let redirect_uri = mandatory_parameter(request, "redirect_uri")?;
        let message_hint = mandatory_parameter(request, "lti_message_hint")?;

        let hint = parse_jws(message_hint).map_err(LtiError::Message)?;
        let issuer = mandatory_claim_str(&hint, "iss")?;
        let client_id = hint
            .audience()
            .ok_or_else(|| LtiError::Message("Missing mandatory claim: aud".to_string()))?;

        let registration = self
            .registration_repository
            .find_by_platform_issuer_and_client(issuer, client_id)?
            .ok_or(LtiError::NoMatchingRegistration)?;

        let identity = match self.user_authenticator.authenticate(login_hint)? {
            UserAuthenticationResult::Authenticated { identity } => identity,
            UserAuthenticationResult::Rejected { reason } => {
                debug!(reason = %reason, "end user rejected during OIDC login");
                return Err(LtiError::UserAuthenticationFailure);
            }
        };

        let Value::Object(mut claims) = hint.claims else {
            return Err(LtiError::Message(
                "lti_message_hint payload is not a JSON object".to_string(),
            ));
        };
        // iat/exp are re-stamped when the id_token is signed.
        claims.remove("iat");
        claims.remove("exp");
        claims.insert("nonce".to_string(), Value::from(nonce));

        if let Some(identity) = identity {
            let identity_claims = serde_json::to_value(&identity)
                .map_err(|e| LtiError::Message(format!("failed to encode user identity: {e}")))?;
            if let Value::Object(identity_claims) = identity_claims {
                claims.extend(identity_claims);
            }
        }

        let id_token = MessageBuilder::new()
            .with_claims(claims)
            .build(registration.platform_signing_chain()?)?;

        debug!(
            registration = registration.identifier(),
            "OIDC login authenticated"
        );

        Ok(LaunchRequest::new(redirect_uri)
            .with_parameter("id_token", id_token)
            .with_parameter("state", state))
    }
}
