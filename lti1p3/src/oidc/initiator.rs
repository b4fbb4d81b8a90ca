// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! OIDC login initiation (tool side).

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use lti1p3_abstractions::{LaunchRequest, LtiError, RegistrationRepository};

use crate::message::MessageBuilder;
use crate::nonce::NonceGenerator;
use crate::oidc::mandatory_parameter;

/// Begins the handshake: resolves the target registration, signs a fresh
/// time-bounded state with the tool's own key, and answers with the
/// platform's authentication endpoint plus the required OIDC parameters.
///
/// Stateless beyond the signing step; the nonce placeholder minted here is
/// only persisted when the launch token presenting it is later validated.
pub struct OidcLoginInitiator {
    registration_repository: Arc<dyn RegistrationRepository>,
}

impl OidcLoginInitiator {
    pub fn new(registration_repository: Arc<dyn RegistrationRepository>) -> Self {
        Self {
            registration_repository,
        }
    }

    pub fn initiate(&self, request: &LaunchRequest) -> Result<LaunchRequest, LtiError> {
        let issuer = mandatory_parameter(request, "iss")?;
        let client_id = mandatory_parameter(request, "client_id")?;
        let login_hint = mandatory_parameter(request, "login_hint")?;
        let target_link_uri = mandatory_parameter(request, "target_link_uri")?;

        let registration = self
            .registration_repository
            .find_by_platform_issuer_and_client(issuer, client_id)?
            .ok_or(LtiError::NoMatchingRegistration)?;

        let state = MessageBuilder::new()
            .with_claim("jti", Value::from(uuid::Uuid::new_v4().to_string()))
            .build(registration.tool_signing_chain()?)?;

        let nonce = NonceGenerator.generate();

        debug!(
            registration = registration.identifier(),
            "OIDC login initiated"
        );

        let mut redirect =
            LaunchRequest::new(registration.platform().oidc_authentication_url())
                .with_parameter("redirect_uri", target_link_uri)
                .with_parameter("client_id", registration.client_id())
                .with_parameter("login_hint", login_hint)
                .with_parameter("state", state)
                .with_parameter("nonce", nonce.value())
                .with_parameter("prompt", "none")
                .with_parameter("response_mode", "form_post")
                .with_parameter("response_type", "id_token")
                .with_parameter("scope", "openid");

        for passthrough in ["lti_message_hint", "lti_deployment_id"] {
            if let Some(value) = request.parameter(passthrough) {
                redirect = redirect.with_parameter(passthrough, value);
            }
        }

        Ok(redirect)
    }
}
