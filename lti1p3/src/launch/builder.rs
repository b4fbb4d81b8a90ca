// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Builders for the two launch entry paths.
//!
//! [`LtiLaunchRequestBuilder`] emits a direct (non-OIDC) launch: the platform
//! signs the `id_token` and sends the user straight to the tool launch URL.
//! [`OidcLaunchRequestBuilder`] emits the OIDC login initiation instead: the
//! launch message travels as a platform-signed `lti_message_hint` and the
//! `id_token` is only produced later by the login authenticator.

use chrono::{DateTime, Utc};
use serde_json::Value;

use lti1p3_abstractions::message::{
    CLAIM_DEPLOYMENT_ID, CLAIM_MESSAGE_TYPE, CLAIM_RESOURCE_LINK, CLAIM_TARGET_LINK_URI,
    CLAIM_VERSION, LTI_VERSION, MESSAGE_TYPE_RESOURCE_LINK,
};
use lti1p3_abstractions::{LaunchRequest, LtiError, Registration, ResourceLink, UserIdentity};

use crate::message::MessageBuilder;
use crate::nonce::NonceGenerator;

fn message_claims(
    registration: &Registration,
    resource_link: &ResourceLink,
    deployment_id: &str,
) -> Result<serde_json::Map<String, Value>, LtiError> {
    let mut claims = serde_json::Map::new();
    claims.insert(
        "iss".to_string(),
        Value::from(registration.platform().audience()),
    );
    claims.insert("aud".to_string(), Value::from(registration.client_id()));
    claims.insert(
        CLAIM_MESSAGE_TYPE.to_string(),
        Value::from(MESSAGE_TYPE_RESOURCE_LINK),
    );
    claims.insert(CLAIM_VERSION.to_string(), Value::from(LTI_VERSION));
    claims.insert(CLAIM_DEPLOYMENT_ID.to_string(), Value::from(deployment_id));
    claims.insert(
        CLAIM_TARGET_LINK_URI.to_string(),
        Value::from(registration.tool().launch_url()),
    );
    claims.insert(
        CLAIM_RESOURCE_LINK.to_string(),
        serde_json::to_value(resource_link)
            .map_err(|e| LtiError::Message(format!("failed to encode resource link: {e}")))?,
    );
    Ok(claims)
}

fn resolved_deployment_id(
    registration: &Registration,
    requested: Option<&str>,
) -> Result<String, LtiError> {
    match requested {
        Some(id) => Ok(id.to_string()),
        None => registration
            .default_deployment_id()
            .map(str::to_string)
            .ok_or_else(|| {
                LtiError::Message("registration has no default deployment id".to_string())
            }),
    }
}

/// Builds a direct resource-link launch carrying a signed `id_token`.
#[derive(Debug)]
pub struct LtiLaunchRequestBuilder<'a> {
    registration: &'a Registration,
    resource_link: &'a ResourceLink,
    deployment_id: Option<String>,
    user_identity: Option<&'a UserIdentity>,
    state: Option<String>,
    nonce: Option<String>,
    issued_at: Option<DateTime<Utc>>,
}

impl<'a> LtiLaunchRequestBuilder<'a> {
    pub fn new(registration: &'a Registration, resource_link: &'a ResourceLink) -> Self {
        Self {
            registration,
            resource_link,
            deployment_id: None,
            user_identity: None,
            state: None,
            nonce: None,
            issued_at: None,
        }
    }

    /// Launch under a specific deployment id instead of the registration
    /// default.
    pub fn with_deployment_id(mut self, deployment_id: impl Into<String>) -> Self {
        self.deployment_id = Some(deployment_id.into());
        self
    }

    /// Launch as an identified user instead of anonymously.
    pub fn with_user_identity(mut self, user_identity: &'a UserIdentity) -> Self {
        self.user_identity = Some(user_identity);
        self
    }

    /// Attach an OIDC state parameter to forward alongside the token.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    /// Use a specific nonce value instead of a generated one.
    pub fn with_nonce(mut self, nonce: impl Into<String>) -> Self {
        self.nonce = Some(nonce.into());
        self
    }

    /// Override the token issuance instant (defaults to now).
    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn build(self) -> Result<LaunchRequest, LtiError> {
        let deployment_id =
            resolved_deployment_id(self.registration, self.deployment_id.as_deref())?;

        let nonce = self
            .nonce
            .unwrap_or_else(|| NonceGenerator.generate().value().to_string());

        let mut claims = message_claims(self.registration, self.resource_link, &deployment_id)?;
        claims.insert("nonce".to_string(), Value::from(nonce));

        if let Some(identity) = self.user_identity {
            let identity_claims = serde_json::to_value(identity)
                .map_err(|e| LtiError::Message(format!("failed to encode user identity: {e}")))?;
            if let Value::Object(identity_claims) = identity_claims {
                claims.extend(identity_claims);
            }
        }

        let mut builder = MessageBuilder::new().with_claims(claims);
        if let Some(issued_at) = self.issued_at {
            builder = builder.with_issued_at(issued_at);
        }
        let id_token = builder.build(self.registration.platform_signing_chain()?)?;

        let mut request = LaunchRequest::new(self.registration.tool().launch_url())
            .with_parameter("id_token", id_token);
        if let Some(state) = self.state {
            request = request.with_parameter("state", state);
        }
        Ok(request)
    }
}

/// Builds an OIDC login initiation for a resource-link launch.
#[derive(Debug)]
pub struct OidcLaunchRequestBuilder<'a> {
    registration: &'a Registration,
    resource_link: &'a ResourceLink,
    login_hint: String,
    deployment_id: Option<String>,
}

impl<'a> OidcLaunchRequestBuilder<'a> {
    pub fn new(
        registration: &'a Registration,
        resource_link: &'a ResourceLink,
        login_hint: impl Into<String>,
    ) -> Self {
        Self {
            registration,
            resource_link,
            login_hint: login_hint.into(),
            deployment_id: None,
        }
    }

    pub fn with_deployment_id(mut self, deployment_id: impl Into<String>) -> Self {
        self.deployment_id = Some(deployment_id.into());
        self
    }

    pub fn build(self) -> Result<LaunchRequest, LtiError> {
        let deployment_id =
            resolved_deployment_id(self.registration, self.deployment_id.as_deref())?;

        // The launch message rides the handshake as a platform-signed hint;
        // no nonce yet, the authenticator injects the one minted by the
        // login initiator.
        let claims = message_claims(self.registration, self.resource_link, &deployment_id)?;
        let message_hint = MessageBuilder::new()
            .with_claims(claims)
            .build(self.registration.platform_signing_chain()?)?;

        Ok(
            LaunchRequest::new(self.registration.tool().oidc_initiation_url())
                .with_parameter("iss", self.registration.platform().audience())
                .with_parameter("client_id", self.registration.client_id())
                .with_parameter("login_hint", self.login_hint)
                .with_parameter("target_link_uri", self.registration.tool().launch_url())
                .with_parameter("lti_message_hint", message_hint)
                .with_parameter("lti_deployment_id", deployment_id),
        )
    }
}
