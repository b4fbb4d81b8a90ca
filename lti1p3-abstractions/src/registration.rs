// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Trust configuration for a platform ↔ tool pairing.

use crate::{KeyChain, LtiError};

/// The platform half of a registration.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Issuer URL; the `iss` claim of platform-issued tokens.
    audience: String,
    oidc_authentication_url: String,
}

impl Platform {
    pub fn new(audience: impl Into<String>, oidc_authentication_url: impl Into<String>) -> Self {
        Self {
            audience: audience.into(),
            oidc_authentication_url: oidc_authentication_url.into(),
        }
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn oidc_authentication_url(&self) -> &str {
        &self.oidc_authentication_url
    }
}

/// The tool half of a registration.
#[derive(Debug, Clone)]
pub struct Tool {
    audience: String,
    oidc_initiation_url: String,
    launch_url: String,
}

impl Tool {
    pub fn new(
        audience: impl Into<String>,
        oidc_initiation_url: impl Into<String>,
        launch_url: impl Into<String>,
    ) -> Self {
        Self {
            audience: audience.into(),
            oidc_initiation_url: oidc_initiation_url.into(),
            launch_url: launch_url.into(),
        }
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn oidc_initiation_url(&self) -> &str {
        &self.oidc_initiation_url
    }

    pub fn launch_url(&self) -> &str {
        &self.launch_url
    }
}

/// A trusted platform ↔ tool pairing.
///
/// Immutable for the duration of a validation; the pipeline never mutates it.
/// The deployment id set must be non-empty; the first entry is the default.
/// At validation time at least one of the static platform public key or the
/// platform JWKS URL must be resolvable, or validation fails with
/// "Platform key chain not configured".
#[derive(Debug, Clone)]
pub struct Registration {
    identifier: String,
    client_id: String,
    platform: Platform,
    tool: Tool,
    deployment_ids: Vec<String>,
    platform_key_chain: Option<KeyChain>,
    platform_jwks_url: Option<String>,
    tool_key_chain: Option<KeyChain>,
}

impl Registration {
    pub fn new(
        identifier: impl Into<String>,
        client_id: impl Into<String>,
        platform: Platform,
        tool: Tool,
        deployment_ids: Vec<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            client_id: client_id.into(),
            platform,
            tool,
            deployment_ids,
            platform_key_chain: None,
            platform_jwks_url: None,
            tool_key_chain: None,
        }
    }

    pub fn with_platform_key_chain(mut self, key_chain: KeyChain) -> Self {
        self.platform_key_chain = Some(key_chain);
        self
    }

    pub fn with_platform_jwks_url(mut self, jwks_url: impl Into<String>) -> Self {
        self.platform_jwks_url = Some(jwks_url.into());
        self
    }

    pub fn with_tool_key_chain(mut self, key_chain: KeyChain) -> Self {
        self.tool_key_chain = Some(key_chain);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn tool(&self) -> &Tool {
        &self.tool
    }

    pub fn deployment_ids(&self) -> &[String] {
        &self.deployment_ids
    }

    pub fn default_deployment_id(&self) -> Option<&str> {
        self.deployment_ids.first().map(String::as_str)
    }

    pub fn has_deployment_id(&self, deployment_id: &str) -> bool {
        self.deployment_ids.iter().any(|id| id == deployment_id)
    }

    pub fn platform_key_chain(&self) -> Option<&KeyChain> {
        self.platform_key_chain.as_ref()
    }

    pub fn platform_jwks_url(&self) -> Option<&str> {
        self.platform_jwks_url.as_deref()
    }

    pub fn tool_key_chain(&self) -> Option<&KeyChain> {
        self.tool_key_chain.as_ref()
    }

    /// The tool key chain, required to be able to sign (e.g. OIDC state).
    pub fn tool_signing_chain(&self) -> Result<&KeyChain, LtiError> {
        self.tool_key_chain
            .as_ref()
            .filter(|chain| chain.private_key_der().is_some())
            .ok_or(LtiError::ToolKeyChainNotConfigured)
    }

    /// The tool key chain, required to be able to verify (e.g. OIDC state).
    pub fn tool_verification_chain(&self) -> Result<&KeyChain, LtiError> {
        self.tool_key_chain
            .as_ref()
            .filter(|chain| chain.public_key_der().is_some())
            .ok_or(LtiError::ToolKeyChainNotConfigured)
    }

    /// The platform key chain, required to be able to sign (e.g. id_token).
    pub fn platform_signing_chain(&self) -> Result<&KeyChain, LtiError> {
        self.platform_key_chain
            .as_ref()
            .filter(|chain| chain.private_key_der().is_some())
            .ok_or(LtiError::PlatformKeyChainNotConfigured)
    }
}
