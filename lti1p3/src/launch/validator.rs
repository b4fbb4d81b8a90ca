// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The launch validation pipeline.
//!
//! Turns an inbound launch request into either a validated launch message or
//! a precise rejection reason. A resolution phase (token decode, registration
//! lookup, verification key resolution) is followed by an explicit ordered
//! list of checks; each check either does not apply, appends one success
//! entry, or terminates the run. The pipeline is total: it never returns
//! `Err`, every failure is captured into the [`ValidationResult`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

use lti1p3_abstractions::message::CLAIM_DEPLOYMENT_ID;
use lti1p3_abstractions::{
    JwksFetcher, LaunchRequest, LtiError, Nonce, NonceRepository, Registration,
    RegistrationRepository, ValidationResult,
};

use crate::jws::{parse_jws, verify_jws, ParsedJws};
use crate::message::{mandatory_claim_str, parse_lti_message, MESSAGE_TTL};

/// Everything the ordered checks operate on, resolved once up front.
struct ValidationContext {
    token: ParsedJws,
    state: Option<ParsedJws>,
    registration: Registration,
    /// SubjectPublicKeyInfo DER bytes resolved by the key resolution policy.
    verification_key: Vec<u8>,
    now: DateTime<Utc>,
}

type Check = fn(&LtiLaunchValidator, &ValidationContext) -> Result<Option<&'static str>, LtiError>;

/// Validates launch requests against registered platforms.
pub struct LtiLaunchValidator {
    registration_repository: Arc<dyn RegistrationRepository>,
    nonce_repository: Arc<dyn NonceRepository>,
    jwks_fetcher: Option<Arc<dyn JwksFetcher>>,
    ttl: Duration,
}

impl LtiLaunchValidator {
    pub fn new(
        registration_repository: Arc<dyn RegistrationRepository>,
        nonce_repository: Arc<dyn NonceRepository>,
    ) -> Self {
        Self {
            registration_repository,
            nonce_repository,
            jwks_fetcher: None,
            ttl: MESSAGE_TTL,
        }
    }

    /// Enable the JWKS fallback for registrations without a static platform
    /// key.
    pub fn with_jwks_fetcher(mut self, fetcher: Arc<dyn JwksFetcher>) -> Self {
        self.jwks_fetcher = Some(fetcher);
        self
    }

    /// Override the shared TTL (nonce replay window).
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Validate a launch request against the current time.
    pub fn validate(&self, request: &LaunchRequest) -> ValidationResult {
        self.validate_at(request, Utc::now())
    }

    /// Validate a launch request against an explicit instant.
    pub fn validate_at(&self, request: &LaunchRequest, now: DateTime<Utc>) -> ValidationResult {
        let mut result = ValidationResult::new();

        match self.run(request, now, &mut result) {
            Ok(()) => {
                debug!(checks = result.successes().len(), "launch validation succeeded");
            }
            Err(e) => {
                debug!(error = %e, "launch validation failed");
                result.fail(e.to_string());
            }
        }

        result
    }

    /// Ordered checks. Execution stops at the first failure; "state" checks
    /// report not-applicable on the non-OIDC path.
    const CHECKS: [Check; 6] = [
        Self::check_token_signature,
        Self::check_token_expiry,
        Self::check_nonce,
        Self::check_deployment_id,
        Self::check_state_signature,
        Self::check_state_expiry,
    ];

    fn run(
        &self,
        request: &LaunchRequest,
        now: DateTime<Utc>,
        result: &mut ValidationResult,
    ) -> Result<(), LtiError> {
        let ctx = self.resolve(request, now)?;

        for check in Self::CHECKS {
            if let Some(message) = check(self, &ctx)? {
                result.add_success(message);
            }
        }

        let lti_message = parse_lti_message(&ctx.token)?;
        result.complete(ctx.registration, lti_message);
        Ok(())
    }

    /// Resolution phase: decode the token, resolve the registration from its
    /// issuer/client claims, resolve the verification key, decode the state
    /// when present.
    fn resolve(
        &self,
        request: &LaunchRequest,
        now: DateTime<Utc>,
    ) -> Result<ValidationContext, LtiError> {
        let raw_token = request
            .parameter("id_token")
            .ok_or_else(|| LtiError::Message("Missing mandatory parameter: id_token".to_string()))?;
        let token = parse_jws(raw_token).map_err(LtiError::Message)?;

        let issuer = mandatory_claim_str(&token, "iss")?.to_string();
        let client_id = token
            .audience()
            .ok_or_else(|| LtiError::Message("Missing mandatory claim: aud".to_string()))?
            .to_string();

        let registration = self
            .registration_repository
            .find_by_platform_issuer_and_client(&issuer, &client_id)?
            .ok_or(LtiError::NoMatchingRegistration)?;

        let verification_key =
            self.resolve_verification_key(&registration, token.header.kid.as_deref())?;

        let state = request
            .parameter("state")
            .map(parse_jws)
            .transpose()
            .map_err(LtiError::Message)?;

        Ok(ValidationContext {
            token,
            state,
            registration,
            verification_key,
            now,
        })
    }

    /// Key resolution policy: a statically configured platform public key
    /// wins (the key id is ignored); otherwise the platform JWKS URL and the
    /// fetch collaborator are both required, and the fetch runs exactly once.
    fn resolve_verification_key(
        &self,
        registration: &Registration,
        key_id: Option<&str>,
    ) -> Result<Vec<u8>, LtiError> {
        if let Some(der) = registration
            .platform_key_chain()
            .and_then(|chain| chain.public_key_der())
        {
            return Ok(der.to_vec());
        }

        let jwks_url = registration
            .platform_jwks_url()
            .ok_or(LtiError::PlatformKeyChainNotConfigured)?;
        let fetcher = self
            .jwks_fetcher
            .as_ref()
            .ok_or(LtiError::PlatformKeyChainNotConfigured)?;
        let key_id = key_id
            .ok_or_else(|| LtiError::Message("JWT id_token has no kid header".to_string()))?;

        debug!(jwks_url, key_id, "falling back to JWKS fetch");
        Ok(fetcher.fetch_key(jwks_url, key_id)?)
    }

    fn check_token_signature(
        &self,
        ctx: &ValidationContext,
    ) -> Result<Option<&'static str>, LtiError> {
        match verify_jws(&ctx.token, &ctx.verification_key) {
            Ok(true) => Ok(Some("JWT id_token signature validation success")),
            // Unusable key material and algorithm mismatches are signature
            // failures too: the token could not be verified as platform-issued.
            Ok(false) | Err(_) => Err(LtiError::IdTokenSignatureFailure),
        }
    }

    fn check_token_expiry(
        &self,
        ctx: &ValidationContext,
    ) -> Result<Option<&'static str>, LtiError> {
        if is_expired(&ctx.token, ctx.now) {
            Err(LtiError::IdTokenExpired)
        } else {
            Ok(Some("JWT id_token is not expired"))
        }
    }

    /// Replay protection. A value already in the store is a replay only
    /// while its TTL window is open; past the window the value is re-usable
    /// and logged as a distinct non-error outcome. Persistence is not rolled
    /// back if a later check fails.
    fn check_nonce(&self, ctx: &ValidationContext) -> Result<Option<&'static str>, LtiError> {
        let value = mandatory_claim_str(&ctx.token, "nonce")?;

        match self.nonce_repository.find(value)? {
            None => {
                self.nonce_repository.save(&Nonce::new(value, ctx.now))?;
                Ok(Some("JWT id_token nonce is valid"))
            }
            Some(existing) if existing.is_expired(self.ttl, ctx.now) => {
                Ok(Some("JWT id_token nonce already used but expired"))
            }
            Some(_) => Err(LtiError::NonceAlreadyUsed),
        }
    }

    fn check_deployment_id(
        &self,
        ctx: &ValidationContext,
    ) -> Result<Option<&'static str>, LtiError> {
        let deployment_id = mandatory_claim_str(&ctx.token, CLAIM_DEPLOYMENT_ID)?;

        if ctx.registration.has_deployment_id(deployment_id) {
            Ok(Some("JWT id_token deployment_id claim valid for this registration"))
        } else {
            Err(LtiError::DeploymentIdNotValid)
        }
    }

    /// The state is self-issued: the tool verifies it with its own public
    /// key, so tampering and cross-site injection both surface here.
    fn check_state_signature(
        &self,
        ctx: &ValidationContext,
    ) -> Result<Option<&'static str>, LtiError> {
        let Some(state) = &ctx.state else {
            return Ok(None);
        };

        let chain = ctx.registration.tool_verification_chain()?;
        let public_key = chain
            .public_key_der()
            .ok_or(LtiError::ToolKeyChainNotConfigured)?;

        match verify_jws(state, public_key) {
            Ok(true) => Ok(Some("JWT OIDC state signature validation success")),
            Ok(false) | Err(_) => Err(LtiError::StateSignatureFailure),
        }
    }

    fn check_state_expiry(
        &self,
        ctx: &ValidationContext,
    ) -> Result<Option<&'static str>, LtiError> {
        let Some(state) = &ctx.state else {
            return Ok(None);
        };

        if is_expired(state, ctx.now) {
            Err(LtiError::StateExpired)
        } else {
            Ok(Some("JWT OIDC state is not expired"))
        }
    }
}

/// A token without a usable `exp` claim counts as expired.
fn is_expired(jws: &ParsedJws, now: DateTime<Utc>) -> bool {
    match jws.claim_i64("exp") {
        Some(exp) => now.timestamp() >= exp,
        None => true,
    }
}
