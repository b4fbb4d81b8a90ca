// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Claim assembly and launch-message parsing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use lti1p3_abstractions::message::{
    CLAIM_DEPLOYMENT_ID, CLAIM_MESSAGE_TYPE, CLAIM_RESOURCE_LINK, CLAIM_VERSION,
};
use lti1p3_abstractions::{KeyChain, LtiError, LtiMessage, ResourceLink, UserIdentity};

use crate::jws::{sign_jws, ParsedJws};

/// Validity window shared by the whole launch token family: launch tokens,
/// OIDC state, and nonce replay enforcement all use this single constant so
/// the windows can never drift apart.
pub const MESSAGE_TTL: Duration = Duration::from_secs(600);

/// Assembles and signs one message of the launch token family.
///
/// Stamps `iat`/`exp` from the TTL at build time and signs with the given
/// key chain (JOSE `kid` and `alg` come from the chain).
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    claims: Map<String, Value>,
    issued_at: Option<DateTime<Utc>>,
    ttl: Duration,
}

impl MessageBuilder {
    pub fn new() -> Self {
        Self {
            claims: Map::new(),
            issued_at: None,
            ttl: MESSAGE_TTL,
        }
    }

    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    pub fn with_claims(mut self, claims: Map<String, Value>) -> Self {
        self.claims.extend(claims);
        self
    }

    /// Override the issuance instant (defaults to now).
    pub fn with_issued_at(mut self, issued_at: DateTime<Utc>) -> Self {
        self.issued_at = Some(issued_at);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Sign the assembled claims into a compact JWS.
    pub fn build(self, key_chain: &KeyChain) -> Result<String, LtiError> {
        let private_key = key_chain.private_key_der().ok_or_else(|| {
            LtiError::Message(format!(
                "key chain '{}' has no private key",
                key_chain.identifier()
            ))
        })?;

        let issued_at = self.issued_at.unwrap_or_else(Utc::now);
        let expires_at = issued_at.timestamp() + self.ttl.as_secs() as i64;

        let mut claims = self.claims;
        claims.insert("iat".to_string(), Value::from(issued_at.timestamp()));
        claims.insert("exp".to_string(), Value::from(expires_at));

        sign_jws(
            key_chain.algorithm(),
            key_chain.identifier(),
            &Value::Object(claims),
            private_key,
        )
        .map_err(LtiError::Message)
    }
}

impl Default for MessageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A mandatory string claim, or the captured "missing claim" failure.
pub(crate) fn mandatory_claim_str<'a>(jws: &'a ParsedJws, name: &str) -> Result<&'a str, LtiError> {
    jws.claim_str(name)
        .ok_or_else(|| LtiError::Message(format!("Missing mandatory claim: {name}")))
}

/// Parse the launch message out of validated token claims.
///
/// User identity is present exactly when the token carries a `sub` claim;
/// the remaining OIDC identity claims are optional around it.
pub(crate) fn parse_lti_message(jws: &ParsedJws) -> Result<LtiMessage, LtiError> {
    let version = mandatory_claim_str(jws, CLAIM_VERSION)?.to_string();

    let message_type = jws.claim_str(CLAIM_MESSAGE_TYPE).map(str::to_string);
    let deployment_id = jws.claim_str(CLAIM_DEPLOYMENT_ID).map(str::to_string);

    let resource_link = match jws.claims.get(CLAIM_RESOURCE_LINK) {
        Some(claim) => Some(
            serde_json::from_value::<ResourceLink>(claim.clone())
                .map_err(|e| LtiError::Message(format!("malformed resource link claim: {e}")))?,
        ),
        None => None,
    };

    let user_identity = match jws.claim_str("sub") {
        Some(_) => Some(
            serde_json::from_value::<UserIdentity>(jws.claims.clone())
                .map_err(|e| LtiError::Message(format!("malformed user identity claims: {e}")))?,
        ),
        None => None,
    };

    Ok(LtiMessage {
        version,
        message_type,
        deployment_id,
        resource_link,
        user_identity,
    })
}
