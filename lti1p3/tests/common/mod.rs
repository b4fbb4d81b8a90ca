// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Shared helpers for `lti1p3` integration tests.
//!
//! The integration tests in `lti1p3/tests/*.rs` focus on exercising
//! production code paths and the exact user-facing messages. Key material is
//! generated per test run (P-256, fast to generate); registrations that must
//! trust each other share key chains explicitly.

#![allow(dead_code)]

use std::sync::Arc;

use p256::pkcs8::{EncodePrivateKey as _, EncodePublicKey as _};
use parking_lot::Mutex;
use rand_core::OsRng;

use lti1p3_abstractions::{
    JwksFetchError, JwksFetcher, JwsAlgorithm, KeyChain, Platform, Registration,
    RegistrationRepository, RegistrationRepositoryError, ResourceLink, Tool,
    UserAuthenticationError, UserAuthenticationResult, UserAuthenticator, UserIdentity,
};

/// Generates a P-256 key chain carrying both halves of a fresh key pair.
pub fn make_es256_key_chain(kid: &str) -> KeyChain {
    let secret = p256::SecretKey::random(&mut OsRng);
    let private_der = secret.to_pkcs8_der().unwrap().as_bytes().to_vec();
    let public_der = secret
        .public_key()
        .to_public_key_der()
        .unwrap()
        .as_bytes()
        .to_vec();

    KeyChain::new(kid, JwsAlgorithm::Es256, Some(public_der), Some(private_der))
}

pub fn test_resource_link() -> ResourceLink {
    ResourceLink::new("resourceLinkIdentifier").with_title("resourceLinkTitle")
}

pub fn test_user_identity() -> UserIdentity {
    UserIdentity {
        identifier: "userIdentifier".to_string(),
        name: Some("userName".to_string()),
        email: Some("userEmail".to_string()),
        given_name: Some("userGivenName".to_string()),
        family_name: Some("userFamilyName".to_string()),
        locale: Some("userLocale".to_string()),
    }
}

/// A registration over explicit key chains and deployment ids.
///
/// Tests that need a builder-side and a repository-side registration to
/// trust each other pass the same chains to both.
pub fn test_registration_with(
    platform_key_chain: Option<KeyChain>,
    tool_key_chain: Option<KeyChain>,
    deployment_ids: Vec<&str>,
) -> Registration {
    let mut registration = Registration::new(
        "registrationIdentifier",
        "registrationClientId",
        Platform::new("http://platform.com", "http://platform.com/auth"),
        Tool::new("http://tool.com", "http://tool.com/init", "http://tool.com/launch"),
        deployment_ids.into_iter().map(str::to_string).collect(),
    );
    if let Some(chain) = platform_key_chain {
        registration = registration.with_platform_key_chain(chain);
    }
    if let Some(chain) = tool_key_chain {
        registration = registration.with_tool_key_chain(chain);
    }
    registration
}

/// A fully configured registration with fresh key chains.
pub fn test_registration() -> Registration {
    test_registration_with(
        Some(make_es256_key_chain("platformKeyChain")),
        Some(make_es256_key_chain("toolKeyChain")),
        vec!["1"],
    )
}

/// A registration repository that always fails, for pass-through assertions.
pub struct FailingRegistrationRepository {
    pub message: &'static str,
}

impl RegistrationRepository for FailingRegistrationRepository {
    fn find_by_platform_issuer_and_client(
        &self,
        _issuer: &str,
        _client_id: &str,
    ) -> Result<Option<Registration>, RegistrationRepositoryError> {
        Err(RegistrationRepositoryError::Message(self.message.to_string()))
    }
}

/// A user authenticator double with a fixed outcome.
pub struct TestUserAuthenticator {
    outcome: UserAuthenticationResult,
}

impl TestUserAuthenticator {
    pub fn authenticated(identity: Option<UserIdentity>) -> Arc<Self> {
        Arc::new(Self {
            outcome: UserAuthenticationResult::Authenticated { identity },
        })
    }

    pub fn rejecting(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: UserAuthenticationResult::Rejected {
                reason: reason.to_string(),
            },
        })
    }
}

impl UserAuthenticator for TestUserAuthenticator {
    fn authenticate(
        &self,
        _login_hint: &str,
    ) -> Result<UserAuthenticationResult, UserAuthenticationError> {
        Ok(self.outcome.clone())
    }
}

/// A JWKS fetcher double recording every call.
pub struct RecordingJwksFetcher {
    key: Vec<u8>,
    calls: Mutex<Vec<(String, String)>>,
}

impl RecordingJwksFetcher {
    pub fn returning(key: Vec<u8>) -> Arc<Self> {
        Arc::new(Self {
            key,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

impl JwksFetcher for RecordingJwksFetcher {
    fn fetch_key(&self, jwks_url: &str, key_id: &str) -> Result<Vec<u8>, JwksFetchError> {
        self.calls
            .lock()
            .push((jwks_url.to_string(), key_id.to_string()));
        Ok(self.key.clone())
    }
}
