// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the OIDC login handshake endpoints.

mod common;

use std::sync::Arc;

use common::*;

use lti1p3::jws::parse_jws;
use lti1p3::{
    InMemoryRegistrationRepository, OidcLaunchRequestBuilder, OidcLoginAuthenticator,
    OidcLoginInitiator,
};
use lti1p3_abstractions::RegistrationRepository;

fn repository_with(
    registration: &lti1p3_abstractions::Registration,
) -> Arc<dyn RegistrationRepository> {
    Arc::new(InMemoryRegistrationRepository::new(vec![registration.clone()]))
}

/// The initiator answers with the platform authentication endpoint and every
/// mandatory OIDC parameter, including a tool-signed state.
#[test]
fn initiation_builds_an_authentication_redirect() {
    let registration = test_registration();
    let initiator = OidcLoginInitiator::new(repository_with(&registration));

    let oidc_launch = OidcLaunchRequestBuilder::new(&registration, &test_resource_link(), "loginHint")
        .build()
        .unwrap();

    let redirect = initiator.initiate(&oidc_launch).unwrap();

    assert_eq!(redirect.url(), "http://platform.com/auth");
    assert_eq!(redirect.parameter("client_id"), Some("registrationClientId"));
    assert_eq!(redirect.parameter("login_hint"), Some("loginHint"));
    assert_eq!(redirect.parameter("redirect_uri"), Some("http://tool.com/launch"));
    assert_eq!(redirect.parameter("prompt"), Some("none"));
    assert_eq!(redirect.parameter("response_mode"), Some("form_post"));
    assert_eq!(redirect.parameter("response_type"), Some("id_token"));
    assert_eq!(redirect.parameter("scope"), Some("openid"));
    assert!(redirect.parameter("nonce").is_some());
    assert!(redirect.parameter("lti_message_hint").is_some());

    // The state is self-issued: time-bounded and signed under the tool kid.
    let state = parse_jws(redirect.parameter("state").unwrap()).unwrap();
    assert_eq!(state.header.kid.as_deref(), Some("toolKeyChain"));
    assert!(state.claim_i64("exp").is_some());
    assert!(state.claim_str("jti").is_some());
}

/// Initiation against a registration without tool signing keys fails before
/// any state is produced.
#[test]
fn initiation_fails_without_tool_key_chain() {
    let registration = test_registration_with(
        Some(make_es256_key_chain("platformKeyChain")),
        None,
        vec!["1"],
    );
    let initiator = OidcLoginInitiator::new(repository_with(&registration));

    // The login initiation itself does not need tool keys to be built; the
    // hint is platform-signed.
    let oidc_launch = OidcLaunchRequestBuilder::new(&registration, &test_resource_link(), "loginHint")
        .build()
        .unwrap();

    let error = initiator.initiate(&oidc_launch).unwrap_err();
    assert_eq!(error.to_string(), "Tool key chain not configured");
}

/// Initiation from an unknown platform is rejected.
#[test]
fn initiation_fails_on_unknown_issuer() {
    let registration = test_registration();
    let initiator =
        OidcLoginInitiator::new(Arc::new(InMemoryRegistrationRepository::default()));

    let oidc_launch = OidcLaunchRequestBuilder::new(&registration, &test_resource_link(), "loginHint")
        .build()
        .unwrap();

    let error = initiator.initiate(&oidc_launch).unwrap_err();
    assert_eq!(error.to_string(), "No matching registration found");
}

/// A rejected end user is a handshake failure, distinct from the launch
/// validation failures.
#[test]
fn authentication_fails_when_the_user_is_rejected() {
    let registration = test_registration();
    let repository = repository_with(&registration);

    let initiator = OidcLoginInitiator::new(repository.clone());
    let authenticator = OidcLoginAuthenticator::new(
        repository,
        TestUserAuthenticator::rejecting("not permitted"),
    );

    let oidc_launch = OidcLaunchRequestBuilder::new(&registration, &test_resource_link(), "loginHint")
        .build()
        .unwrap();
    let auth_request = initiator.initiate(&oidc_launch).unwrap();

    let error = authenticator.authenticate(&auth_request).unwrap_err();
    assert_eq!(error.to_string(), "User authentication failure");
}

/// The authenticator echoes the state and injects the initiator's nonce into
/// the re-signed id_token.
#[test]
fn authentication_reissues_the_launch_parameters() {
    let registration = test_registration();
    let repository = repository_with(&registration);

    let initiator = OidcLoginInitiator::new(repository.clone());
    let authenticator =
        OidcLoginAuthenticator::new(repository, TestUserAuthenticator::authenticated(None));

    let oidc_launch = OidcLaunchRequestBuilder::new(&registration, &test_resource_link(), "loginHint")
        .build()
        .unwrap();
    let auth_request = initiator.initiate(&oidc_launch).unwrap();
    let launch = authenticator.authenticate(&auth_request).unwrap();

    assert_eq!(launch.url(), "http://tool.com/launch");
    assert_eq!(launch.parameter("state"), auth_request.parameter("state"));

    let id_token = parse_jws(launch.parameter("id_token").unwrap()).unwrap();
    assert_eq!(id_token.claim_str("nonce"), auth_request.parameter("nonce"));
    assert_eq!(id_token.header.kid.as_deref(), Some("platformKeyChain"));
    assert_eq!(id_token.claim_str("iss"), Some("http://platform.com"));
}

/// Authentication requires the launch message hint minted at initiation.
#[test]
fn authentication_fails_without_a_message_hint() {
    let registration = test_registration();
    let repository = repository_with(&registration);
    let authenticator =
        OidcLoginAuthenticator::new(repository, TestUserAuthenticator::authenticated(None));

    let bare = lti1p3_abstractions::LaunchRequest::new("http://platform.com/auth")
        .with_parameter("state", "opaque")
        .with_parameter("login_hint", "loginHint")
        .with_parameter("nonce", "nonce")
        .with_parameter("redirect_uri", "http://tool.com/launch");

    let error = authenticator.authenticate(&bare).unwrap_err();
    assert_eq!(
        error.to_string(),
        "Missing mandatory parameter: lti_message_hint"
    );
}
