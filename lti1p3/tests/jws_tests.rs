// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Integration tests for the compact JWS codec and JWK conversion.

mod common;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use common::*;
use rand_core::OsRng;
use rsa::pkcs8::EncodePublicKey as _;
use rsa::traits::PublicKeyParts as _;

use lti1p3::jws::{parse_jws, sign_jws, verify_jws};
use lti1p3::{Jwk, JwkSet, StaticJwksFetcher};
use lti1p3_abstractions::{JwksFetcher, JwsAlgorithm};

/// A signed ES256 token parses back and verifies under the signing key's
/// public half, and under no other.
#[test]
fn es256_sign_parse_verify_roundtrip() {
    let chain = make_es256_key_chain("kid-1");
    let claims = serde_json::json!({ "iss": "http://platform.com", "exp": 1_700_000_000 });

    let token = sign_jws(
        JwsAlgorithm::Es256,
        "kid-1",
        &claims,
        chain.private_key_der().unwrap(),
    )
    .unwrap();

    let parsed = parse_jws(&token).unwrap();
    assert_eq!(parsed.header.alg, "ES256");
    assert_eq!(parsed.header.kid.as_deref(), Some("kid-1"));
    assert_eq!(parsed.header.typ.as_deref(), Some("JWT"));
    assert_eq!(parsed.claim_str("iss"), Some("http://platform.com"));
    assert_eq!(parsed.claim_i64("exp"), Some(1_700_000_000));

    assert!(verify_jws(&parsed, chain.public_key_der().unwrap()).unwrap());

    let other = make_es256_key_chain("kid-2");
    assert!(!verify_jws(&parsed, other.public_key_der().unwrap()).unwrap());
}

/// RS256 signs and verifies, and the RSA JWK (n/e) conversion reproduces the
/// same SubjectPublicKeyInfo bytes.
#[test]
fn rs256_sign_verify_and_rsa_jwk_conversion() {
    let private_key = rsa::RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
    let public_key = private_key.to_public_key();

    let private_der = rsa::pkcs8::EncodePrivateKey::to_pkcs8_der(&private_key)
        .unwrap()
        .as_bytes()
        .to_vec();
    let public_der = public_key.to_public_key_der().unwrap().as_bytes().to_vec();

    let claims = serde_json::json!({ "iss": "http://platform.com" });
    let token = sign_jws(JwsAlgorithm::Rs256, "rsa-kid", &claims, &private_der).unwrap();

    let parsed = parse_jws(&token).unwrap();
    assert_eq!(parsed.header.alg, "RS256");
    assert!(verify_jws(&parsed, &public_der).unwrap());

    let jwk = Jwk {
        kty: "RSA".to_string(),
        kid: "rsa-kid".to_string(),
        alg: Some("RS256".to_string()),
        key_use: Some("sig".to_string()),
        n: Some(URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be())),
        e: Some(URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be())),
        crv: None,
        x: None,
        y: None,
    };

    assert_eq!(jwk.to_public_key_der().unwrap(), public_der);
}

/// A tampered payload fails verification.
#[test]
fn tampered_payload_fails_verification() {
    let chain = make_es256_key_chain("kid-1");
    let claims = serde_json::json!({ "role": "learner" });
    let token = sign_jws(
        JwsAlgorithm::Es256,
        "kid-1",
        &claims,
        chain.private_key_der().unwrap(),
    )
    .unwrap();

    let forged_payload = URL_SAFE_NO_PAD.encode(r#"{"role":"instructor"}"#);
    let segments: Vec<&str> = token.split('.').collect();
    let forged = format!("{}.{}.{}", segments[0], forged_payload, segments[2]);

    let parsed = parse_jws(&forged).unwrap();
    assert!(!verify_jws(&parsed, chain.public_key_der().unwrap()).unwrap());
}

/// Malformed tokens are parse errors, not panics.
#[test]
fn malformed_tokens_are_rejected_with_clear_errors() {
    assert_eq!(parse_jws("").unwrap_err(), "empty token");
    assert_eq!(
        parse_jws("only.two").unwrap_err(),
        "token is not a three-segment compact JWS"
    );
    assert_eq!(parse_jws("a..c").unwrap_err(), "token has an empty segment");
    assert!(parse_jws("!!!.AAAA.AAAA")
        .unwrap_err()
        .starts_with("failed to decode header segment"));

    // Valid base64 but not JSON.
    let not_json = URL_SAFE_NO_PAD.encode("not json");
    assert!(parse_jws(&format!("{not_json}.{not_json}.{not_json}"))
        .unwrap_err()
        .starts_with("header is not valid JSON"));

    // Header without alg.
    let no_alg = URL_SAFE_NO_PAD.encode(r#"{"typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode("{}");
    assert_eq!(
        parse_jws(&format!("{no_alg}.{payload}.AAAA")).unwrap_err(),
        "missing alg header"
    );
}

/// Unsupported algorithms are reported, not silently accepted.
#[test]
fn unsupported_algorithm_is_an_error() {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
    let payload = URL_SAFE_NO_PAD.encode("{}");
    let parsed = parse_jws(&format!("{header}.{payload}.AAAA")).unwrap();

    let chain = make_es256_key_chain("kid-1");
    let error = verify_jws(&parsed, chain.public_key_der().unwrap()).unwrap_err();
    assert_eq!(error, "unsupported alg: HS256");
}

/// The `aud` claim is accepted in both its string and array forms.
#[test]
fn audience_claim_accepts_string_and_array_forms() {
    let chain = make_es256_key_chain("kid-1");

    let token = sign_jws(
        JwsAlgorithm::Es256,
        "kid-1",
        &serde_json::json!({ "aud": "client" }),
        chain.private_key_der().unwrap(),
    )
    .unwrap();
    assert_eq!(parse_jws(&token).unwrap().audience(), Some("client"));

    let token = sign_jws(
        JwsAlgorithm::Es256,
        "kid-1",
        &serde_json::json!({ "aud": ["client", "other"] }),
        chain.private_key_der().unwrap(),
    )
    .unwrap();
    assert_eq!(parse_jws(&token).unwrap().audience(), Some("client"));
}

/// An EC JWK round-trips through a JWKS document into a key the static
/// fetcher serves and the codec verifies with.
#[test]
fn ec_jwk_set_feeds_the_static_fetcher() {
    use p256::elliptic_curve::sec1::ToEncodedPoint as _;
    use p256::pkcs8::DecodePublicKey as _;

    let chain = make_es256_key_chain("ec-kid");
    let public_key =
        p256::PublicKey::from_public_key_der(chain.public_key_der().unwrap()).unwrap();
    let point = public_key.to_encoded_point(false);

    let set = JwkSet {
        keys: vec![Jwk {
            kty: "EC".to_string(),
            kid: "ec-kid".to_string(),
            alg: Some("ES256".to_string()),
            key_use: Some("sig".to_string()),
            n: None,
            e: None,
            crv: Some("P-256".to_string()),
            x: Some(URL_SAFE_NO_PAD.encode(point.x().unwrap())),
            y: Some(URL_SAFE_NO_PAD.encode(point.y().unwrap())),
        }],
    };

    let fetcher = StaticJwksFetcher::new()
        .with_jwk_set("http://platform.com/jwks", &set)
        .unwrap();

    let der = fetcher.fetch_key("http://platform.com/jwks", "ec-kid").unwrap();
    assert_eq!(der, chain.public_key_der().unwrap());

    let token = sign_jws(
        JwsAlgorithm::Es256,
        "ec-kid",
        &serde_json::json!({ "iss": "http://platform.com" }),
        chain.private_key_der().unwrap(),
    )
    .unwrap();
    assert!(verify_jws(&parse_jws(&token).unwrap(), &der).unwrap());
}

/// Unknown (url, kid) pairs are fetch errors.
#[test]
fn static_fetcher_reports_unknown_keys() {
    let fetcher = StaticJwksFetcher::new();
    let error = fetcher.fetch_key("http://platform.com/jwks", "missing").unwrap_err();
    assert_eq!(
        error.to_string(),
        "no key 'missing' in JWKS 'http://platform.com/jwks'"
    );
}
