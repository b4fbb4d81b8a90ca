// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! JSON Web Key documents and a static fetcher.
//!
//! A platform publishes its current public keys as a JWKS document; the key
//! resolution policy falls back to it when no static platform key is
//! configured. Network fetch mechanics stay behind the [`JwksFetcher`]
//! contract; this module provides the wire model and an in-process fetcher
//! for pre-distributed key sets and tests.

use std::collections::HashMap;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use p256::elliptic_curve::sec1::FromEncodedPoint as _;
use rsa::pkcs8::EncodePublicKey as _;
use serde::{Deserialize, Serialize};

use lti1p3_abstractions::{JwksFetchError, JwksFetcher};

/// A JSON Web Key.
///
/// RSA keys carry `n`/`e`; elliptic-curve keys carry `crv`/`x`/`y`. All
/// binary fields are base64url without padding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

/// A JSON Web Key Set document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

impl Jwk {
    /// Convert to SubjectPublicKeyInfo DER bytes.
    pub fn to_public_key_der(&self) -> Result<Vec<u8>, String> {
        match self.kty.as_str() {
            "RSA" => {
                let n = decode_b64_field(self.n.as_deref(), "n")?;
                let e = decode_b64_field(self.e.as_deref(), "e")?;
                let key = rsa::RsaPublicKey::new(
                    rsa::BigUint::from_bytes_be(&n),
                    rsa::BigUint::from_bytes_be(&e),
                )
                .map_err(|e| format!("bad RSA JWK parameters: {e}"))?;
                Ok(key
                    .to_public_key_der()
                    .map_err(|e| format!("failed to encode RSA public key: {e}"))?
                    .as_bytes()
                    .to_vec())
            }
            "EC" => {
                match self.crv.as_deref() {
                    Some("P-256") => {}
                    other => return Err(format!("unsupported EC curve: {other:?}")),
                }
                let x = decode_b64_field(self.x.as_deref(), "x")?;
                let y = decode_b64_field(self.y.as_deref(), "y")?;
                if x.len() != 32 || y.len() != 32 {
                    return Err("P-256 coordinates must be 32 bytes".to_string());
                }
                let point = p256::EncodedPoint::from_affine_coordinates(
                    p256::elliptic_curve::generic_array::GenericArray::from_slice(&x),
                    p256::elliptic_curve::generic_array::GenericArray::from_slice(&y),
                    false,
                );
                let key: p256::PublicKey = Option::from(p256::PublicKey::from_encoded_point(&point))
                    .ok_or_else(|| "EC point is not on the P-256 curve".to_string())?;
                Ok(key
                    .to_public_key_der()
                    .map_err(|e| format!("failed to encode EC public key: {e}"))?
                    .as_bytes()
                    .to_vec())
            }
            other => Err(format!("unsupported kty: {other}")),
        }
    }
}

fn decode_b64_field(field: Option<&str>, name: &str) -> Result<Vec<u8>, String> {
    let value = field.ok_or_else(|| format!("JWK is missing '{name}'"))?;
    URL_SAFE_NO_PAD
        .decode(value)
        .map_err(|e| format!("JWK '{name}' is not valid base64url: {e}"))
}

/// Key fetch over in-process key sets, keyed by JWKS URL.
#[derive(Debug, Default)]
pub struct StaticJwksFetcher {
    keys: HashMap<String, HashMap<String, Vec<u8>>>,
}

impl StaticJwksFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw SubjectPublicKeyInfo DER key under (url, kid).
    pub fn with_key(mut self, jwks_url: impl Into<String>, kid: impl Into<String>, der: Vec<u8>) -> Self {
        self.keys
            .entry(jwks_url.into())
            .or_default()
            .insert(kid.into(), der);
        self
    }

    /// Register every key of a JWKS document under its URL.
    pub fn with_jwk_set(mut self, jwks_url: impl Into<String>, set: &JwkSet) -> Result<Self, JwksFetchError> {
        let url = jwks_url.into();
        for jwk in &set.keys {
            let der = jwk
                .to_public_key_der()
                .map_err(JwksFetchError::Message)?;
            self.keys.entry(url.clone()).or_default().insert(jwk.kid.clone(), der);
        }
        Ok(self)
    }
}

impl JwksFetcher for StaticJwksFetcher {
    fn fetch_key(&self, jwks_url: &str, key_id: &str) -> Result<Vec<u8>, JwksFetchError> {
        self.keys
            .get(jwks_url)
            .and_then(|set| set.get(key_id))
            .cloned()
            .ok_or_else(|| {
                JwksFetchError::Message(format!("no key '{key_id}' in JWKS '{jwks_url}'"))
            })
    }
}
