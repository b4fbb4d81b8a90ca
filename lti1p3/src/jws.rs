// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Compact JWS parsing, signing and signature verification.
//!
//! A JWS compact serialization is three base64url segments:
//!
//! ```text
//! BASE64URL(UTF8(JOSE header)) "." BASE64URL(payload) "." BASE64URL(signature)
//! ```
//!
//! This module focuses on:
//! - Robust parsing with clear error messages.
//! - Constructing the signing input for signature verification.
//! - RS256 / ES256 verification dispatched on the JOSE `alg` header.
//!
//! Keys are accepted as DER bytes: SubjectPublicKeyInfo for verification,
//! PKCS#8 for signing.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::pkcs1v15;
use rsa::pkcs8::{DecodePrivateKey as _, DecodePublicKey as _};
use rsa::RsaPublicKey;
use sha2::Sha256;
use signature::{SignatureEncoding as _, Signer as _, Verifier as _};

use lti1p3_abstractions::JwsAlgorithm;

/// Decoded JOSE header fields used by the launch token family.
#[derive(Debug, Clone)]
pub struct JoseHeader {
    pub alg: String,
    pub kid: Option<String>,
    pub typ: Option<String>,
}

/// A parsed (not yet verified) compact JWS.
#[derive(Debug, Clone)]
pub struct ParsedJws {
    pub header: JoseHeader,
    pub claims: serde_json::Value,
    /// Bytes of `b64(header) "." b64(payload)`, the signature input.
    pub signing_input: Vec<u8>,
    pub signature: Vec<u8>,
}

impl ParsedJws {
    /// A claim as a string, if present with that type.
    pub fn claim_str(&self, name: &str) -> Option<&str> {
        self.claims.get(name).and_then(serde_json::Value::as_str)
    }

    /// A claim as an integer, if present with that type.
    pub fn claim_i64(&self, name: &str) -> Option<i64> {
        self.claims.get(name).and_then(serde_json::Value::as_i64)
    }

    /// The `aud` claim, accepting both the string and array-of-strings forms.
    pub fn audience(&self) -> Option<&str> {
        match self.claims.get("aud") {
            Some(serde_json::Value::String(aud)) => Some(aud.as_str()),
            Some(serde_json::Value::Array(auds)) => {
                auds.first().and_then(serde_json::Value::as_str)
            }
            _ => None,
        }
    }
}

/// Parse a compact JWS.
///
/// This parser is deliberately strict:
/// - Rejects empty input.
/// - Requires exactly three non-empty dot-separated segments.
/// - Requires the header to be a JSON object with a string `alg`.
/// - Requires the payload to be a JSON object.
pub fn parse_jws(token: &str) -> Result<ParsedJws, String> {
    if token.is_empty() {
        return Err("empty token".to_string());
    }

    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err("token is not a three-segment compact JWS".to_string());
    }
    if segments.iter().any(|s| s.is_empty()) {
        return Err("token has an empty segment".to_string());
    }

    let header_bytes = URL_SAFE_NO_PAD
        .decode(segments[0])
        .map_err(|e| format!("failed to decode header segment: {e}"))?;
    let payload_bytes = URL_SAFE_NO_PAD
        .decode(segments[1])
        .map_err(|e| format!("failed to decode payload segment: {e}"))?;
    let signature = URL_SAFE_NO_PAD
        .decode(segments[2])
        .map_err(|e| format!("failed to decode signature segment: {e}"))?;

    let header: serde_json::Value = serde_json::from_slice(&header_bytes)
        .map_err(|e| format!("header is not valid JSON: {e}"))?;
    let alg = header
        .get("alg")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| "missing alg header".to_string())?
        .to_string();
    let kid = header
        .get("kid")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);
    let typ = header
        .get("typ")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string);

    let claims: serde_json::Value = serde_json::from_slice(&payload_bytes)
        .map_err(|e| format!("payload is not valid JSON: {e}"))?;
    if !claims.is_object() {
        return Err("payload is not a JSON object".to_string());
    }

    let signing_input = format!("{}.{}", segments[0], segments[1]).into_bytes();

    Ok(ParsedJws {
        header: JoseHeader { alg, kid, typ },
        claims,
        signing_input,
        signature,
    })
}

/// Verify a parsed JWS against a SubjectPublicKeyInfo DER public key.
///
/// Returns `Ok(false)` for a well-formed but invalid signature, and `Err`
/// when the algorithm is unsupported or the key material is unusable.
pub fn verify_jws(jws: &ParsedJws, public_key_der: &[u8]) -> Result<bool, String> {
    match jws.header.alg.as_str() {
        "RS256" => verify_rs256(public_key_der, &jws.signing_input, &jws.signature),
        "ES256" => verify_es256(public_key_der, &jws.signing_input, &jws.signature),
        other => Err(format!("unsupported alg: {other}")),
    }
}

/// Sign claims into a compact JWS with header `{ alg, typ: "JWT", kid }`.
pub fn sign_jws(
    algorithm: JwsAlgorithm,
    kid: &str,
    claims: &serde_json::Value,
    private_key_der: &[u8],
) -> Result<String, String> {
    let header = serde_json::json!({
        "alg": algorithm.name(),
        "typ": "JWT",
        "kid": kid,
    });

    let header_b64 = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&header).map_err(|e| format!("failed to encode header: {e}"))?,
    );
    let payload_b64 = URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(claims).map_err(|e| format!("failed to encode claims: {e}"))?,
    );

    let signing_input = format!("{header_b64}.{payload_b64}");

    let signature = match algorithm {
        JwsAlgorithm::Rs256 => sign_rs256(private_key_der, signing_input.as_bytes())?,
        JwsAlgorithm::Es256 => sign_es256(private_key_der, signing_input.as_bytes())?,
    };

    Ok(format!(
        "{signing_input}.{}",
        URL_SAFE_NO_PAD.encode(signature)
    ))
}

fn verify_rs256(pub_der: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool, String> {
    let key = RsaPublicKey::from_public_key_der(pub_der)
        .map_err(|e| format!("bad RSA public key: {e}"))?;
    let vk = pkcs1v15::VerifyingKey::<Sha256>::new(key);

    let signature = match pkcs1v15::Signature::try_from(sig) {
        Ok(s) => s,
        Err(_) => return Ok(false),
    };

    Ok(vk.verify(msg, &signature).is_ok())
}

fn sign_rs256(priv_der: &[u8], msg: &[u8]) -> Result<Vec<u8>, String> {
    let key = rsa::RsaPrivateKey::from_pkcs8_der(priv_der)
        .map_err(|e| format!("bad RSA private key: {e}"))?;
    let sk = pkcs1v15::SigningKey::<Sha256>::new(key);
    let signature: pkcs1v15::Signature = sk.sign(msg);
    Ok(signature.to_vec())
}

fn verify_es256(pub_der: &[u8], msg: &[u8], sig: &[u8]) -> Result<bool, String> {
    let pk = p256::PublicKey::from_public_key_der(pub_der)
        .map_err(|e| format!("bad P-256 public key: {e}"))?;

    let ep = pk.to_encoded_point(false);
    let vk = p256::ecdsa::VerifyingKey::from_sec1_bytes(ep.as_bytes())
        .map_err(|e| format!("bad P-256 public key: {e}"))?;

    // ES256 JWS signatures are the raw fixed-size r || s concatenation.
    let signature = match p256::ecdsa::Signature::from_slice(sig) {
        Ok(s) => s,
        Err(_) => return Ok(false),
    };

    Ok(vk.verify(msg, &signature).is_ok())
}

fn sign_es256(priv_der: &[u8], msg: &[u8]) -> Result<Vec<u8>, String> {
    let sk = p256::ecdsa::SigningKey::from_pkcs8_der(priv_der)
        .map_err(|e| format!("bad P-256 private key: {e}"))?;
    let signature: p256::ecdsa::Signature = sk.sign(msg);
    Ok(signature.to_bytes().to_vec())
}
