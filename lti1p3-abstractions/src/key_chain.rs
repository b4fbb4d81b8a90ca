// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Key material descriptors.
//!
//! Keys are carried as DER bytes and parsed at the point of use by the JWS
//! codec. A key chain may hold only one half of a key pair: signing requires
//! the private half, verification the public half, and the absence of the
//! required half is reported as the "key chain not configured" failure.

/// JWS signature algorithms supported by the launch token family.
///
/// LTI 1.3 mandates RS256 for platform-issued tokens; ES256 is accepted for
/// tool-issued state tokens and test key material.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum JwsAlgorithm {
    Rs256,
    Es256,
}

impl JwsAlgorithm {
    /// JOSE `alg` header value.
    pub fn name(&self) -> &'static str {
        match self {
            JwsAlgorithm::Rs256 => "RS256",
            JwsAlgorithm::Es256 => "ES256",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyChain {
    identifier: String,
    algorithm: JwsAlgorithm,
    /// SubjectPublicKeyInfo DER bytes.
    public_key_der: Option<Vec<u8>>,
    /// PKCS#8 DER bytes.
    private_key_der: Option<Vec<u8>>,
}

impl KeyChain {
    pub fn new(
        identifier: impl Into<String>,
        algorithm: JwsAlgorithm,
        public_key_der: Option<Vec<u8>>,
        private_key_der: Option<Vec<u8>>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            algorithm,
            public_key_der,
            private_key_der,
        }
    }

    /// The JOSE `kid` this chain signs under.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn algorithm(&self) -> JwsAlgorithm {
        self.algorithm
    }

    pub fn public_key_der(&self) -> Option<&[u8]> {
        self.public_key_der.as_deref()
    }

    pub fn private_key_der(&self) -> Option<&[u8]> {
        self.private_key_der.as_deref()
    }
}
