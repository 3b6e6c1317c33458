//! Signing algorithms and key material

use crate::error::ConfigError;
use crate::util::SecretString;
use jsonwebtoken::{DecodingKey, EncodingKey};
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Supported signing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Algorithm {
    #[default]
    HS256,
    HS384,
    HS512,
    RS256,
    RS384,
    RS512,
    PS256,
    PS384,
    PS512,
    ES256,
    ES384,
    EdDSA,
}

/// Key family an algorithm belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFamily {
    /// Shared secret
    Hmac,
    /// RSA PEM key pair (RS* and PS*)
    Rsa,
    /// Elliptic curve PEM key pair
    Ec,
    /// Ed25519 PEM key pair
    Ed,
}

impl Algorithm {
    pub const ALL: [Algorithm; 12] = [
        Algorithm::HS256,
        Algorithm::HS384,
        Algorithm::HS512,
        Algorithm::RS256,
        Algorithm::RS384,
        Algorithm::RS512,
        Algorithm::PS256,
        Algorithm::PS384,
        Algorithm::PS512,
        Algorithm::ES256,
        Algorithm::ES384,
        Algorithm::EdDSA,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            Algorithm::RS256 => "RS256",
            Algorithm::RS384 => "RS384",
            Algorithm::RS512 => "RS512",
            Algorithm::PS256 => "PS256",
            Algorithm::PS384 => "PS384",
            Algorithm::PS512 => "PS512",
            Algorithm::ES256 => "ES256",
            Algorithm::ES384 => "ES384",
            Algorithm::EdDSA => "EdDSA",
        }
    }

    pub const fn family(&self) -> KeyFamily {
        match self {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => KeyFamily::Hmac,
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => KeyFamily::Rsa,
            Algorithm::ES256 | Algorithm::ES384 => KeyFamily::Ec,
            Algorithm::EdDSA => KeyFamily::Ed,
        }
    }

    /// Whether signing and verification use different keys
    pub const fn is_asymmetric(&self) -> bool {
        !matches!(self.family(), KeyFamily::Hmac)
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|alg| alg.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnsupportedAlgorithm(s.to_string()))
    }
}

impl TryFrom<String> for Algorithm {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Algorithm> for jsonwebtoken::Algorithm {
    fn from(alg: Algorithm) -> Self {
        match alg {
            Algorithm::HS256 => jsonwebtoken::Algorithm::HS256,
            Algorithm::HS384 => jsonwebtoken::Algorithm::HS384,
            Algorithm::HS512 => jsonwebtoken::Algorithm::HS512,
            Algorithm::RS256 => jsonwebtoken::Algorithm::RS256,
            Algorithm::RS384 => jsonwebtoken::Algorithm::RS384,
            Algorithm::RS512 => jsonwebtoken::Algorithm::RS512,
            Algorithm::PS256 => jsonwebtoken::Algorithm::PS256,
            Algorithm::PS384 => jsonwebtoken::Algorithm::PS384,
            Algorithm::PS512 => jsonwebtoken::Algorithm::PS512,
            Algorithm::ES256 => jsonwebtoken::Algorithm::ES256,
            Algorithm::ES384 => jsonwebtoken::Algorithm::ES384,
            Algorithm::EdDSA => jsonwebtoken::Algorithm::EdDSA,
        }
    }
}

/// Parsed signing and verification keys
///
/// Built once when the gate is constructed, so a bad PEM fails at setup
/// rather than on the first request.
#[derive(Clone)]
pub struct SigningKeys {
    algorithm: Algorithm,
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKeys {
    /// Build keys for an algorithm
    ///
    /// HMAC algorithms use `private_key` as the shared secret and ignore
    /// `public_key`. Every other algorithm reads `private_key` as a PEM
    /// private key and requires `public_key` as the matching PEM public key.
    pub fn new(
        algorithm: Algorithm,
        private_key: &SecretString,
        public_key: Option<&SecretString>,
    ) -> Result<Self, ConfigError> {
        let invalid = |e: jsonwebtoken::errors::Error| ConfigError::InvalidKey {
            algorithm: algorithm.to_string(),
            reason: e.to_string(),
        };

        let private_pem = private_key.expose_secret().as_bytes();
        let public_pem = || {
            public_key
                .map(|key| key.expose_secret().as_bytes())
                .ok_or_else(|| ConfigError::Missing {
                    field: format!("gate.public_key (required for {algorithm})"),
                })
        };

        let (encoding, decoding) = match algorithm.family() {
            KeyFamily::Hmac => (
                EncodingKey::from_secret(private_pem),
                DecodingKey::from_secret(private_pem),
            ),
            KeyFamily::Rsa => {
                let public_pem = public_pem()?;
                (
                    EncodingKey::from_rsa_pem(private_pem).map_err(invalid)?,
                    DecodingKey::from_rsa_pem(public_pem).map_err(invalid)?,
                )
            }
            KeyFamily::Ec => {
                let public_pem = public_pem()?;
                (
                    EncodingKey::from_ec_pem(private_pem).map_err(invalid)?,
                    DecodingKey::from_ec_pem(public_pem).map_err(invalid)?,
                )
            }
            KeyFamily::Ed => {
                let public_pem = public_pem()?;
                (
                    EncodingKey::from_ed_pem(private_pem).map_err(invalid)?,
                    DecodingKey::from_ed_pem(public_pem).map_err(invalid)?,
                )
            }
        };

        Ok(Self {
            algorithm,
            encoding,
            decoding,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeys")
            .field("algorithm", &self.algorithm)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}
