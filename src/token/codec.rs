//! Token codec trait and the JWT adapter
//!
//! The gate only needs two operations from a token backend: sign a claim set
//! and verify a token back into one. [`JwtCodec`] provides both on top of
//! `jsonwebtoken`; tests and alternative backends implement [`TokenCodec`].

use crate::error::TokenError;
use crate::token::claims::{ClaimSet, EXPIRES_AT, ISSUED_AT};
use crate::token::keys::{Algorithm, SigningKeys};
// async_trait required for dyn-compatibility with Arc<dyn TokenCodec>
use async_trait::async_trait;
use jsonwebtoken::{Header, Validation, decode, encode, get_current_timestamp};
use std::time::Duration;

/// Token signing and verification backend
#[async_trait]
pub trait TokenCodec: Send + Sync {
    /// Sign `claims` into a token that expires `expiry` after signing
    async fn sign(
        &self,
        claims: &ClaimSet,
        keys: &SigningKeys,
        expiry: Duration,
        algorithm: Algorithm,
    ) -> Result<String, TokenError>;

    /// Verify a token and return its claims, reserved claims included
    ///
    /// Malformed, badly signed, expired and not-yet-valid tokens all fail.
    async fn verify(
        &self,
        token: &str,
        keys: &SigningKeys,
        algorithm: Algorithm,
    ) -> Result<ClaimSet, TokenError>;

    /// Short backend name (for logging)
    fn codec_name(&self) -> &'static str;
}

/// JSON Web Token codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtCodec;

impl JwtCodec {
    pub fn new() -> Self {
        Self
    }

    fn validation(algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm.into());
        validation.leeway = 0;
        validation.validate_nbf = true;
        // audience is application data here, not something the gate checks
        validation.validate_aud = false;
        validation
    }
}

#[async_trait]
impl TokenCodec for JwtCodec {
    async fn sign(
        &self,
        claims: &ClaimSet,
        keys: &SigningKeys,
        expiry: Duration,
        algorithm: Algorithm,
    ) -> Result<String, TokenError> {
        let issued_at = get_current_timestamp();

        let mut payload = claims.clone();
        payload.insert(ISSUED_AT, issued_at);
        payload.insert(EXPIRES_AT, issued_at.saturating_add(expiry.as_secs()));

        encode(&Header::new(algorithm.into()), &payload, keys.encoding())
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    async fn verify(
        &self,
        token: &str,
        keys: &SigningKeys,
        algorithm: Algorithm,
    ) -> Result<ClaimSet, TokenError> {
        let data = decode::<ClaimSet>(token, keys.decoding(), &Self::validation(algorithm))?;
        Ok(data.claims)
    }

    fn codec_name(&self) -> &'static str {
        "jwt"
    }
}
