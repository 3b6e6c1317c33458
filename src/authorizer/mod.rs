//! Token verification and issuance
//!
//! [`Authorizer`] bundles what every request needs to verify or issue a
//! token: the codec, the keys, the expiry window, the secondary check and the
//! log sink. It is built once by the gate and shared read-only by all
//! requests; per-request progress lives in [`AuthorizationState`].

pub mod check;
pub mod sink;
pub mod state;

pub use check::{AllowAll, FnCheck, SecondaryCheck, check_fn};
pub use sink::{FnSink, LogSink, NoopSink, SinkLevel, StdoutSink, TracingSink, sink_fn};
pub use state::{AuthorizationOutcome, AuthorizationState, DenialReason, RequestContext};

use crate::error::{AuthError, AuthResult, TokenError};
use crate::token::{Algorithm, ClaimSet, SigningKeys, TokenCodec};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Shared signing settings and strategies
pub struct Authorizer {
    codec: Arc<dyn TokenCodec>,
    keys: SigningKeys,
    expiry: Duration,
    check: Arc<dyn SecondaryCheck>,
    sink: Arc<dyn LogSink>,
}

impl Authorizer {
    pub fn new(
        codec: Arc<dyn TokenCodec>,
        keys: SigningKeys,
        expiry: Duration,
        check: Arc<dyn SecondaryCheck>,
        sink: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            codec,
            keys,
            expiry,
            check,
            sink,
        }
    }

    /// Sign `claims` with the configured key, algorithm and expiry
    pub async fn make_token(&self, claims: &ClaimSet) -> AuthResult<String> {
        self.codec
            .sign(claims, &self.keys, self.expiry, self.keys.algorithm())
            .await
            .map_err(|e| {
                self.sink
                    .log(SinkLevel::Warn, &format!("token signing failed: {e}"));
                AuthError::Issuance(e)
            })
    }

    /// Verify a raw token with the configured key and algorithm
    pub async fn verify(&self, token: &str) -> Result<ClaimSet, TokenError> {
        self.codec
            .verify(token, &self.keys, self.keys.algorithm())
            .await
    }

    pub fn algorithm(&self) -> Algorithm {
        self.keys.algorithm()
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }

    pub fn sink(&self) -> &dyn LogSink {
        self.sink.as_ref()
    }

    pub fn secondary_check(&self) -> &dyn SecondaryCheck {
        self.check.as_ref()
    }
}

impl fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorizer")
            .field("codec", &self.codec.codec_name())
            .field("algorithm", &self.keys.algorithm())
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
