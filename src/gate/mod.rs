//! The authorization gate
//!
//! Per request, the gate:
//!
//! 1. builds a fresh [`AuthorizationState`] for the request,
//! 2. classifies the path against the required and exempt rules,
//! 3. lets ungated and exempt paths through unchallenged
//!    (`is_authorized() == false`, no codec call),
//! 4. otherwise verifies the token and runs the secondary check, passing
//!    the request on only when it is authorized.
//!
//! Denied requests get exactly one 401 response and never reach the inner
//! service.
//!
//! Path rules match the full path the client requested. When the layer sits
//! on a nested router, the mount prefix is recovered from axum's
//! `OriginalUri`; rules should still be written with it.

mod builder;
mod middleware;

pub use builder::{DEFAULT_PRIVATE_KEY, GateBuilder};
pub use middleware::gate_middleware;

use crate::authorizer::{AuthorizationState, Authorizer, RequestContext};
use crate::error::AuthResult;
use crate::paths::{AuthorizationDecision, PathDecision};
use crate::token::ClaimSet;
use axum::Router;
use std::sync::Arc;
use tracing::debug;

/// Request gate; cheap to clone, immutable once built
#[derive(Debug, Clone)]
pub struct Gate {
    inner: Arc<GateInner>,
}

#[derive(Debug)]
struct GateInner {
    decision: AuthorizationDecision,
    authorizer: Arc<Authorizer>,
}

impl Gate {
    pub fn builder() -> GateBuilder {
        GateBuilder::new()
    }

    pub fn decision(&self) -> &AuthorizationDecision {
        &self.inner.decision
    }

    pub fn authorizer(&self) -> &Arc<Authorizer> {
        &self.inner.authorizer
    }

    /// Issue a token outside of any request
    pub async fn make_token(&self, claims: &ClaimSet) -> AuthResult<String> {
        self.inner.authorizer.make_token(claims).await
    }

    /// Run the gate for one request
    ///
    /// `Ok` carries the state to hand downstream; `Err` is the rejection to
    /// send instead.
    pub async fn check(&self, request: RequestContext) -> AuthResult<AuthorizationState> {
        let mut state = AuthorizationState::new(Arc::clone(&self.inner.authorizer), request);

        match self.inner.decision.evaluate(state.request().path()) {
            PathDecision::Ungated => {}
            PathDecision::Exempt { pattern } => {
                debug!(path = state.request().path(), %pattern, "Path exempt from authorization");
            }
            PathDecision::Required => {
                // a missing token is refused before the codec is consulted
                state.authorize().await?;
                debug!(path = state.request().path(), "Request authorized");
            }
        }

        Ok(state)
    }

    /// Wrap every route of `router` with this gate
    pub fn install<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router.layer(axum::middleware::from_fn_with_state(self, gate_middleware))
    }
}
