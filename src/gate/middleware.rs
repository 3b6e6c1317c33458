//! axum integration
//!
//! The middleware runs [`Gate::check`] and stores the resulting
//! [`AuthorizationState`] in the request extensions, where handlers pick it
//! up with the extractor below.

use crate::authorizer::{AuthorizationState, RequestContext};
use crate::error::AuthError;
use crate::gate::Gate;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Gate middleware for `axum::middleware::from_fn_with_state`
///
/// ```ignore
/// let app = Router::new()
///     .route("/admin/stats", get(stats))
///     .layer(axum::middleware::from_fn_with_state(gate, gate_middleware));
/// ```
pub async fn gate_middleware(State(gate): State<Gate>, mut req: Request, next: Next) -> Response {
    let context = RequestContext::from_request(&req);

    match gate.check(context).await {
        Ok(state) => {
            req.extensions_mut().insert(state);
            next.run(req).await
        }
        Err(rejection) => rejection.into_response(),
    }
}

impl<S> FromRequestParts<S> for AuthorizationState
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizationState>()
            .cloned()
            .ok_or(AuthError::NotInstalled)
    }
}
