//! Reference HTTP routes
//!
//! A small token service built on the gate: log in, refresh and inspect
//! tokens. Which of these routes need a token is decided by the gate's path
//! rules, not here. Logins are decided by the configured [`Issuer`]; the
//! claims a client posts are never signed as-is.

use crate::authorizer::AuthorizationState;
use crate::error::AuthError;
use crate::gate::Gate;
use crate::server::issuer::{Issuer, RefuseAll};
use crate::token::ClaimSet;
use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Body returned when a token is issued
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Body returned by `/auth/whoami`
#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub authorized: bool,
    pub claims: Option<ClaimSet>,
}

/// Build the reference router; `/auth/token` refuses every login
pub fn router(gate: Gate) -> Router {
    router_with_issuer(gate, RefuseAll)
}

/// Build the reference router with `issuer` deciding logins
pub fn router_with_issuer(gate: Gate, issuer: impl Issuer + 'static) -> Router {
    let issuer: Arc<dyn Issuer> = Arc::new(issuer);

    let routes = Router::new()
        .route("/health", get(health))
        .route("/auth/token", post(issue_token))
        .route("/auth/refresh", post(refresh_token))
        .route("/auth/whoami", get(whoami));

    gate.install(routes)
        .with_state(issuer)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str {
    "ok"
}

/// Exchange credentials for a token
async fn issue_token(
    State(issuer): State<Arc<dyn Issuer>>,
    auth: AuthorizationState,
    Json(credentials): Json<Value>,
) -> Result<Json<TokenResponse>, AuthError> {
    let request = auth.request();

    let Some(claims) = issuer.issue(request, &credentials).await else {
        warn!(path = request.path(), "Login refused by token issuer");
        return Err(AuthError::CredentialsRejected);
    };

    let token = auth.make_token(&claims).await?;
    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

/// Reissue the caller's token with a new expiry
async fn refresh_token(mut auth: AuthorizationState) -> Result<Json<TokenResponse>, AuthError> {
    let token = auth.refresh_token().await?;
    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

/// Report the caller's authorization as the gate saw it
async fn whoami(auth: AuthorizationState) -> Json<WhoAmI> {
    Json(WhoAmI {
        authorized: auth.is_authorized(),
        claims: auth.token_value().cloned(),
    })
}
