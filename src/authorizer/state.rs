//! Per-request authorization state
//!
//! Every request that passes through the gate gets its own
//! [`AuthorizationState`]. It starts out [`AuthorizationOutcome::NotEvaluated`],
//! settles on `Authorized` or `Denied` the first time [`AuthorizationState::authorize`]
//! runs, and never changes after that. Nothing in it is shared with other
//! requests; dropping the request drops the state.

use crate::authorizer::Authorizer;
use crate::authorizer::sink::SinkLevel;
use crate::error::{AuthError, AuthResult};
use crate::token::ClaimSet;
use axum::extract::OriginalUri;
use axum::http::{HeaderMap, Method, Request, Uri, header::AUTHORIZATION};
use std::fmt;
use std::sync::Arc;

/// The request data the gate and secondary checks look at
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap) -> Self {
        Self {
            method,
            uri,
            headers,
        }
    }

    /// Capture an incoming request
    ///
    /// Uses the URI the client actually sent. Inside a nested axum router
    /// the request URI has the mount prefix stripped; `OriginalUri` still
    /// carries it, and path rules are written against full paths.
    pub fn from_request<B>(request: &Request<B>) -> Self {
        let uri = request
            .extensions()
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| request.uri().clone());

        Self::new(request.method().clone(), uri, request.headers().clone())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path without the query string; this is what path rules match
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Token from the `Authorization` header
    ///
    /// Accepts `Bearer <token>` as well as a bare token. A header that is
    /// not valid visible ASCII, or has nothing after the scheme, counts as
    /// no token.
    pub fn bearer_token(&self) -> Option<&str> {
        let value = self.headers.get(AUTHORIZATION)?.to_str().ok()?.trim();

        let token = match value.split_once(|c: char| c.is_ascii_whitespace()) {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            _ => value,
        };

        (!token.is_empty() && !token.eq_ignore_ascii_case("bearer")).then_some(token)
    }
}

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    MissingToken,
    InvalidToken,
    SecondaryCheckFailed,
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DenialReason::MissingToken => "missing token",
            DenialReason::InvalidToken => "invalid token",
            DenialReason::SecondaryCheckFailed => "secondary check failed",
        })
    }
}

impl From<DenialReason> for AuthError {
    fn from(reason: DenialReason) -> Self {
        match reason {
            DenialReason::MissingToken => AuthError::TokenMissing,
            DenialReason::InvalidToken => AuthError::TokenInvalid,
            DenialReason::SecondaryCheckFailed => AuthError::SecondaryCheckFailed,
        }
    }
}

/// Where a request stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthorizationOutcome {
    /// Not challenged yet; also the state of requests on ungated paths
    #[default]
    NotEvaluated,
    Authorized(ClaimSet),
    Denied(DenialReason),
}

impl AuthorizationOutcome {
    pub fn is_pending(&self) -> bool {
        matches!(self, AuthorizationOutcome::NotEvaluated)
    }

    pub fn claims(&self) -> Option<&ClaimSet> {
        match self {
            AuthorizationOutcome::Authorized(claims) => Some(claims),
            _ => None,
        }
    }

    pub fn denial(&self) -> Option<DenialReason> {
        match self {
            AuthorizationOutcome::Denied(reason) => Some(*reason),
            _ => None,
        }
    }
}

impl From<Result<ClaimSet, DenialReason>> for AuthorizationOutcome {
    fn from(verdict: Result<ClaimSet, DenialReason>) -> Self {
        match verdict {
            Ok(claims) => AuthorizationOutcome::Authorized(claims),
            Err(reason) => AuthorizationOutcome::Denied(reason),
        }
    }
}

/// Authorization handle for one request
///
/// Downstream handlers take it as an extractor:
///
/// ```ignore
/// async fn refresh(mut auth: AuthorizationState) -> Result<String, AuthError> {
///     auth.refresh_token().await
/// }
/// ```
#[derive(Clone)]
pub struct AuthorizationState {
    authorizer: Arc<Authorizer>,
    request: RequestContext,
    outcome: AuthorizationOutcome,
}

impl AuthorizationState {
    pub fn new(authorizer: Arc<Authorizer>, request: RequestContext) -> Self {
        Self {
            authorizer,
            request,
            outcome: AuthorizationOutcome::NotEvaluated,
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self.outcome, AuthorizationOutcome::Authorized(_))
    }

    /// Decoded claims, once authorized
    pub fn token_value(&self) -> Option<&ClaimSet> {
        self.outcome.claims()
    }

    pub fn outcome(&self) -> &AuthorizationOutcome {
        &self.outcome
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    /// Sign a new token; does not touch this request's outcome
    pub async fn make_token(&self, claims: &ClaimSet) -> AuthResult<String> {
        self.authorizer.make_token(claims).await
    }

    /// Verify this request's token and run the secondary check
    ///
    /// The first call settles the outcome. Later calls return the same
    /// result without verifying again.
    pub async fn authorize(&mut self) -> AuthResult<&ClaimSet> {
        if self.outcome.is_pending() {
            let verdict = self.evaluate().await;
            self.outcome = verdict.into();
        }

        match &self.outcome {
            AuthorizationOutcome::Authorized(claims) => Ok(claims),
            AuthorizationOutcome::Denied(reason) => Err((*reason).into()),
            // evaluate always settles the outcome
            AuthorizationOutcome::NotEvaluated => Err(AuthError::TokenMissing),
        }
    }

    /// Reissue this request's token with a fresh expiry window
    ///
    /// Requires a currently valid token. The reserved timing claims are
    /// dropped before signing so the new token gets its own.
    pub async fn refresh_token(&mut self) -> AuthResult<String> {
        let claims = self.authorize().await?.without_reserved();
        self.make_token(&claims).await
    }

    async fn evaluate(&self) -> Result<ClaimSet, DenialReason> {
        let sink = self.authorizer.sink();
        let path = self.request.path();

        let Some(token) = self.request.bearer_token() else {
            sink.log(
                SinkLevel::Warn,
                &format!("authorization token missing for {path}"),
            );
            return Err(DenialReason::MissingToken);
        };

        let claims = match self.authorizer.verify(token).await {
            Ok(claims) => claims,
            Err(e) => {
                sink.log(SinkLevel::Warn, &format!("token rejected for {path}: {e}"));
                return Err(DenialReason::InvalidToken);
            }
        };

        // values can be personal data; names are enough to debug with
        sink.log(
            SinkLevel::Debug,
            &format!("decoded token claims [{}]", claims.names().join(", ")),
        );

        if !self.authorizer.secondary_check().check(&self.request, &claims).await {
            sink.log(
                SinkLevel::Warn,
                &format!("secondary authorization check failed for {path}"),
            );
            return Err(DenialReason::SecondaryCheckFailed);
        }

        Ok(claims)
    }
}

impl fmt::Debug for AuthorizationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationState")
            .field("path", &self.request.path())
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
