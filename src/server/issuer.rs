//! Credential checks for token issuance
//!
//! `POST /auth/token` signs whatever claim set the [`Issuer`] returns for the
//! posted login body. The default, [`RefuseAll`], returns nothing, so a
//! service that has not wired in a real credential check cannot mint tokens.

use crate::authorizer::RequestContext;
use crate::token::ClaimSet;
// async_trait required for dyn-compatibility with Arc<dyn Issuer>
use async_trait::async_trait;
use serde_json::Value;

/// Turns a login request into the claims of a new token
#[async_trait]
pub trait Issuer: Send + Sync {
    /// Return `None` to refuse the login
    async fn issue(&self, request: &RequestContext, credentials: &Value) -> Option<ClaimSet>;
}

/// Refuses every login
#[derive(Debug, Clone, Copy, Default)]
pub struct RefuseAll;

#[async_trait]
impl Issuer for RefuseAll {
    async fn issue(&self, _request: &RequestContext, _credentials: &Value) -> Option<ClaimSet> {
        None
    }
}

/// Issuer backed by a synchronous closure; see [`issuer_fn`]
#[derive(Clone)]
pub struct FnIssuer<F>(F);

#[async_trait]
impl<F> Issuer for FnIssuer<F>
where
    F: Fn(&RequestContext, &Value) -> Option<ClaimSet> + Send + Sync,
{
    async fn issue(&self, request: &RequestContext, credentials: &Value) -> Option<ClaimSet> {
        (self.0)(request, credentials)
    }
}

/// Use a closure as an issuer
pub fn issuer_fn<F>(f: F) -> FnIssuer<F>
where
    F: Fn(&RequestContext, &Value) -> Option<ClaimSet> + Send + Sync,
{
    FnIssuer(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, Method, Uri};
    use serde_json::json;

    fn request() -> RequestContext {
        RequestContext::new(Method::POST, Uri::from_static("/auth/token"), HeaderMap::new())
    }

    #[tokio::test]
    async fn test_refuse_all_ignores_requested_claims() {
        let credentials = json!({"sub": "anonymous", "role": "admin"});
        assert!(RefuseAll.issue(&request(), &credentials).await.is_none());
    }

    #[tokio::test]
    async fn test_closure_issuer() {
        let issuer = issuer_fn(|_req, credentials: &Value| {
            (credentials["password"] == "hunter2").then(|| ClaimSet::new().with("sub", "ops"))
        });

        let accepted = issuer
            .issue(&request(), &json!({"password": "hunter2"}))
            .await;
        assert_eq!(accepted, Some(ClaimSet::new().with("sub", "ops")));
        assert!(issuer.issue(&request(), &json!({"password": "x"})).await.is_none());
    }
}
