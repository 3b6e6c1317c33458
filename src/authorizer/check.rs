//! Secondary authorization checks
//!
//! A check runs after the token signature has been verified and can still
//! refuse the request, e.g. because a session was revoked or a header is
//! missing. Refusals are reported to the client exactly like a bad token.

use crate::authorizer::state::RequestContext;
use crate::token::ClaimSet;
// async_trait required for dyn-compatibility with Arc<dyn SecondaryCheck>
use async_trait::async_trait;

/// Additional predicate applied to verified requests
#[async_trait]
pub trait SecondaryCheck: Send + Sync {
    /// Return `false` to deny the request
    async fn check(&self, request: &RequestContext, claims: &ClaimSet) -> bool;
}

/// Accepts every verified request
///
/// This is the default when no check is configured: a valid signature alone
/// authorizes. Suitable for development, not for deployments that need
/// revocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

#[async_trait]
impl SecondaryCheck for AllowAll {
    async fn check(&self, _request: &RequestContext, _claims: &ClaimSet) -> bool {
        true
    }
}

/// Check backed by a synchronous closure; see [`check_fn`]
#[derive(Clone)]
pub struct FnCheck<F>(F);

#[async_trait]
impl<F> SecondaryCheck for FnCheck<F>
where
    F: Fn(&RequestContext, &ClaimSet) -> bool + Send + Sync,
{
    async fn check(&self, request: &RequestContext, claims: &ClaimSet) -> bool {
        (self.0)(request, claims)
    }
}

/// Use a closure as a secondary check
pub fn check_fn<F>(f: F) -> FnCheck<F>
where
    F: Fn(&RequestContext, &ClaimSet) -> bool + Send + Sync,
{
    FnCheck(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, Method, Uri};

    fn request() -> RequestContext {
        RequestContext::new(Method::GET, Uri::from_static("/admin"), HeaderMap::new())
    }

    #[tokio::test]
    async fn test_allow_all() {
        assert!(AllowAll.check(&request(), &ClaimSet::new()).await);
    }

    #[tokio::test]
    async fn test_closure_check_sees_claims() {
        let admins_only = check_fn(|_req, claims: &ClaimSet| {
            claims.get("role").and_then(|v| v.as_str()) == Some("admin")
        });

        let admin = ClaimSet::new().with("role", "admin");
        let guest = ClaimSet::new().with("role", "guest");

        assert!(admins_only.check(&request(), &admin).await);
        assert!(!admins_only.check(&request(), &guest).await);
    }

    #[tokio::test]
    async fn test_closure_check_sees_request() {
        let get_only = check_fn(|req: &RequestContext, _claims| req.method() == Method::GET);
        assert!(get_only.check(&request(), &ClaimSet::new()).await);
    }
}
