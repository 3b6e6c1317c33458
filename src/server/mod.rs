//! Bundled token service
//!
//! Used by the `authgate` binary and as a worked example of wiring the gate
//! into an axum application.

pub mod issuer;
pub mod routes;

pub use issuer::{FnIssuer, Issuer, RefuseAll, issuer_fn};
pub use routes::{TokenResponse, WhoAmI, router, router_with_issuer};
