//! authgate
//!
//! JWT authorization gate for axum services.
//!
//! ## Features
//!
//! - **Path-scoped gating** with regex rules and exemptions that always win
//! - **Per-request state** that handlers extract to inspect claims, refresh
//!   or issue tokens
//! - **Pluggable secondary checks** run after the signature is verified
//! - **HMAC and asymmetric keys** (HS*, RS*, PS*, ES256/384, EdDSA)
//! - **Layered configuration** via TOML files and environment variables
//!
//! ## Decision Model
//!
//! ```text
//! no rules → ungated
//! path matches an exemption → exempt
//! path matches a rule → token required
//! otherwise → ungated
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let gate = Gate::builder()
//!     .private_key(std::env::var("JWT_SECRET")?)
//!     .expires_in("30m")
//!     .need_auth_path("^/admin")
//!     .need_auth_path_except("^/admin/login$")
//!     .build()?;
//!
//! let app = gate.install(Router::new().route("/admin/stats", get(stats)));
//! ```

pub mod authorizer;
pub mod config;
pub mod error;
pub mod gate;
pub mod paths;
pub mod server;
pub mod token;
pub mod transport;
pub mod util;

// Re-export main types
pub use authorizer::{AuthorizationState, RequestContext, SecondaryCheck};
pub use config::{AppConfig, load_config};
pub use error::{AppError, AuthError, ConfigError, Result, TokenError};
pub use gate::{Gate, GateBuilder};
pub use paths::{AuthorizationDecision, PatternMatcher};
pub use token::{ClaimSet, JwtCodec, TokenCodec};
