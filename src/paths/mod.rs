//! Path classification
//!
//! Decides, per request path, whether the gate must challenge for a token.
//!
//! ```toml
//! [gate]
//! need_auth_paths = ["^/"]                          # everything...
//! need_auth_paths_except = ["^/auth/", "^/public/"] # ...except these
//! ```

pub mod decision;
pub mod patterns;

pub use decision::{AuthorizationDecision, PathDecision};
pub use patterns::{CompiledPattern, PathPattern, PatternMatcher};
