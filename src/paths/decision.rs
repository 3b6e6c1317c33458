//! Authorization-required decision
//!
//! A path needs a token when it matches a required rule and no exempt rule.
//! Exempt rules always win, so a broad required rule such as `^/` can never
//! swallow a login or public endpoint.
//!
//! With no required rules configured the gate is fully open: nothing is
//! challenged. This is a default-deny-off posture. To deny by default, add a
//! catch-all required rule (`^/`) and list the open endpoints as exemptions.

use crate::error::ConfigError;
use crate::paths::patterns::{PathPattern, PatternMatcher};

/// How the gate classified a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathDecision {
    /// A required rule matched and no exempt rule did
    Required,
    /// A required rule matched but the exempt rule wins
    Exempt { pattern: String },
    /// No required rule matched
    Ungated,
}

impl PathDecision {
    pub fn is_required(&self) -> bool {
        matches!(self, PathDecision::Required)
    }
}

/// Combines required and exempt rule sets
#[derive(Debug, Clone, Default)]
pub struct AuthorizationDecision {
    required: PatternMatcher,
    exempt: PatternMatcher,
}

impl AuthorizationDecision {
    /// Compile both rule sets
    pub fn new<R, E>(required: R, exempt: E) -> Result<Self, ConfigError>
    where
        R: IntoIterator,
        R::Item: Into<PathPattern>,
        E: IntoIterator,
        E::Item: Into<PathPattern>,
    {
        Ok(Self {
            required: PatternMatcher::new(required)?,
            exempt: PatternMatcher::new(exempt)?,
        })
    }

    pub fn is_authorization_required(&self, path: &str) -> bool {
        self.required.matches(path) && !self.exempt.matches(path)
    }

    /// Classify a path, keeping the exempting rule for diagnostics
    pub fn evaluate(&self, path: &str) -> PathDecision {
        if !self.required.matches(path) {
            return PathDecision::Ungated;
        }

        match self.exempt.find_match(path) {
            Some(pattern) => PathDecision::Exempt {
                pattern: pattern.to_string(),
            },
            None => PathDecision::Required,
        }
    }

    /// True when no path can ever be gated
    pub fn is_fully_open(&self) -> bool {
        self.required.is_empty()
    }

    pub fn required_rules(&self) -> &PatternMatcher {
        &self.required
    }

    pub fn exempt_rules(&self) -> &PatternMatcher {
        &self.exempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_decision() -> AuthorizationDecision {
        AuthorizationDecision::new(["^/admin"], ["^/admin/public"]).unwrap()
    }

    #[test]
    fn test_exclusion_wins() {
        let decision = admin_decision();
        assert!(!decision.is_authorization_required("/admin/public/info"));
        assert_eq!(
            decision.evaluate("/admin/public/info"),
            PathDecision::Exempt {
                pattern: "^/admin/public".to_string()
            }
        );
    }

    #[test]
    fn test_required_path() {
        let decision = admin_decision();
        assert!(decision.is_authorization_required("/admin/secret"));
        assert_eq!(decision.evaluate("/admin/secret"), PathDecision::Required);
    }

    #[test]
    fn test_ungated_path() {
        let decision = admin_decision();
        assert!(!decision.is_authorization_required("/home"));
        assert_eq!(decision.evaluate("/home"), PathDecision::Ungated);
    }

    #[test]
    fn test_empty_required_rules_is_fully_open() {
        let decision =
            AuthorizationDecision::new(Vec::<PathPattern>::new(), ["^/public"]).unwrap();
        assert!(decision.is_fully_open());
        assert!(!decision.is_authorization_required("/admin"));
        assert!(!decision.is_authorization_required("/"));
    }

    #[test]
    fn test_exempt_rule_without_required_match_is_ungated() {
        let decision = admin_decision();
        assert_eq!(decision.evaluate("/public"), PathDecision::Ungated);
    }

    #[test]
    fn test_invalid_exempt_rule() {
        let result = AuthorizationDecision::new(["^/admin"], ["(unclosed"]);
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InvalidPattern { .. }
        ));
    }
}
