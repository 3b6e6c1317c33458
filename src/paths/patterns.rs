//! Pattern matching for request paths
//!
//! Rules are regular expressions, either given as source strings or already
//! compiled. Both forms are normalized into one compiled representation when
//! the gate is built, so request-time matching never fails.
//!
//! Sources use the [`regex`] crate's syntax, which has no lookaround or
//! backreferences. A rule such as `^/(?!public)` is rejected when the gate is
//! built; express it as a broad required rule plus an exemption instead
//! (`^/` required, `^/public` exempt).

use crate::error::ConfigError;
use regex::Regex;
use std::fmt;

/// A configured path rule
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Regex source, compiled when the gate is built
    Source(String),
    /// A regex the caller already compiled
    Compiled(Regex),
}

impl PathPattern {
    /// Compile this rule into its matching form
    pub fn compile(self) -> Result<CompiledPattern, ConfigError> {
        let regex = match self {
            PathPattern::Source(source) => {
                Regex::new(&source).map_err(|e| ConfigError::InvalidPattern {
                    pattern: source.clone(),
                    reason: e.to_string(),
                })?
            }
            PathPattern::Compiled(regex) => regex,
        };

        Ok(CompiledPattern { regex })
    }
}

impl From<&str> for PathPattern {
    fn from(source: &str) -> Self {
        PathPattern::Source(source.to_string())
    }
}

impl From<String> for PathPattern {
    fn from(source: String) -> Self {
        PathPattern::Source(source)
    }
}

impl From<Regex> for PathPattern {
    fn from(regex: Regex) -> Self {
        PathPattern::Compiled(regex)
    }
}

/// A rule ready for matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
}

impl CompiledPattern {
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered set of compiled path rules
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
}

impl PatternMatcher {
    /// Compile every rule, failing on the first one that does not compile
    pub fn new<I, P>(rules: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathPattern>,
    {
        let patterns = rules
            .into_iter()
            .map(|rule| rule.into().compile())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { patterns })
    }

    /// Create an empty matcher (matches nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if a path matches any rule
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(path))
    }

    /// The first rule matching a path, for logging
    pub fn find_match(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.is_match(path))
            .map(CompiledPattern::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookaround_is_rejected() {
        let result = PatternMatcher::new(["^/(?!public)"]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidPattern { ref pattern, .. }) if pattern == "^/(?!public)"
        ));
    }

    #[test]
    fn test_empty_matcher() {
        let matcher = PatternMatcher::empty();
        assert!(!matcher.matches("/anything"));
        assert!(matcher.is_empty());
    }

    #[test]
    fn test_prefix_match() {
        let matcher = PatternMatcher::new(["^/admin"]).unwrap();
        assert!(matcher.matches("/admin"));
        assert!(matcher.matches("/admin/users"));
        assert!(!matcher.matches("/public/admin"));
    }

    #[test]
    fn test_unanchored_pattern_matches_anywhere() {
        let matcher = PatternMatcher::new(["admin"]).unwrap();
        assert!(matcher.matches("/public/admin"));
        assert!(matcher.matches("/admin"));
        assert!(!matcher.matches("/users"));
    }

    #[test]
    fn test_precompiled_pattern() {
        let regex = Regex::new(r"^/api/v\d+/").unwrap();
        let matcher = PatternMatcher::new([PathPattern::from(regex)]).unwrap();
        assert!(matcher.matches("/api/v2/items"));
        assert!(!matcher.matches("/api/latest/items"));
    }

    #[test]
    fn test_mixed_sources() {
        let matcher = PatternMatcher::new(vec![
            PathPattern::from("^/auth/"),
            PathPattern::from(Regex::new("^/public/").unwrap()),
        ])
        .unwrap();

        assert_eq!(matcher.len(), 2);
        assert!(matcher.matches("/auth/login"));
        assert!(matcher.matches("/public/logo.png"));
        assert!(!matcher.matches("/private"));
    }

    #[test]
    fn test_find_match() {
        let matcher = PatternMatcher::new(["^/auth/", "^/public/"]).unwrap();

        assert_eq!(matcher.find_match("/auth/login"), Some("^/auth/"));
        assert_eq!(matcher.find_match("/public/x"), Some("^/public/"));
        assert_eq!(matcher.find_match("/admin"), None);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = PatternMatcher::new(["^/ok", "[invalid"]);
        match result.unwrap_err() {
            ConfigError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "[invalid"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
