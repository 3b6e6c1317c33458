//! Gate construction
//!
//! Every configuration problem surfaces here, once, as a [`ConfigError`].
//! A gate that builds is safe to share across all requests.

use crate::authorizer::{AllowAll, Authorizer, LogSink, SecondaryCheck, TracingSink};
use crate::config::GateConfig;
use crate::error::ConfigError;
use crate::gate::{Gate, GateInner};
use crate::paths::{AuthorizationDecision, PathPattern};
use crate::token::{Algorithm, ExpirySpec, JwtCodec, SigningKeys, TokenCodec};
use crate::util::SecretString;
use std::sync::Arc;
use tracing::{info, warn};

/// Signing key used when none is configured
///
/// Publicly known; tokens signed with it prove nothing. Development only.
pub const DEFAULT_PRIVATE_KEY: &str = "foobar";

/// Builder for [`Gate`]
pub struct GateBuilder {
    private_key: Option<SecretString>,
    public_key: Option<SecretString>,
    expires_in: Option<ExpirySpec>,
    algorithm: Algorithm,
    required: Vec<PathPattern>,
    exempt: Vec<PathPattern>,
    codec: Arc<dyn TokenCodec>,
    check: Option<Arc<dyn SecondaryCheck>>,
    sink: Arc<dyn LogSink>,
}

impl Default for GateBuilder {
    fn default() -> Self {
        Self {
            private_key: None,
            public_key: None,
            expires_in: None,
            algorithm: Algorithm::default(),
            required: Vec::new(),
            exempt: Vec::new(),
            codec: Arc::new(JwtCodec),
            check: None,
            sink: Arc::new(TracingSink),
        }
    }
}

impl GateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from loaded configuration
    pub fn from_config(config: &GateConfig) -> Self {
        Self {
            private_key: config.private_key.clone(),
            public_key: config.public_key.clone(),
            expires_in: config.expires_in.clone(),
            algorithm: config.algorithm,
            required: config
                .need_auth_paths
                .iter()
                .cloned()
                .map(PathPattern::from)
                .collect(),
            exempt: config
                .need_auth_paths_except
                .iter()
                .cloned()
                .map(PathPattern::from)
                .collect(),
            ..Self::default()
        }
    }

    pub fn private_key(mut self, key: impl Into<SecretString>) -> Self {
        self.private_key = Some(key.into());
        self
    }

    pub fn public_key(mut self, key: impl Into<SecretString>) -> Self {
        self.public_key = Some(key.into());
        self
    }

    pub fn expires_in(mut self, expiry: impl Into<ExpirySpec>) -> Self {
        self.expires_in = Some(expiry.into());
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Add a rule for paths that require a token
    pub fn need_auth_path(mut self, rule: impl Into<PathPattern>) -> Self {
        self.required.push(rule.into());
        self
    }

    pub fn need_auth_paths<I, P>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathPattern>,
    {
        self.required.extend(rules.into_iter().map(Into::into));
        self
    }

    /// Add a rule for paths exempt from the required rules
    pub fn need_auth_path_except(mut self, rule: impl Into<PathPattern>) -> Self {
        self.exempt.push(rule.into());
        self
    }

    pub fn need_auth_paths_except<I, P>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathPattern>,
    {
        self.exempt.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn secondary_check(mut self, check: impl SecondaryCheck + 'static) -> Self {
        self.check = Some(Arc::new(check));
        self
    }

    pub fn log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Replace the JWT codec, e.g. with a test double
    pub fn codec(mut self, codec: impl TokenCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    /// Compile rules, parse keys and expiry, and produce the gate
    pub fn build(self) -> Result<Gate, ConfigError> {
        let private_key = match self.private_key {
            Some(key) if !key.is_empty() => key,
            _ => {
                warn!(
                    "No signing key configured; using the insecure development key. \
                     Set gate.private_key before deploying."
                );
                SecretString::new(DEFAULT_PRIVATE_KEY)
            }
        };

        let expires_in = self.expires_in.unwrap_or_else(|| {
            info!("No token expiry configured, defaulting to one hour");
            ExpirySpec::default()
        });
        let expiry = expires_in.to_duration()?;

        let keys = SigningKeys::new(self.algorithm, &private_key, self.public_key.as_ref())?;

        let decision = AuthorizationDecision::new(self.required, self.exempt)?;
        if decision.is_fully_open() {
            warn!("No paths require authorization; every request passes the gate unchallenged");
        }

        let check = self.check.unwrap_or_else(|| {
            info!("No secondary check configured; a valid token alone authorizes");
            Arc::new(AllowAll)
        });

        info!(
            algorithm = %self.algorithm,
            codec = self.codec.codec_name(),
            expiry = %expires_in,
            required_rules = decision.required_rules().len(),
            exempt_rules = decision.exempt_rules().len(),
            "Authorization gate ready"
        );

        let authorizer = Authorizer::new(self.codec, keys, expiry, check, self.sink);

        Ok(Gate {
            inner: Arc::new(GateInner {
                decision,
                authorizer: Arc::new(authorizer),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let gate = GateBuilder::new().build().unwrap();
        assert_eq!(gate.authorizer().algorithm(), Algorithm::HS256);
        assert_eq!(gate.authorizer().expiry(), Duration::from_secs(3600));
        assert!(gate.decision().is_fully_open());
    }

    #[test]
    fn test_from_config() {
        let config = GateConfig {
            private_key: Some(SecretString::new("k")),
            expires_in: Some(ExpirySpec::from("5m")),
            algorithm: Algorithm::HS512,
            need_auth_paths: vec!["^/admin".to_string()],
            need_auth_paths_except: vec!["^/admin/public".to_string()],
            ..Default::default()
        };

        let gate = GateBuilder::from_config(&config).build().unwrap();
        assert_eq!(gate.authorizer().algorithm(), Algorithm::HS512);
        assert_eq!(gate.authorizer().expiry(), Duration::from_secs(300));
        assert!(gate.decision().is_authorization_required("/admin/x"));
        assert!(!gate.decision().is_authorization_required("/admin/public/x"));
    }

    #[test]
    fn test_invalid_rule_fails_build() {
        let result = GateBuilder::new().need_auth_path("(").build();
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }

    #[test]
    fn test_invalid_expiry_fails_build() {
        let result = GateBuilder::new().expires_in("forever").build();
        assert!(matches!(result, Err(ConfigError::InvalidDuration { .. })));
    }

    #[test]
    fn test_asymmetric_without_public_key_fails_build() {
        let result = GateBuilder::new()
            .algorithm(Algorithm::EdDSA)
            .private_key("pem")
            .build();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }
}
