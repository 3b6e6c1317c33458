//! Configuration types for authgate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::token::{Algorithm, ExpirySpec};
use crate::util::SecretString;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings for the bundled server
    pub server: ServerConfig,

    /// Gate settings
    pub gate: GateConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Gate configuration
///
/// Secondary checks and log sinks are code, not configuration; they are
/// supplied through [`crate::gate::GateBuilder`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// HMAC secret, or PEM private key for asymmetric algorithms
    ///
    /// When unset the gate falls back to a fixed, publicly known
    /// development key and logs a warning. Never deploy without one.
    #[serde(alias = "privateKey")]
    pub private_key: Option<SecretString>,

    /// PEM public key; required for RS*, PS*, ES* and EdDSA
    #[serde(alias = "publicKey")]
    pub public_key: Option<SecretString>,

    /// Token lifetime, e.g. `"1h"` or `60000` (milliseconds). Default `"1h"`.
    #[serde(alias = "expiresIn")]
    pub expires_in: Option<ExpirySpec>,

    /// Signing algorithm
    pub algorithm: Algorithm,

    /// Paths that require a token (regex). Empty means nothing is gated.
    #[serde(alias = "needAuthPaths")]
    pub need_auth_paths: Vec<String>,

    /// Paths exempt from `need_auth_paths` (regex); exemptions always win
    #[serde(alias = "needAuthPathsExcept")]
    pub need_auth_paths_except: Vec<String>,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 20290,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
