//! Configuration loader with layered sources
//!
//! Loads configuration from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Signing key variables (`AUTHGATE_PRIVATE_KEY`, `JWT_PRIVATE_KEY`)
//! 2. Environment variables (`AUTHGATE_*`, `__` for nesting)
//! 3. Configuration file (TOML)
//! 4. Default values

use crate::config::types::AppConfig;
use crate::error::ConfigError;
use crate::paths::AuthorizationDecision;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "authgate.toml",
    ".authgate.toml",
    "~/.config/authgate/config.toml",
    "/etc/authgate/config.toml",
];

/// Variables that override `gate.private_key`, in order of precedence
const PRIVATE_KEY_VARS: &[&str] = &["AUTHGATE_PRIVATE_KEY", "JWT_PRIVATE_KEY"];

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // first existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g. AUTHGATE_GATE__ALGORITHM=HS512, AUTHGATE_SERVER__PORT=8080
    builder = builder.add_source(
        Environment::with_prefix("AUTHGATE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    for var in PRIVATE_KEY_VARS {
        if let Ok(key) = std::env::var(var)
            && !key.is_empty()
        {
            builder = builder
                .set_override("gate.private_key", key)
                .map_err(|e| ConfigError::Load(e.to_string()))?;
            break;
        }
    }

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
///
/// Catches everything the gate builder would reject, so a bad file fails
/// at load time with the offending field named.
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    if let Some(expires_in) = &config.gate.expires_in {
        expires_in.to_duration()?;
    }

    if config.gate.algorithm.is_asymmetric() && config.gate.public_key.is_none() {
        return Err(ConfigError::Missing {
            field: format!(
                "gate.public_key (required for {})",
                config.gate.algorithm
            ),
        });
    }

    AuthorizationDecision::new(
        config.gate.need_auth_paths.iter().cloned(),
        config.gate.need_auth_paths_except.iter().cloned(),
    )
    .map_err(|e| match e {
        ConfigError::InvalidPattern { pattern, reason } => ConfigError::InvalidPattern {
            reason: format!("in gate.need_auth_paths or gate.need_auth_paths_except: {reason}"),
            pattern,
        },
        other => other,
    })?;

    Ok(())
}
