//! Configuration loading tests

use authgate::config::{LogFormat, load_config, load_config_from_str};
use authgate::error::ConfigError;
use authgate::gate::GateBuilder;
use authgate::token::{Algorithm, ExpirySpec};
use std::time::Duration;

const MINIMAL_CONFIG: &str = r#"
[gate]
private_key = "minimal-secret"
"#;

const FULL_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 9000

[gate]
private_key = "full-secret"
expires_in = "7d"
algorithm = "HS512"
need_auth_paths = ["^/api/", "^/admin"]
need_auth_paths_except = ["^/api/login$", "^/api/public/"]

[logging]
level = "debug"
format = "json"
"#;

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 20290);
    assert_eq!(config.gate.algorithm, Algorithm::HS256);
    assert!(config.gate.expires_in.is_none());
    assert!(config.gate.need_auth_paths.is_empty());
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 9000);
    assert_eq!(
        config.gate.private_key.as_ref().unwrap().expose_secret(),
        "full-secret"
    );
    assert_eq!(config.gate.expires_in, Some(ExpirySpec::from("7d")));
    assert_eq!(config.gate.algorithm, Algorithm::HS512);
    assert_eq!(config.gate.need_auth_paths.len(), 2);
    assert_eq!(config.gate.need_auth_paths_except.len(), 2);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_full_config_builds_gate() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();
    let gate = GateBuilder::from_config(&config.gate).build().unwrap();

    assert_eq!(gate.authorizer().expiry(), Duration::from_secs(7 * 86_400));

    let decision = gate.decision();
    assert!(decision.is_authorization_required("/api/orders"));
    assert!(decision.is_authorization_required("/admin"));
    assert!(!decision.is_authorization_required("/api/login"));
    assert!(decision.is_authorization_required("/api/login/reset"));
    assert!(!decision.is_authorization_required("/api/public/status"));
    assert!(!decision.is_authorization_required("/health"));
}

#[test]
fn test_invalid_exempt_pattern_names_field() {
    let result = load_config_from_str(
        r#"
[gate]
need_auth_paths = ["^/admin"]
need_auth_paths_except = ["(unclosed"]
"#,
    );

    match result.unwrap_err() {
        ConfigError::InvalidPattern { pattern, reason } => {
            assert_eq!(pattern, "(unclosed");
            assert!(reason.contains("gate.need_auth_paths"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_invalid_expiry_is_rejected() {
    for expiry in ["0", "-5m", "10 parsecs", ""] {
        let toml = format!("[gate]\nexpires_in = \"{expiry}\"\n");
        assert!(
            matches!(
                load_config_from_str(&toml),
                Err(ConfigError::InvalidDuration { .. })
            ),
            "expiry {expiry:?} should be rejected"
        );
    }
}

#[test]
fn test_invalid_toml() {
    let result = load_config_from_str("[gate\nprivate_key = ");
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_missing_explicit_file() {
    let result = load_config(Some("/definitely/not/here/authgate.toml"));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
#[serial_test::serial]
fn test_load_config_from_file() {
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("authgate.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.gate.algorithm, Algorithm::HS512);
}

#[test]
#[serial_test::serial]
fn test_env_overrides_file() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("authgate.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::set_var("AUTHGATE_SERVER__PORT", "9100");
        env::set_var("AUTHGATE_GATE__ALGORITHM", "HS384");
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("AUTHGATE_SERVER__PORT");
        env::remove_var("AUTHGATE_GATE__ALGORITHM");
    }

    let config = config.unwrap();
    assert_eq!(config.server.port, 9100);
    assert_eq!(config.gate.algorithm, Algorithm::HS384);
}

#[test]
#[serial_test::serial]
fn test_private_key_env_precedence() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("authgate.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("AUTHGATE_PRIVATE_KEY", "authgate-key");
        env::set_var("JWT_PRIVATE_KEY", "jwt-key");
    }

    let preferred = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("AUTHGATE_PRIVATE_KEY");
    }

    let fallback = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("JWT_PRIVATE_KEY");
    }

    assert_eq!(
        preferred.unwrap().gate.private_key.unwrap().expose_secret(),
        "authgate-key"
    );
    assert_eq!(
        fallback.unwrap().gate.private_key.unwrap().expose_secret(),
        "jwt-key"
    );
}

#[test]
#[serial_test::serial]
fn test_empty_private_key_env_is_ignored() {
    use std::env;
    use std::fs;
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let config_path = dir.path().join("authgate.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("AUTHGATE_PRIVATE_KEY", "");
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("AUTHGATE_PRIVATE_KEY");
    }

    assert_eq!(
        config.unwrap().gate.private_key.unwrap().expose_secret(),
        "minimal-secret"
    );
}
