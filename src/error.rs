//! Error types for authgate
//!
//! This module defines the error hierarchy used throughout the crate.
//! Configuration problems surface once, at setup time, as [`ConfigError`].
//! Per-request failures are [`AuthError`]s, which render themselves as the
//! 401 rejection body at the HTTP boundary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authorization error: {0}")]
    Auth(#[from] AuthError),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors
///
/// All of these are fatal: a gate is never installed from a configuration
/// that produced one.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {field}")]
    Missing { field: String },

    #[error("Invalid path pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid expiry '{value}': {reason}")]
    InvalidDuration { value: String, reason: String },

    #[error("Unsupported signing algorithm '{0}'")]
    UnsupportedAlgorithm(String),

    #[error("Invalid {algorithm} key: {reason}")]
    InvalidKey { algorithm: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Token codec failures
///
/// The gate never shows these to the client; they only appear in logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    Expired,

    #[error("token not yet valid")]
    NotYetValid,

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Wire message for a gated request without a token
pub const MSG_NEED_TOKEN: &str = "need authorization token";

/// Wire message for every other authorization failure
pub const MSG_LOGIN_FAILED: &str = "login failed";

/// Per-request authorization failures
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("authorization token missing")]
    TokenMissing,

    #[error("authorization token invalid")]
    TokenInvalid,

    #[error("secondary authorization check failed")]
    SecondaryCheckFailed,

    #[error("credentials rejected by the token issuer")]
    CredentialsRejected,

    #[error("authorization gate is not installed on this route")]
    NotInstalled,

    #[error("token issuance failed: {0}")]
    Issuance(#[source] TokenError),
}

impl AuthError {
    /// HTTP status for this failure
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::TokenMissing
            | AuthError::TokenInvalid
            | AuthError::SecondaryCheckFailed
            | AuthError::CredentialsRejected => StatusCode::UNAUTHORIZED,
            AuthError::NotInstalled | AuthError::Issuance(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message placed in the response body
    ///
    /// Invalid tokens and failed secondary checks share one message so the
    /// client cannot tell them apart.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::TokenMissing => MSG_NEED_TOKEN,
            AuthError::TokenInvalid
            | AuthError::SecondaryCheckFailed
            | AuthError::CredentialsRejected => MSG_LOGIN_FAILED,
            AuthError::NotInstalled => "authorization gate not installed",
            AuthError::Issuance(_) => "token issuance failed",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "msg": self.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("HTTP server error: {0}")]
    Http(String),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Result type alias for per-request authorization
pub type AuthResult<T> = std::result::Result<T, AuthError>;
