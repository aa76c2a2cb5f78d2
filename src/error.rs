// src/error.rs
// Error taxonomy for the session layer and API client

use thiserror::Error;

/// Main error type for the tracker client
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Credential could not be decoded (bad structure, bad claims)
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Credential decoded but its expiry is in the past
    #[error("token expired at {expired_at}")]
    ExpiredToken { expired_at: i64 },

    /// Login endpoint rejected the credentials or could not be reached
    #[error("login failed: {0}")]
    LoginFailed(String),

    /// An authenticated call came back 401; the session has been dropped
    #[error("session is no longer authorized")]
    Unauthorized,

    /// Non-2xx HTTP status from the API
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// 2xx HTTP response whose envelope reports a failure
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Client-side form validation failed before anything was sent
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Convenience type alias for Result using TrackerError
pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        TrackerError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// True for the two credential failures that are recovered silently
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            TrackerError::InvalidToken(_) | TrackerError::ExpiredToken { .. }
        )
    }
}

impl From<jsonwebtoken::errors::Error> for TrackerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TrackerError::InvalidToken(err.to_string())
    }
}
