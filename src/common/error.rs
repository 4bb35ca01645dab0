//! Error types for restaurant-kv

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    MissingId(String),

    // === Lookup Errors ===
    #[error("{0}")]
    NotFound(String),

    // === External Errors ===
    #[error("{0}")]
    Upstream(String),

    #[error("Store error: {0}")]
    Store(String),

    // === Config Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // === I/O Errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Generic ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Error::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// Convert to HTTP status code
    pub fn to_http_status(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Error::Validation(_) | Error::MissingId(_) | Error::InvalidConfig(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<fred::error::Error> for Error {
    fn from(e: fred::error::Error) -> Self {
        Error::Store(e.to_string())
    }
}

/// The request URL carries the API key, so it is stripped before logging
/// and the client only sees a fixed message.
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        tracing::warn!(error = %e.without_url(), "Weather request failed");
        Error::Upstream("Failed to fetch weather data".to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Internal(format!("JSON error: {}", e))
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::InvalidConfig(e.to_string())
    }
}
