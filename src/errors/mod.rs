// src/errors/mod.rs
use std::time::Duration;

use thiserror::Error;

/// Main error type for beertap operations
#[derive(Error, Debug)]
pub enum BeertapError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    #[error("Invalid header name: {0}")]
    HeaderName(#[from] reqwest::header::InvalidHeaderName),

    #[error("Invalid header value: {0}")]
    HeaderValue(#[from] reqwest::header::InvalidHeaderValue),

    #[error("JSON decode error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    SerdeYaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("Tracing init error: {0}")]
    Tracing(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),
}

/// A response that reached the harness but did not meet expectations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssertionFailure {
    #[error("{method} {url}: expected status {expected}, got {actual}")]
    UnexpectedStatus {
        method: String,
        url: String,
        expected: u16,
        actual: u16,
    },

    #[error("GET {url}: expected a non-empty array, got an empty one")]
    EmptyBody { url: String },

    #[error("GET {url}: body is not valid JSON: {reason}")]
    MalformedBody { url: String, reason: String },

    #[error("GET {url}: expected a JSON array body, got {found}")]
    NotAnArray { url: String, found: String },

    #[error("item [{index}] field `{field}`: {reason}")]
    Schema {
        index: usize,
        field: String,
        reason: String,
    },

    #[error("GET {url}: unexpected health payload {body}")]
    Unhealthy { url: String, body: String },

    #[error(
        "{requests} requests took {} ms, threshold is {} ms",
        .elapsed.as_millis(),
        .threshold.as_millis()
    )]
    TooSlow {
        requests: usize,
        elapsed: Duration,
        threshold: Duration,
    },
}

/// Convenience Result type that uses BeertapError
pub type Result<T> = std::result::Result<T, BeertapError>;
