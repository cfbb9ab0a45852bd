//! Error types for doccano API operations.

use std::time::Duration;

use thiserror::Error;

use crate::http::{HttpError, HttpMethod, HttpResponse};

/// Convenience alias used throughout the crate.
pub type Result<T, E = DoccanoError> = std::result::Result<T, E>;

/// Body of a non-2xx response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    /// The server replied with valid JSON (usually a DRF validation map).
    Json(serde_json::Value),
    /// Anything else, kept as text.
    Text(String),
}

impl ErrorBody {
    /// Parse the body as JSON, falling back to raw text.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => ErrorBody::Json(value),
            Err(_) => ErrorBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ErrorBody::Json(v) => Some(v),
            ErrorBody::Text(_) => None,
        }
    }
}

impl std::fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorBody::Json(v) => write!(f, "{v}"),
            ErrorBody::Text(t) => f.write_str(t),
        }
    }
}

/// A non-2xx response from the server.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: u16,
    pub method: HttpMethod,
    pub url: String,
    pub body: ErrorBody,
    /// The raw response, for callers that need headers.
    pub response: HttpResponse,
}

impl ApiError {
    pub fn from_response(
        method: HttpMethod,
        url: impl Into<String>,
        response: HttpResponse,
    ) -> Self {
        Self {
            status: response.status,
            method,
            url: url.into(),
            body: ErrorBody::from_bytes(&response.body),
            response,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} returned {}: {}",
            self.method, self.url, self.status, self.body
        )
    }
}

/// Local precondition failures, detected before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("span start_offset {start} must be less than end_offset {end}")]
    SpanOffsets { start: usize, end: usize },

    #[error("segment points must have an even length, got {0}")]
    OddSegmentPoints(usize),

    #[error("{field} must be a finite non-negative number")]
    Negative { field: &'static str },

    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("invalid color {0:?}, expected #rrggbb")]
    Color(String),

    #[error("invalid prefix key {0:?}")]
    PrefixKey(String),

    #[error("invalid suffix key {0:?}")]
    SuffixKey(String),

    #[error("a prefix key requires a suffix key")]
    PrefixWithoutSuffix,

    #[error("label type {0:?} conflicts with an existing label type")]
    DuplicateLabelType(String),

    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("{0}")]
    Other(String),
}

/// Errors that can occur when talking to a doccano server.
#[derive(Debug, Error)]
pub enum DoccanoError {
    /// Server returned a non-2xx status.
    #[error("API error: {0}")]
    Api(Box<ApiError>),

    /// Request never produced a response.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A name lookup found no match.
    #[error("{resource} not found: {name}")]
    NotFound { resource: &'static str, name: String },

    /// A server-side task did not finish in time.
    #[error("task {task_id} not ready after {waited:?}")]
    Timeout { task_id: String, waited: Duration },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<ApiError> for DoccanoError {
    fn from(err: ApiError) -> Self {
        DoccanoError::Api(Box::new(err))
    }
}

impl From<config::ConfigError> for DoccanoError {
    fn from(err: config::ConfigError) -> Self {
        DoccanoError::Config(err.to_string())
    }
}

impl DoccanoError {
    pub fn not_found(resource: &'static str, name: impl Into<String>) -> Self {
        DoccanoError::NotFound {
            resource,
            name: name.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        DoccanoError::Validation(ValidationError::Other(message.into()))
    }

    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            DoccanoError::Api(e) => Some(e.status),
            _ => None,
        }
    }

    pub fn api(&self) -> Option<&ApiError> {
        match self {
            DoccanoError::Api(e) => Some(e),
            _ => None,
        }
    }

    /// True for lookups that found nothing, locally or on the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DoccanoError::NotFound { .. }) || self.status() == Some(404)
    }

    /// True when repeating the same idempotent request might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DoccanoError::Api(e) => matches!(e.status, 429 | 502 | 503 | 504),
            DoccanoError::Transport(HttpError::Transport(_)) => true,
            _ => false,
        }
    }
}

/// Get a short error message suitable for display.
pub fn short_error_message(err: &DoccanoError) -> String {
    match err {
        DoccanoError::Api(e) => {
            let message = e.body.to_string();
            if message.chars().count() > 50 {
                let truncated: String = message.chars().take(47).collect();
                format!("HTTP {}: {}...", e.status, truncated)
            } else {
                format!("HTTP {}: {}", e.status, message)
            }
        }
        DoccanoError::Transport(_) => "Network error".to_string(),
        DoccanoError::Json(_) => "JSON parse error".to_string(),
        DoccanoError::Validation(v) => format!("Invalid: {v}"),
        DoccanoError::NotFound { resource, name } => format!("{resource} not found: {name}"),
        DoccanoError::Timeout { task_id, .. } => format!("Task {task_id} timed out"),
        DoccanoError::Io(_) => "I/O error".to_string(),
        DoccanoError::Config(msg) => format!("Config: {msg}"),
    }
}
