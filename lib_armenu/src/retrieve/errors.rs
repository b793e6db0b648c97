//! # Error Model
//!
//! Every failure leaving the library is one of two shapes: an `ApiError`
//! (code, message, optional HTTP status and details) or a
//! `ValidationApiError` (a list of field problems). Network, HTTP and decode
//! failures are normalised into these before callers see them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NetworkError,
    Timeout,
    HttpError,
    NotFound,
    Unauthorized,
    ParseError,
    ValidationError,
    InvalidInput,
    ArNotAvailable,
    ServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::HttpError => "HTTP_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::ParseError => "PARSE_ERROR",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::ArNotAvailable => "AR_NOT_AVAILABLE",
            ErrorCode::ServerError => "SERVER_ERROR",
        }
    }

    /// Parses a backend-supplied code; unknown codes map to `None`.
    pub fn from_wire(code: &str) -> Option<ErrorCode> {
        serde_json::from_value(Value::String(code.to_string())).ok()
    }

    /// Status-derived code for a non-2xx response.
    ///
    /// `TIMEOUT` is never derived from a status; only the transport raises it.
    pub fn from_status(status: u16) -> ErrorCode {
        match status {
            404 => ErrorCode::NotFound,
            401 | 403 => ErrorCode::Unauthorized,
            422 => ErrorCode::ValidationError,
            500..=599 => ErrorCode::ServerError,
            _ => ErrorCode::HttpError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coded API failure.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("[{code}] {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
            details: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }
}

/// One offending field of a rejected payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value,
        }
    }
}

/// A payload rejected field by field, either by the backend (HTTP 422) or
/// by client-side validation of a response.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message} ({} field error(s))", details.len())]
pub struct ValidationApiError {
    pub message: String,
    pub details: Vec<FieldError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ValidationApiError {
    pub fn new(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            message: message.into(),
            details,
            status: None,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.details.iter().map(|d| d.field.as_str())
    }
}

/// Library-wide error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MenuError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationApiError),
}

impl MenuError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MenuError::Api(e) => e.code,
            MenuError::Validation(_) => ErrorCode::ValidationError,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            MenuError::Api(e) => e.status,
            MenuError::Validation(e) => e.status,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == ErrorCode::NotFound
    }

    /// Whether repeating the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.code(),
            ErrorCode::NetworkError | ErrorCode::Timeout | ErrorCode::ServerError | ErrorCode::HttpError
        )
    }
}

pub type MenuResult<T> = Result<T, MenuError>;
