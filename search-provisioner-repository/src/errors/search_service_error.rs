//! Search service error types.
//!
//! This module defines the unified error type for all remote operations,
//! covering transport failures, non-success HTTP statuses and local
//! validation or signing problems.

use thiserror::Error;

/// Unified errors from search service and blob storage operations.
///
/// Used by the `SearchServiceProvider` and `BlobContainerProvider` traits. A
/// response the service rejected is reported as `RequestFailed` with its HTTP
/// status, except for 404 which is surfaced as `NotFound` so callers can treat
/// an absent resource as a normal branch.
#[derive(Debug, Clone, Error)]
pub enum SearchServiceError {
    /// Validation error (e.g., empty resource names, empty skillsets).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to reach the remote service.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The requested resource does not exist.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The service answered with a non-success status.
    #[error("Request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// Credentials could not be used to sign or authorize a request.
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Failed to parse a response from the service.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl SearchServiceError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a not found error for a resource kind and name.
    pub fn not_found(kind: &str, name: &str) -> Self {
        Self::NotFound(format!("{} '{}'", kind, name))
    }

    /// Create a request failed error.
    pub fn request_failed(status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            body: body.into(),
        }
    }

    /// Create an authentication error.
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::AuthenticationError(msg.into())
    }

    /// Create a parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// HTTP status associated with this error, if the service answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<reqwest::Error> for SearchServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::ConnectionError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
