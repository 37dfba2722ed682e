//! Error types for the Productive API client.
//!
//! # Design
//! Every failure the transport reports lands in a single `ApiError::Request`
//! variant carrying the original message and, when the server answered, its
//! status code. Callers that need to tell a 404 from a 500 inspect
//! [`ApiError::status`]. JSON failures on a successful response are kept
//! apart because they are not transport failures.

use thiserror::Error;

use crate::resource::Capability;

/// Errors returned by `ApiClient` and `Resource` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request failed in transit or the server answered with a non-2xx
    /// status. `status` is `None` when no response was received.
    #[error("productive request failed: {message}")]
    Request {
        message: String,
        status: Option<u16>,
    },

    /// A response body was not valid JSON, or a payload could not be encoded.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The resource does not declare the requested operation.
    #[error("{resource} does not support {capability}")]
    Unsupported {
        resource: &'static str,
        capability: Capability,
    },
}

impl ApiError {
    /// HTTP status code of the failed request, if the server responded.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Request { status, .. } => *status,
            _ => None,
        }
    }
}

/// Failures reported by a [`Transport`](crate::Transport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    /// The server answered with a status outside 200..=299.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::Request {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

/// Errors raised while assembling a `ClientConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("{name} is not a valid organisation id: {value}")]
    InvalidOrganizationId { name: &'static str, value: String },

    #[error("timeout must be a finite, non-negative number of seconds, got {0}")]
    InvalidTimeout(String),
}
