//! Error types for Mockscribe

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Result type for Mockscribe operations
pub type Result<T> = std::result::Result<T, ScribeError>;

/// Errors that can occur in Mockscribe
#[derive(Debug, Error)]
pub enum ScribeError {
    /// The wrapped transport failed to complete a send
    #[error("Transport failure: {0}")]
    Transport(TransportFailure),

    /// A request could not be built from the caller's input
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TransportFailure> for ScribeError {
    fn from(failure: TransportFailure) -> Self {
        Self::Transport(failure)
    }
}

impl ScribeError {
    /// The transport failure behind this error, if any
    #[must_use]
    pub fn transport_failure(&self) -> Option<&TransportFailure> {
        match self {
            Self::Transport(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Category of a failed send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Connection could not be established or was dropped
    Connect,
    /// The send exceeded its timeout
    Timeout,
    /// The response body exceeded the configured limit
    TooLarge,
    /// The request could not be turned into a valid HTTP message
    Invalid,
    /// Any other failure
    Other,
}

/// A failed send, as seen by the caller and as recorded by the capturer.
///
/// Cloneable so the same value can be stored in the history and handed
/// back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransportFailure {
    /// Failure category
    pub kind: FailureKind,
    /// Human readable message
    pub message: String,
    /// Timeout that elapsed, for `FailureKind::Timeout`
    #[serde(skip_serializing_if = "Option::is_none", with = "crate::duration_serde")]
    pub timeout: Option<Duration>,
}

impl TransportFailure {
    /// Create a failure of the given kind
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timeout: None,
        }
    }

    /// Create a timeout failure
    #[must_use]
    pub fn timed_out(after: Duration) -> Self {
        Self {
            kind: FailureKind::Timeout,
            message: format!("request timed out after {}ms", after.as_millis()),
            timeout: Some(after),
        }
    }

    /// Whether this failure is a timeout
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        self.kind == FailureKind::Timeout
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for TransportFailure {}
