//! Error type shared by every collaborator port.
//!
//! The gate never surfaces these to the user directly; each step converts a
//! failure into degraded data or a fixed terminal outcome.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Errors from collaborator calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollaboratorError {
    /// Error code for categorization.
    pub code: CollaboratorErrorCode,

    /// Human-readable message.
    pub message: String,

    /// HTTP status returned by the collaborator (if any).
    pub status: Option<u16>,
}

impl CollaboratorError {
    pub fn new(code: CollaboratorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            status: None,
        }
    }

    /// Attach the HTTP status the collaborator answered with.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::NetworkError, message)
    }

    pub fn timeout(after: Duration) -> Self {
        Self::new(
            CollaboratorErrorCode::Timeout,
            format!("no response within {} ms", after.as_millis()),
        )
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::AuthenticationError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(CollaboratorErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::InvalidResponse, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(CollaboratorErrorCode::ProviderError, message)
    }

    /// Check if the failure is typically transient.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl std::fmt::Display for CollaboratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for CollaboratorError {}

/// Collaborator error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaboratorErrorCode {
    /// Connection could not be established or was dropped.
    NetworkError,

    /// No response within the step's time budget.
    Timeout,

    /// Credentials were rejected.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Body could not be decoded or violated the expected schema.
    InvalidResponse,

    /// Collaborator reported a server-side error.
    ProviderError,
}

impl CollaboratorErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollaboratorErrorCode::NetworkError
                | CollaboratorErrorCode::Timeout
                | CollaboratorErrorCode::RateLimitExceeded
        )
    }
}

impl std::fmt::Display for CollaboratorErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            CollaboratorErrorCode::NetworkError => "network_error",
            CollaboratorErrorCode::Timeout => "timeout",
            CollaboratorErrorCode::AuthenticationError => "authentication_error",
            CollaboratorErrorCode::NotFound => "not_found",
            CollaboratorErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            CollaboratorErrorCode::InvalidResponse => "invalid_response",
            CollaboratorErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}
