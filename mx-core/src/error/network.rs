//! Network-related error types.
//!
//! These are produced by a `Transport` implementation. Classification of
//! HTTP error responses is not a network concern: a transport returns every
//! response it receives, whatever its status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Network error type covering connection failures, timeouts and malformed
/// requests.
///
/// # Examples
///
/// ```
/// use mx_core::error::NetworkError;
///
/// let error = NetworkError::ConnectionFailed {
///     reason: "Connection refused".to_string(),
/// };
/// assert!(error.to_string().contains("Connection refused"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkError {
    /// Connection to remote host failed.
    #[error("[Network] Connection failed: {reason}")]
    ConnectionFailed {
        /// Reason for the connection failure.
        reason: String,
    },

    /// Request timed out.
    #[error("[Network] Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// The request could not be built or sent.
    #[error("[Network] Invalid request: {reason}")]
    InvalidRequest {
        /// Reason the request was refused.
        reason: String,
    },

    /// The response body could not be read.
    #[error("[Network] Failed to read response body: {reason}")]
    Body {
        /// Underlying reason.
        reason: String,
    },
}

impl NetworkError {
    /// Returns true if this error is recoverable (can be retried).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::ConnectionFailed { .. })
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub const fn severity(&self) -> super::ErrorSeverity {
        use super::ErrorSeverity;
        match self {
            Self::Timeout { .. } | Self::ConnectionFailed { .. } => ErrorSeverity::Recoverable,
            Self::InvalidRequest { .. } => ErrorSeverity::Fatal,
            Self::Body { .. } => ErrorSeverity::Warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout() {
        let error = NetworkError::Timeout { timeout_ms: 5000 };
        assert!(error.to_string().contains("5000ms"));
        assert!(error.is_recoverable());
    }

    #[test]
    fn test_invalid_request_is_fatal() {
        let error = NetworkError::InvalidRequest {
            reason: "bad url".to_string(),
        };
        assert!(!error.is_recoverable());
        assert!(error.severity().is_fatal());
    }
}
