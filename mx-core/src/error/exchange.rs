//! Exchange-related error types.
//!
//! Remote failures are classified once, from the HTTP status and the
//! exchange's error code, into one of the kinds below. Each kind keeps the
//! status, the exchange code (if any) and the raw response body.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified exchange error.
///
/// # Examples
///
/// ```
/// use mx_core::error::ExchangeError;
///
/// let error = ExchangeError::NotFound {
///     status: 404,
///     code: Some("order_not_found".to_string()),
///     payload: r#"{"code":"order_not_found"}"#.to_string(),
/// };
/// assert_eq!(error.status(), 404);
/// assert!(!error.is_retryable());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeError {
    /// Credentials, signature, nonce or permission problem.
    #[error("[Exchange] Authentication failed (status {status}, code {code:?}): {payload}")]
    AuthenticationFailure {
        /// HTTP status.
        status: u16,
        /// Exchange error code.
        code: Option<String>,
        /// Raw response body.
        payload: String,
    },

    /// Request rejected as malformed or invalid.
    #[error("[Exchange] Invalid request (status {status}, code {code:?}): {payload}")]
    InvalidRequest {
        /// HTTP status.
        status: u16,
        /// Exchange error code.
        code: Option<String>,
        /// Raw response body.
        payload: String,
    },

    /// Requested resource does not exist.
    #[error("[Exchange] Not found (status {status}, code {code:?}): {payload}")]
    NotFound {
        /// HTTP status.
        status: u16,
        /// Exchange error code.
        code: Option<String>,
        /// Raw response body.
        payload: String,
    },

    /// Too many requests.
    #[error("[Exchange] Rate limited (status {status}, code {code:?}): {payload}")]
    RateLimited {
        /// HTTP status.
        status: u16,
        /// Exchange error code.
        code: Option<String>,
        /// Raw response body.
        payload: String,
    },

    /// Exchange-side failure.
    #[error("[Exchange] Server error (status {status}, code {code:?}): {payload}")]
    ServerError {
        /// HTTP status.
        status: u16,
        /// Exchange error code.
        code: Option<String>,
        /// Raw response body.
        payload: String,
    },

    /// Anything the classification table does not cover.
    #[error("[Exchange] Unclassified error (status {status}, code {code:?}): {payload}")]
    Unclassified {
        /// HTTP status.
        status: u16,
        /// Exchange error code.
        code: Option<String>,
        /// Raw response body.
        payload: String,
    },
}

impl ExchangeError {
    /// Returns the HTTP status of the failed response.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::AuthenticationFailure { status, .. }
            | Self::InvalidRequest { status, .. }
            | Self::NotFound { status, .. }
            | Self::RateLimited { status, .. }
            | Self::ServerError { status, .. }
            | Self::Unclassified { status, .. } => *status,
        }
    }

    /// Returns the exchange error code, if the body carried one.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::AuthenticationFailure { code, .. }
            | Self::InvalidRequest { code, .. }
            | Self::NotFound { code, .. }
            | Self::RateLimited { code, .. }
            | Self::ServerError { code, .. }
            | Self::Unclassified { code, .. } => code.as_deref(),
        }
    }

    /// Returns the raw response body.
    #[must_use]
    pub fn payload(&self) -> &str {
        match self {
            Self::AuthenticationFailure { payload, .. }
            | Self::InvalidRequest { payload, .. }
            | Self::NotFound { payload, .. }
            | Self::RateLimited { payload, .. }
            | Self::ServerError { payload, .. }
            | Self::Unclassified { payload, .. } => payload,
        }
    }

    /// Returns the kind name.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::AuthenticationFailure { .. } => "authentication_failure",
            Self::InvalidRequest { .. } => "invalid_request",
            Self::NotFound { .. } => "not_found",
            Self::RateLimited { .. } => "rate_limited",
            Self::ServerError { .. } => "server_error",
            Self::Unclassified { .. } => "unclassified",
        }
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub const fn severity(&self) -> super::ErrorSeverity {
        use super::ErrorSeverity;
        match self {
            Self::AuthenticationFailure { .. } => ErrorSeverity::Fatal,
            Self::RateLimited { .. } | Self::ServerError { .. } => ErrorSeverity::Recoverable,
            Self::InvalidRequest { .. } | Self::Unclassified { .. } => ErrorSeverity::Warning,
            Self::NotFound { .. } => ErrorSeverity::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate_limited() -> ExchangeError {
        ExchangeError::RateLimited {
            status: 429,
            code: Some("rate_limit_exceeded".to_string()),
            payload: r#"{"code":"rate_limit_exceeded"}"#.to_string(),
        }
    }

    #[test]
    fn test_accessors() {
        let error = rate_limited();
        assert_eq!(error.status(), 429);
        assert_eq!(error.code(), Some("rate_limit_exceeded"));
        assert!(error.payload().contains("rate_limit_exceeded"));
        assert_eq!(error.kind(), "rate_limited");
    }

    #[test]
    fn test_retryable() {
        assert!(rate_limited().is_retryable());
        let auth = ExchangeError::AuthenticationFailure {
            status: 401,
            code: None,
            payload: String::new(),
        };
        assert!(!auth.is_retryable());
        assert!(auth.severity().is_fatal());
    }

    #[test]
    fn test_display_contains_status() {
        let error = ExchangeError::NotFound {
            status: 404,
            code: None,
            payload: "missing".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("404"));
        assert!(display.contains("missing"));
    }
}
