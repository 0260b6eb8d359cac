//! Error types and handling framework.
//!
//! Errors are grouped by where they originate:
//! - [`MxError`] - Top-level error type
//!   - [`ArgumentError`] - Invalid caller input, raised before any I/O
//!   - [`ExchangeError`] - Remote errors classified from exchange responses
//!   - [`NetworkError`] - Failures reported by the transport
//!   - [`DataError`] - Successful responses that cannot be interpreted
//!   - [`ConfigError`] - Configuration and credential errors
//!
//! Every category reports an [`ErrorSeverity`]. The adapter itself never
//! retries; [`MxError::is_retryable`] tells callers when retrying is sensible.
//!
//! ```
//! use mx_core::error::{ExchangeError, MxError};
//!
//! let error = MxError::from(ExchangeError::RateLimited {
//!     status: 429,
//!     code: Some("rate_limit_exceeded".to_string()),
//!     payload: String::new(),
//! });
//! assert!(error.is_retryable());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error severity levels for categorizing errors.
///
/// # Examples
///
/// ```
/// use mx_core::error::ErrorSeverity;
///
/// let severity = ErrorSeverity::Recoverable;
/// assert!(severity.is_recoverable());
/// assert!(!severity.is_fatal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ErrorSeverity {
    /// Unrecoverable error. Retrying the same call cannot succeed.
    Fatal,

    /// Error that can potentially be recovered from through retry.
    #[default]
    Recoverable,

    /// Non-critical issue, usually caused by the request contents.
    Warning,

    /// Expected condition such as a missing order.
    Info,
}

impl ErrorSeverity {
    /// Returns true if this error is recoverable (not fatal).
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Fatal)
    }

    /// Returns true if this error is fatal (unrecoverable).
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal)
    }

    /// Returns the severity as a static string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fatal => "FATAL",
            Self::Recoverable => "RECOVERABLE",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

mod argument;
mod config;
mod data;
mod exchange;
mod network;

pub use argument::ArgumentError;
pub use config::ConfigError;
pub use data::DataError;
pub use exchange::ExchangeError;
pub use network::NetworkError;

/// Top-level error type for the MX adapter.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MxError {
    /// Invalid caller input.
    #[error("{0}")]
    Argument(#[from] ArgumentError),

    /// Error reported by the exchange.
    #[error("{0}")]
    Exchange(#[from] ExchangeError),

    /// Transport failure.
    #[error("{0}")]
    Network(#[from] NetworkError),

    /// Response data error.
    #[error("{0}")]
    Data(#[from] DataError),

    /// Configuration error.
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl MxError {
    /// Returns the severity level of this error.
    #[must_use]
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Argument(e) => e.severity(),
            Self::Exchange(e) => e.severity(),
            Self::Network(e) => e.severity(),
            Self::Data(e) => e.severity(),
            Self::Config(e) => e.severity(),
        }
    }

    /// Returns true if this error is recoverable.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        self.severity().is_recoverable()
    }

    /// Returns true if retrying the same call may succeed.
    ///
    /// Only rate limiting and transient transport failures qualify.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Exchange(e) => e.is_retryable(),
            Self::Network(e) => e.is_recoverable(),
            _ => false,
        }
    }

    /// Returns true if this is an argument error.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    /// Returns true if this is an exchange error.
    #[must_use]
    pub fn is_exchange_error(&self) -> bool {
        matches!(self, Self::Exchange(_))
    }

    /// Returns true if this is a config error.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Returns the error category as a string.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Argument(_) => "argument",
            Self::Exchange(_) => "exchange",
            Self::Network(_) => "network",
            Self::Data(_) => "data",
            Self::Config(_) => "config",
        }
    }

    /// Returns the inner exchange error, if this is an exchange error.
    #[must_use]
    pub fn as_exchange_error(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner argument error, if this is an argument error.
    #[must_use]
    pub fn as_argument_error(&self) -> Option<&ArgumentError> {
        match self {
            Self::Argument(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the inner config error, if this is a config error.
    #[must_use]
    pub fn as_config_error(&self) -> Option<&ConfigError> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

/// A specialized Result type for adapter operations.
pub type Result<T> = std::result::Result<T, MxError>;
