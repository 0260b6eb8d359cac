//! Caller-input error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid or missing caller input.
///
/// Always raised before any request is sent and never worth retrying.
///
/// # Examples
///
/// ```
/// use mx_core::error::ArgumentError;
///
/// let error = ArgumentError::missing("symbol", "cancel_order");
/// assert!(error.to_string().contains("cancel_order"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArgumentError {
    /// A required argument is absent or empty.
    #[error("[Argument] {operation} requires '{name}'")]
    MissingArgument {
        /// Argument name.
        name: String,
        /// Operation or endpoint that needed it.
        operation: String,
    },

    /// An argument has an unacceptable value.
    #[error("[Argument] Invalid '{name}': {reason}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Symbol is not a loaded market.
    #[error("[Argument] Unknown symbol: {symbol}")]
    UnknownSymbol {
        /// Canonical symbol requested.
        symbol: String,
    },

    /// Currency code is not a loaded currency.
    #[error("[Argument] Unknown currency: {code}")]
    UnknownCurrency {
        /// Currency code requested.
        code: String,
    },

    /// Candle interval is not supported by the exchange.
    #[error("[Argument] Unsupported timeframe: {timeframe}")]
    UnsupportedTimeframe {
        /// Interval requested.
        timeframe: String,
    },
}

impl ArgumentError {
    /// Creates a `MissingArgument` error.
    #[must_use]
    pub fn missing(name: impl Into<String>, operation: impl Into<String>) -> Self {
        Self::MissingArgument {
            name: name.into(),
            operation: operation.into(),
        }
    }

    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Returns the severity level of this error.
    #[must_use]
    pub const fn severity(&self) -> super::ErrorSeverity {
        super::ErrorSeverity::Fatal
    }
}
