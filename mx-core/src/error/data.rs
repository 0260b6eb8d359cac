//! Data-related error types.
//!
//! Raised when a successful response cannot be interpreted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data error type covering parsing failures and missing structure.
///
/// # Examples
///
/// ```
/// use mx_core::error::DataError;
///
/// let error = DataError::MissingData {
///     description: "order id".to_string(),
/// };
/// assert!(error.to_string().contains("order id"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataError {
    /// Failed to parse a field.
    #[error("[Data] Parse failed for field '{field}': {reason}")]
    ParseFailed {
        /// Field that failed to parse.
        field: String,
        /// Reason for the parse failure.
        reason: String,
    },

    /// Required data is missing.
    #[error("[Data] Missing data: {description}")]
    MissingData {
        /// Description of the missing data.
        description: String,
    },

    /// Response body is not the expected JSON.
    #[error("[Data] JSON error: {reason}")]
    JsonError {
        /// Reason for the JSON error.
        reason: String,
    },
}

impl DataError {
    /// Returns the severity level of this error.
    #[must_use]
    pub const fn severity(&self) -> super::ErrorSeverity {
        super::ErrorSeverity::Warning
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serde_json() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let data_err = DataError::from(err);
        assert!(matches!(data_err, DataError::JsonError { .. }));
        assert!(data_err.to_string().starts_with("[Data] JSON error"));
    }
}
