//! Error classification for MX responses.
//!
//! Non-2xx responses are classified exactly once, here. The exchange error
//! code decides the kind when the body carries one; otherwise the HTTP status
//! does. A code outside the table is [`ExchangeError::Unclassified`] whatever
//! the status.

use mx_core::error::ExchangeError;
use std::fmt;
use tracing::warn;

use super::types::MxErrorBody;

/// Error codes the exchange is known to return.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MxErrorCode {
    /// `unauthorized`
    Unauthorized,
    /// `invalid_api_key`
    InvalidApiKey,
    /// `api_key_expired`
    ApiKeyExpired,
    /// `api_key_revoked`
    ApiKeyRevoked,
    /// `invalid_signature`
    InvalidSignature,
    /// `invalid_nonce`
    InvalidNonce,
    /// `insufficient_scope`
    InsufficientScope,
    /// `two_factor_required`
    TwoFactorRequired,
    /// `invalid_request`
    InvalidRequest,
    /// `missing_parameter`
    MissingParameter,
    /// `invalid_parameter`
    InvalidParameter,
    /// `validation_failed`
    ValidationFailed,
    /// `not_found`
    NotFound,
    /// `order_not_found`
    OrderNotFound,
    /// `rate_limit_exceeded`
    RateLimitExceeded,
    /// `internal_server_error`
    InternalServerError,
    /// `service_unavailable`
    ServiceUnavailable,
    /// Any other code, kept verbatim
    Unrecognized(String),
}

/// Kind an error code or status maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Authentication,
    InvalidRequest,
    NotFound,
    RateLimited,
    Server,
    Unclassified,
}

impl MxErrorCode {
    /// Parses an exchange code; unknown codes become [`Self::Unrecognized`].
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code {
            "unauthorized" => Self::Unauthorized,
            "invalid_api_key" => Self::InvalidApiKey,
            "api_key_expired" => Self::ApiKeyExpired,
            "api_key_revoked" => Self::ApiKeyRevoked,
            "invalid_signature" => Self::InvalidSignature,
            "invalid_nonce" => Self::InvalidNonce,
            "insufficient_scope" => Self::InsufficientScope,
            "two_factor_required" => Self::TwoFactorRequired,
            "invalid_request" => Self::InvalidRequest,
            "missing_parameter" => Self::MissingParameter,
            "invalid_parameter" => Self::InvalidParameter,
            "validation_failed" => Self::ValidationFailed,
            "not_found" => Self::NotFound,
            "order_not_found" => Self::OrderNotFound,
            "rate_limit_exceeded" => Self::RateLimitExceeded,
            "internal_server_error" => Self::InternalServerError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the wire string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::InvalidApiKey => "invalid_api_key",
            Self::ApiKeyExpired => "api_key_expired",
            Self::ApiKeyRevoked => "api_key_revoked",
            Self::InvalidSignature => "invalid_signature",
            Self::InvalidNonce => "invalid_nonce",
            Self::InsufficientScope => "insufficient_scope",
            Self::TwoFactorRequired => "two_factor_required",
            Self::InvalidRequest => "invalid_request",
            Self::MissingParameter => "missing_parameter",
            Self::InvalidParameter => "invalid_parameter",
            Self::ValidationFailed => "validation_failed",
            Self::NotFound => "not_found",
            Self::OrderNotFound => "order_not_found",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::InternalServerError => "internal_server_error",
            Self::ServiceUnavailable => "service_unavailable",
            Self::Unrecognized(code) => code,
        }
    }

    const fn kind(&self) -> Kind {
        match self {
            Self::Unauthorized
            | Self::InvalidApiKey
            | Self::ApiKeyExpired
            | Self::ApiKeyRevoked
            | Self::InvalidSignature
            | Self::InvalidNonce
            | Self::InsufficientScope
            | Self::TwoFactorRequired => Kind::Authentication,
            Self::InvalidRequest
            | Self::MissingParameter
            | Self::InvalidParameter
            | Self::ValidationFailed => Kind::InvalidRequest,
            Self::NotFound | Self::OrderNotFound => Kind::NotFound,
            Self::RateLimitExceeded => Kind::RateLimited,
            Self::InternalServerError | Self::ServiceUnavailable => Kind::Server,
            Self::Unrecognized(_) => Kind::Unclassified,
        }
    }
}

impl fmt::Display for MxErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const fn kind_for_status(status: u16) -> Kind {
    match status {
        401 | 403 => Kind::Authentication,
        400 | 422 => Kind::InvalidRequest,
        404 => Kind::NotFound,
        429 => Kind::RateLimited,
        500..=599 => Kind::Server,
        _ => Kind::Unclassified,
    }
}

/// Classifies a failed response from its status and raw body.
///
/// The body does not need to be JSON; an unreadable body is classified by
/// status alone.
///
/// # Examples
///
/// ```
/// use mx_gateway::mx::classify;
/// use mx_core::error::ExchangeError;
///
/// let error = classify(429, r#"{"code":"rate_limit_exceeded","message":"slow down"}"#);
/// assert!(matches!(error, ExchangeError::RateLimited { .. }));
/// assert!(error.is_retryable());
/// ```
#[must_use]
pub fn classify(status: u16, body: &str) -> ExchangeError {
    let parsed: MxErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.filter(|c| !c.is_empty());

    let kind = code
        .as_deref()
        .map_or_else(|| kind_for_status(status), |c| MxErrorCode::parse(c).kind());

    let payload = body.to_string();
    let error = match kind {
        Kind::Authentication => ExchangeError::AuthenticationFailure {
            status,
            code,
            payload,
        },
        Kind::InvalidRequest => ExchangeError::InvalidRequest {
            status,
            code,
            payload,
        },
        Kind::NotFound => ExchangeError::NotFound {
            status,
            code,
            payload,
        },
        Kind::RateLimited => ExchangeError::RateLimited {
            status,
            code,
            payload,
        },
        Kind::Server => ExchangeError::ServerError {
            status,
            code,
            payload,
        },
        Kind::Unclassified => ExchangeError::Unclassified {
            status,
            code,
            payload,
        },
    };

    warn!(
        exchange = "mx",
        status,
        code = error.code().unwrap_or(""),
        message = parsed.message.as_deref().unwrap_or(""),
        kind = error.kind(),
        "Exchange request failed"
    );

    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(code: &str) -> String {
        format!(r#"{{"code":"{code}","message":"m"}}"#)
    }

    #[test]
    fn test_code_round_trip() {
        for code in ["two_factor_required", "order_not_found", "service_unavailable"] {
            assert_eq!(MxErrorCode::parse(code).as_str(), code);
        }
        assert_eq!(
            MxErrorCode::parse("brand_new"),
            MxErrorCode::Unrecognized("brand_new".to_string())
        );
    }

    #[test]
    fn test_code_table() {
        assert!(matches!(
            classify(400, &body("rate_limit_exceeded")),
            ExchangeError::RateLimited { .. }
        ));
        assert!(matches!(
            classify(403, &body("two_factor_required")),
            ExchangeError::AuthenticationFailure { .. }
        ));
        assert!(matches!(
            classify(400, &body("validation_failed")),
            ExchangeError::InvalidRequest { .. }
        ));
        assert!(matches!(
            classify(404, &body("order_not_found")),
            ExchangeError::NotFound { .. }
        ));
        assert!(matches!(
            classify(503, &body("service_unavailable")),
            ExchangeError::ServerError { .. }
        ));
    }

    #[test]
    fn test_code_wins_over_status() {
        let error = classify(500, &body("invalid_signature"));
        assert!(matches!(error, ExchangeError::AuthenticationFailure { .. }));
        assert_eq!(error.status(), 500);
        assert_eq!(error.code(), Some("invalid_signature"));
    }

    #[test]
    fn test_unrecognized_code_is_unclassified_regardless_of_status() {
        for status in [401, 429, 500] {
            let error = classify(status, &body("something_new"));
            assert!(matches!(error, ExchangeError::Unclassified { .. }));
            assert_eq!(error.code(), Some("something_new"));
        }
    }

    #[test]
    fn test_status_fallback() {
        let cases = [
            (401, "authentication_failure"),
            (403, "authentication_failure"),
            (400, "invalid_request"),
            (422, "invalid_request"),
            (404, "not_found"),
            (429, "rate_limited"),
            (502, "server_error"),
            (418, "unclassified"),
        ];
        for (status, kind) in cases {
            assert_eq!(classify(status, "").kind(), kind, "status {status}");
        }
    }

    #[test]
    fn test_payload_preserved() {
        let raw = "<html>Bad Gateway</html>";
        let error = classify(502, raw);
        assert_eq!(error.payload(), raw);
        assert_eq!(error.code(), None);
    }

    #[test]
    fn test_only_rate_limited_is_retryable() {
        assert!(classify(429, "").is_retryable());
        assert!(!classify(503, "").is_retryable());
        assert!(!classify(401, "").is_retryable());
    }
}
