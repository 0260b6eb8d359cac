//! HTTP transport abstraction.
//!
//! The adapter never talks to the network directly. It hands a fully built
//! [`HttpRequest`] to a [`Transport`] and interprets whatever
//! [`HttpResponse`] comes back, including non-2xx ones. Connection pooling,
//! retries and rate-limit queuing belong to the transport implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::NetworkError;

/// HTTP method used by the exchange API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
}

impl HttpMethod {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method
    pub method: HttpMethod,
    /// Absolute URL including the query string
    pub url: String,
    /// Headers in insertion order
    pub headers: Vec<(String, String)>,
    /// JSON body for non-GET requests
    pub body: Option<String>,
}

impl HttpRequest {
    /// Returns the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A response as received, whatever its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw body
    pub body: String,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Sends HTTP requests on behalf of the adapter.
///
/// Implementations must return every response they receive; only failures
/// to obtain a response are reported as [`NetworkError`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes one request.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://example.com".to_string(),
            headers: vec![("MX-NONCE".to_string(), "1".to_string())],
            body: None,
        };
        assert_eq!(request.header("mx-nonce"), Some("1"));
        assert_eq!(request.header("MX-SIGNATURE"), None);
    }

    #[test]
    fn test_response_success() {
        assert!(HttpResponse::new(200, "{}").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(429, "").is_success());
    }

    #[test]
    fn test_method_names() {
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
    }
}
