//! Default HTTP transport built on `reqwest`.

use async_trait::async_trait;
use mx_core::error::NetworkError;
use mx_core::traits::{HttpMethod, HttpRequest, HttpResponse, Transport};
use mx_telemetry::masking::SensitiveDataMasker;
use reqwest::{Client, Method, header};
use tracing::debug;

use super::config::RestConfig;

/// [`Transport`] that sends each request once through a pooled `reqwest`
/// client.
///
/// Every response is returned as received, whatever its status. Retries and
/// rate-limit queuing are left to the caller.
///
/// # Example
///
/// ```no_run
/// use mx_gateway::rest::{HttpTransport, RestConfig};
///
/// let config = RestConfig::builder().base_url("https://api.example.com").build();
/// let transport = HttpTransport::new(&config).expect("client");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
    timeout_ms: u64,
    masker: SensitiveDataMasker,
}

impl HttpTransport {
    /// Creates a transport using the timeout and user agent of `config`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError` if the HTTP client cannot be created.
    pub fn new(config: &RestConfig) -> Result<Self, NetworkError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            config
                .user_agent
                .parse()
                .map_err(|_| NetworkError::InvalidRequest {
                    reason: "Invalid user agent".to_string(),
                })?,
        );

        let http_client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| NetworkError::ConnectionFailed {
                reason: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            http_client,
            timeout_ms: config.timeout_ms,
            masker: SensitiveDataMasker::new(),
        })
    }

    fn map_error(&self, e: &reqwest::Error) -> NetworkError {
        if e.is_timeout() {
            NetworkError::Timeout {
                timeout_ms: self.timeout_ms,
            }
        } else if e.is_builder() {
            NetworkError::InvalidRequest {
                reason: e.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed {
                reason: e.to_string(),
            }
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        debug!(
            method = %request.method,
            url = %request.url,
            headers = ?self.masker.mask_headers(&request.headers),
            body = ?request.body.as_deref().map(|body| self.masker.mask_string(body)),
            "Sending request"
        );

        let mut builder = self
            .http_client
            .request(to_reqwest_method(request.method), &request.url);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_error(&e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| NetworkError::Body {
            reason: e.to_string(),
        })?;

        debug!(status, bytes = body.len(), "Received response");

        Ok(HttpResponse::new(status, body))
    }
}
