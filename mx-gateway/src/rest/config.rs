//! REST client configuration.

use mx_core::config::{Configurable, Validatable};
use mx_core::error::ConfigError;
use mx_core::traits::Credentials;
use mx_telemetry::masking::Sensitive;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the MX REST API.
///
/// `api_secret` can be read from configuration files or the environment but
/// is never serialized back out and is redacted from `Debug`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestConfig {
    /// Base URL for API requests, without the version segment.
    pub base_url: String,

    /// API version path segment.
    #[serde(default = "default_version")]
    pub version: String,

    /// API key for authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// API user id for authentication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_user: Option<String>,

    /// API secret for signing requests.
    #[serde(default, skip_serializing)]
    pub api_secret: Option<Sensitive<String>>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_user_agent() -> String {
    format!("mx-gateway/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            version: default_version(),
            api_key: None,
            api_user: None,
            api_secret: None,
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

impl RestConfig {
    /// Creates a new builder for `RestConfig`.
    #[must_use]
    pub fn builder() -> RestConfigBuilder {
        RestConfigBuilder::default()
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Returns `{base_url}/{version}` without a trailing slash.
    #[must_use]
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version.trim_matches('/')
        )
    }

    /// Returns the configured credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        let mut credentials = Credentials::default();
        credentials.api_key.clone_from(&self.api_key);
        credentials.api_user.clone_from(&self.api_user);
        match &self.api_secret {
            Some(secret) => credentials.with_secret(secret.expose().clone()),
            None => credentials,
        }
    }

    /// Returns whether every credential needed for private calls is present.
    #[must_use]
    pub fn has_auth(&self) -> bool {
        self.credentials().require().is_ok()
    }
}

impl Validatable for RestConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.is_empty() {
            return Err(ConfigError::missing_field("base_url"));
        }
        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            return Err(ConfigError::invalid_value(
                "base_url",
                "must start with http:// or https://",
            ));
        }
        if self.version.trim_matches('/').is_empty() {
            return Err(ConfigError::missing_field("version"));
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Configurable for RestConfig {
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError> {
        let var = |name: &str| std::env::var(format!("{prefix}_{name}")).ok();

        if let Some(url) = var("BASE_URL") {
            self.base_url = url;
        }
        if let Some(key) = var("API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(user) = var("API_USER") {
            self.api_user = Some(user);
        }
        if let Some(secret) = var("API_SECRET") {
            self.api_secret = Some(Sensitive::new(secret));
        }
        if let Some(timeout) = var("TIMEOUT_MS") {
            self.timeout_ms = timeout.parse().map_err(|e| ConfigError::InvalidEnvVar {
                name: format!("{prefix}_TIMEOUT_MS"),
                reason: format!("{e}"),
            })?;
        }
        Ok(())
    }

    fn env_var_names(prefix: &str) -> Vec<String> {
        ["BASE_URL", "API_KEY", "API_USER", "API_SECRET", "TIMEOUT_MS"]
            .iter()
            .map(|name| format!("{prefix}_{name}"))
            .collect()
    }
}

/// Builder for `RestConfig`.
#[derive(Debug, Default)]
pub struct RestConfigBuilder {
    base_url: Option<String>,
    version: Option<String>,
    api_key: Option<String>,
    api_user: Option<String>,
    api_secret: Option<Sensitive<String>>,
    timeout_ms: Option<u64>,
    user_agent: Option<String>,
}

impl RestConfigBuilder {
    /// Sets the base URL.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the API version segment.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Sets the API key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API user id.
    #[must_use]
    pub fn api_user(mut self, user: impl Into<String>) -> Self {
        self.api_user = Some(user.into());
        self
    }

    /// Sets the API secret.
    #[must_use]
    pub fn api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(Sensitive::new(secret.into()));
        self
    }

    /// Sets the request timeout.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Builds the `RestConfig`.
    #[must_use]
    pub fn build(self) -> RestConfig {
        RestConfig {
            base_url: self.base_url.unwrap_or_default(),
            version: self.version.unwrap_or_else(default_version),
            api_key: self.api_key,
            api_user: self.api_user,
            api_secret: self.api_secret,
            timeout_ms: self.timeout_ms.unwrap_or_else(default_timeout_ms),
            user_agent: self.user_agent.unwrap_or_else(default_user_agent),
        }
    }
}
