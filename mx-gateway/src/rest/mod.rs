//! REST client infrastructure.
//!
//! - Endpoint table and request preparation (path placeholders, query/body)
//! - Request signing (HMAC-SHA256) and strictly increasing nonces
//! - Client configuration with environment overrides
//! - A default `reqwest` transport
//!
//! # Example
//!
//! ```
//! use mx_gateway::rest::{Endpoint, RestConfig, prepare};
//! use serde_json::Map;
//!
//! let config = RestConfig::builder().base_url("https://api.example.com").build();
//! let request = prepare(Endpoint::ExchangeInfo, Map::new()).unwrap();
//! assert_eq!(request.url(&config.api_root()), "https://api.example.com/v1/exchange-info");
//! ```

mod client;
mod config;
mod request;
mod signer;

pub use client::HttpTransport;
pub use config::{RestConfig, RestConfigBuilder};
pub use request::{Access, Endpoint, PreparedRequest, prepare};
pub use signer::{
    HEADER_API_KEY, HEADER_API_USER, HEADER_NONCE, HEADER_SIGNATURE, NonceGenerator,
    RequestSigner,
};
