//! # MX Gateway
//!
//! REST adapter for the MX exchange.
//!
//! This crate provides:
//! - Request building from a fixed endpoint table
//! - HMAC-SHA256 request signing with strictly increasing nonces
//! - Response normalization into the canonical model of `mx-core`
//! - Classification of failed responses by exchange code and HTTP status
//!
//! # Architecture
//!
//! The gateway module is organized into:
//! - `rest` - endpoint table, signer, configuration and the `reqwest` transport
//! - `mx` - wire types, parsers, market index and the exchange facade
//!
//! # Example
//!
//! ```no_run
//! use mx_core::traits::ExchangeApi;
//! use mx_gateway::prelude::*;
//!
//! # async fn run() -> mx_core::error::Result<()> {
//! let config = RestConfig::builder()
//!     .base_url("https://api.example.com")
//!     .api_key("key")
//!     .api_user("user")
//!     .api_secret("secret")
//!     .build();
//!
//! let exchange = MxExchange::from_config(config)?;
//! let balances = exchange.fetch_balance().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// REST client infrastructure
pub mod rest;

/// MX exchange adapter
pub mod mx;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::mx::{MarketIndex, MxErrorCode, MxExchange, classify};
    pub use crate::rest::{
        Endpoint, HttpTransport, NonceGenerator, RequestSigner, RestConfig, RestConfigBuilder,
    };
}
