//! MX exchange adapter.
//!
//! - `MxExchange` - the unified exchange interface over a [`Transport`](mx_core::traits::Transport)
//! - `MarketIndex` - loaded markets and currencies
//! - Response parsers from wire shapes to the canonical model
//! - `classify` - maps failed responses onto the error taxonomy
//!
//! # Example
//!
//! ```no_run
//! use mx_core::traits::ExchangeApi;
//! use mx_gateway::mx::MxExchange;
//! use mx_gateway::rest::RestConfig;
//!
//! # async fn run() -> mx_core::error::Result<()> {
//! let config = RestConfig::builder().base_url("https://api.example.com").build();
//! let exchange = MxExchange::from_config(config)?;
//!
//! let ticker = exchange.fetch_ticker("MTL/BTC").await?;
//! println!("{:?}", ticker.last);
//! # Ok(())
//! # }
//! ```

mod errors;
mod exchange;
mod markets;
pub mod parser;
pub mod types;

pub use errors::{MxErrorCode, classify};
pub use exchange::MxExchange;
pub use markets::MarketIndex;
