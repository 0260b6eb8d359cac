//! # MX Core
//!
//! Canonical types, errors and collaborator traits for the MX exchange adapter.
//!
//! This crate provides:
//! - The canonical data model (`Market`, `Currency`, `Order`, `Trade`, `Ticker`,
//!   `OrderBook`, `Balances`, `Transaction`, candles)
//! - Error types with a retryable/fatal classification
//! - Trait definitions for the HTTP transport and the unified exchange interface
//! - Configuration loading with YAML/TOML/JSON support and environment overrides

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]

/// Primitive wrappers
pub mod types;

/// Canonical data model
pub mod data;

/// Error types and handling
pub mod error;

/// Collaborator trait definitions
pub mod traits;

/// Configuration management
pub mod config;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::data::*;
    pub use crate::error::{MxError, Result};
    pub use crate::traits::*;
    pub use crate::types::*;
}
