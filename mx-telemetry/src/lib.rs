//! # MX Telemetry
//!
//! Logging setup and sensitive-data masking for the MX exchange adapter.
//!
//! - **Structured Logging**: `tracing` with JSON or pretty output, stdout or
//!   rolling files, filtered through `RUST_LOG`
//! - **Data Masking**: API keys, secrets and signatures are masked before
//!   they reach a log line

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

/// Logging configuration and initialization
pub mod logging;

/// Sensitive data masking
pub mod masking;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::logging::{LogConfig, LogFormat, LogOutput, init_logging};
    pub use crate::masking::{Sensitive, SensitiveDataMasker};
}
