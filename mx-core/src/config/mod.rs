//! Configuration management module.
//!
//! - YAML, TOML and JSON configuration files
//! - Environment variable overrides through [`Configurable`]
//! - Validation through [`Validatable`]
//!
//! # Example
//!
//! ```rust,ignore
//! use mx_core::config::{ConfigFormat, ConfigLoader};
//!
//! // Load from YAML file, then apply MX_* overrides
//! let config: RestConfig = ConfigLoader::new()
//!     .with_env_prefix("MX")
//!     .load_file("mx.yaml")?;
//!
//! // Load from TOML string
//! let config: RestConfig = ConfigLoader::new()
//!     .load_str(toml_content, ConfigFormat::Toml)?;
//! ```

mod loader;
mod traits;

pub use loader::{ConfigFormat, ConfigLoader};
pub use traits::{Configurable, Validatable};
