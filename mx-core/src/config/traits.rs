//! Configuration traits for validation and environment overrides.

use crate::error::ConfigError;

/// Trait for types that can be validated.
///
/// # Example
///
/// ```rust
/// use mx_core::config::Validatable;
/// use mx_core::error::ConfigError;
///
/// struct ServerConfig {
///     timeout_ms: u64,
/// }
///
/// impl Validatable for ServerConfig {
///     fn validate(&self) -> Result<(), ConfigError> {
///         if self.timeout_ms == 0 {
///             return Err(ConfigError::invalid_value("timeout_ms", "must be greater than zero"));
///         }
///         Ok(())
///     }
/// }
///
/// assert!(ServerConfig { timeout_ms: 0 }.validate().is_err());
/// ```
pub trait Validatable {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Trait for types that support environment variable overrides.
///
/// Variables are named `{prefix}_{FIELD}`, e.g. `MX_API_KEY`.
pub trait Configurable: Sized {
    /// Applies environment variable overrides to the configuration.
    ///
    /// Unset variables leave the current value untouched; set but unparsable
    /// variables yield [`ConfigError::InvalidEnvVar`].
    fn apply_env_overrides(&mut self, prefix: &str) -> Result<(), ConfigError>;

    /// Returns the environment variable names that can override this configuration.
    fn env_var_names(prefix: &str) -> Vec<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestConfig {
        value: i32,
    }

    impl Validatable for TestConfig {
        fn validate(&self) -> Result<(), ConfigError> {
            if self.value < 0 {
                return Err(ConfigError::invalid_value(
                    "value",
                    "Value must be non-negative",
                ));
            }
            Ok(())
        }
    }

    #[test]
    fn test_validatable() {
        assert!(TestConfig { value: 10 }.validate().is_ok());
        let err = TestConfig { value: -1 }.validate().unwrap_err();
        assert!(err.to_string().contains("value"));
    }
}
