//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A configuration value is out of its allowed range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

/// A trait for validating configuration parameters.
///
/// Usually implemented through `#[derive(ConfigValidator)]`, which generates
/// `validate` from `#[validate(...)]` field attributes.
pub trait ConfigValidator {
    /// Validates the configuration.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate(&self) -> Result<(), ConfigError>;
}

/// Extension trait that validates and hands the configuration back.
pub trait ConfigValidatorExt: ConfigValidator {
    /// Validates the configuration and returns it unchanged on success.
    ///
    /// This keeps call sites to a single expression:
    /// `let config = loaded.validated()?;`
    fn validated(self) -> Result<Self, ConfigError>
    where
        Self: Sized,
    {
        self.validate()?;
        Ok(self)
    }
}

// Blanket implementation for all ConfigValidator types
impl<T: ConfigValidator> ConfigValidatorExt for T {}
