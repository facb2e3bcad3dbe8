//! Configuration management for the engine.
//!
//! This module provides the engine configuration and the validation traits
//! implemented by `#[derive(ConfigValidator)]`.

pub mod engine;
pub mod errors;

pub use engine::EngineConfig;
pub use errors::{ConfigError, ConfigValidator, ConfigValidatorExt};
