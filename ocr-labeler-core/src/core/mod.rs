//! Core building blocks shared by every engine component.
//!
//! This module contains error handling and configuration management. It also
//! re-exports the most commonly used types for convenience.

pub mod config;
pub mod errors;

pub use config::{ConfigError, ConfigValidator, EngineConfig};
pub use errors::{EditError, EditResult, TaskKind};
