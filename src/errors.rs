//! Error types for the labeling session.
//!
//! Engine errors ([`EditError`]) and configuration errors ([`ConfigError`])
//! come from `ocr-labeler-core`. This module wraps them together with the
//! I/O and serialization failures of the session layer.

use ocr_labeler_core::core::{ConfigError, EditError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the session facade.
#[derive(Error, Debug)]
pub enum LabelerError {
    /// An editing operation was rejected. The page is unchanged.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// A configuration value failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A file could not be read or written.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON input or output failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML input failed to parse.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML output failed to serialize.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// A file extension the loader does not understand.
    #[error("unsupported file extension for {}", path.display())]
    UnsupportedFormat { path: PathBuf },
}

impl LabelerError {
    /// Wraps an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the error is a rejected edit the operator can simply retry.
    pub fn is_edit_rejection(&self) -> bool {
        matches!(self, LabelerError::Edit(_))
    }
}

/// Result alias for session operations.
pub type LabelerResult<T> = Result<T, LabelerError>;
