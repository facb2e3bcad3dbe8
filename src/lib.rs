//! # OCR Labeler
//!
//! Correct machine-generated OCR transcriptions against a trusted
//! ground-truth transcription, at the granularity of pages, lines, and words.
//!
//! ## Features
//!
//! - Minimum-edit alignment of OCR words with ground-truth words per line
//! - Exact-match, mismatch, and validation status for words and lines
//! - Word split and merge, box margin edits, and crop-to-content
//! - Interactive split and box-edit tasks with nudge, preview, commit, cancel
//! - Page-level filters, batch validation, batch copy, and statistics
//! - Operator actions as serializable commands, replayable from JSON
//!
//! ## Modules
//!
//! * [`command`] - Operator commands and their outcomes
//! * [`config`] - Loading engine configuration from TOML or JSON
//! * [`errors`] - Session error type
//! * [`export`] - Per-word export records
//! * [`report`] - Plain-text line validation report
//! * [`session`] - The labeling session that executes commands
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ocr_labeler::prelude::*;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLoader::load_from_file(Path::new("labeler.toml"))?;
//! let context = SessionContext::new(config, "batch-7");
//! let mut session = LabelingSession::load(context, Path::new("page_001.json"))?;
//!
//! session.execute(Command::MergeWords {
//!     line: 0,
//!     word: 0,
//!     direction: MergeDirection::Right,
//! })?;
//! session.execute(Command::MarkExactMatchesValidated)?;
//!
//! println!("{}", session.statistics());
//! println!("{}", session.report());
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod errors;
pub mod export;
pub mod report;
pub mod session;

// Re-export the engine crate so downstream users need a single dependency
pub use ocr_labeler_core as engine;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::command::{Command, CommandOutcome};
    pub use crate::config::{ConfigFormat, ConfigLoader};
    pub use crate::errors::{LabelerError, LabelerResult};
    pub use crate::export::{ExportRecord, ExportScope};
    pub use crate::report::ValidationReport;
    pub use crate::session::{LabelingSession, SessionContext};

    pub use ocr_labeler_core::prelude::*;
}

/// Initializes the tracing subscriber for logging.
///
/// Log levels are read from the `RUST_LOG` environment variable. Libraries
/// never call this; binaries call it once at startup.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
