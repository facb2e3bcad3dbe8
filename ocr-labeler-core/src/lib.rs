//! # OCR Labeler Core
//!
//! The alignment-and-edit engine behind the OCR ground-truth labeler.
//!
//! This crate provides:
//! - Error handling and configuration types
//! - Bounding-box geometry and crop-to-content
//! - Word alignment of OCR output against ground truth
//! - Lines, pages, and the interactive edit-task state machine
//!
//! ## Modules
//!
//! * [`core`] - Errors and engine configuration
//! * [`domain`] - Words, lines, pages, edit tasks, and typed page input
//! * [`processors`] - Geometry, alignment, content cropping, reading order
//!
//! ## Example
//!
//! ```
//! use ocr_labeler_core::prelude::*;
//!
//! let line = Line::from_alignment(
//!     vec![
//!         OcrWord::new("Th", BoundingBox::new(0, 10, 20, 30)?),
//!         OcrWord::new("e", BoundingBox::new(0, 32, 20, 40)?),
//!         OcrWord::new("cat", BoundingBox::new(0, 50, 20, 80)?),
//!     ],
//!     GroundTruthWord::from_line_text("The cat"),
//!     BoundingBox::from_extent(200, 40)?,
//!     EngineConfig::default(),
//! );
//! let mut editor = LineEditor::new(line);
//! editor.line_mut()?.merge_words(0, MergeDirection::Right)?;
//! assert_eq!(editor.line().status(), MatchStatus::Exact);
//! # Ok::<(), EditError>(())
//! ```

pub mod core;
pub mod domain;
pub mod processors;

// Re-export derive macros for convenient use
pub use ocr_labeler_derive::ConfigValidator;

/// Prelude module for convenient imports.
pub mod prelude {
    // Error Handling
    pub use crate::core::{ConfigError, EditError, EditResult, TaskKind};

    // Configuration
    pub use crate::core::EngineConfig;
    pub use crate::core::config::{ConfigValidator, ConfigValidatorExt};

    // Domain types
    pub use crate::domain::{
        CopyFilter, EditTask, GroundTruthWord, Line, LineEditor, LineFilterMode, LineInput,
        MatchStatus, MergeDirection, OcrWord, Page, PageImage, PageInput, PageStatistics,
        TaskPreview, Word, WordRecord,
    };

    // Geometry and processing
    pub use crate::processors::{
        BoundingBox, ContentMask, CropEdges, Edge, MarginDeltas, SplitPosition, WordAligner,
    };
}
