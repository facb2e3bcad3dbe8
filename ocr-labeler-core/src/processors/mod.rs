//! Algorithms the editing engine is built on.
//!
//! # Modules
//!
//! * `alignment` - Minimum-edit alignment of OCR words with ground-truth tokens
//! * `content` - Crop-to-content against a foreground mask
//! * `geometry` - Bounding boxes and box edits (split, merge, margins, clamp)
//! * `sorting` - Left-to-right reading order for word boxes

pub mod alignment;
pub mod content;
mod geometry;
pub mod sorting;

pub use alignment::{AlignToken, AlignedPair, WordAligner};
pub use content::{ContentMask, CropEdges, CropOutcome, crop_to_content};
pub use geometry::*;
pub use sorting::{first_horizontal_overlap, reading_order, sort_reading_order};
