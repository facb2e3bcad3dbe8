//! Domain-level structures of the labeling engine.
//!
//! Words belong to lines, lines belong to pages. Each line carries a slot for
//! one interactive edit task.

pub mod input;
pub mod line;
pub mod page;
pub mod task;
pub mod word;

pub use input::{GroundTruthWord, LineInput, OcrWord, PageInput};
pub use line::{CropSummary, Line, MergeDirection};
pub use page::{
    CopyFilter, LineFilter, LineFilterMode, Page, PageImage, PageStatistics, WordRecord,
};
pub use task::{BoxEditTask, EditTask, LineEditor, SplitTask, TaskPreview};
pub use word::{MatchStatus, Word};
