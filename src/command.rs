//! Operator actions as values.
//!
//! Every button, key binding, or script step becomes a [`Command`]. The
//! session executes it against the page and answers with a
//! [`CommandOutcome`]. Commands serialize as JSON objects tagged by `type`,
//! so a recorded editing session can be replayed.

use ocr_labeler_core::core::TaskKind;
use ocr_labeler_core::domain::{CopyFilter, EditTask, MergeDirection, TaskPreview, Word};
use ocr_labeler_core::processors::{BoundingBox, Edge, MarginDeltas, SplitPosition};
use serde::{Deserialize, Serialize};

/// One operator action. Line and word indices are zero-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    SplitWord {
        line: usize,
        word: usize,
        position: SplitPosition,
        #[serde(default)]
        char_index: Option<usize>,
    },
    MergeWords {
        line: usize,
        word: usize,
        direction: MergeDirection,
    },
    DeleteWord {
        line: usize,
        word: usize,
    },
    CopyOcrToGroundTruth {
        line: usize,
        word: usize,
    },
    SetGroundTruth {
        line: usize,
        word: usize,
        text: String,
    },
    SetValidated {
        line: usize,
        word: usize,
        validated: bool,
    },
    SetLineValidated {
        line: usize,
        validated: bool,
    },
    EditBoxMargins {
        line: usize,
        word: usize,
        margins: MarginDeltas,
    },
    BeginSplit {
        line: usize,
        word: usize,
    },
    BeginBoxEdit {
        line: usize,
        word: usize,
    },
    NudgeSplitPixels {
        line: usize,
        delta: i32,
    },
    NudgeSplitPercent {
        line: usize,
        fraction: f32,
    },
    NudgeSplitChars {
        line: usize,
        delta: i32,
    },
    NudgeMargin {
        line: usize,
        edge: Edge,
        delta: i32,
    },
    NudgeMarginPercent {
        line: usize,
        edge: Edge,
        fraction: f32,
    },
    PreviewTask {
        line: usize,
    },
    CommitTask {
        line: usize,
    },
    CancelTask {
        line: usize,
    },
    Rematch {
        line: usize,
    },
    RematchAll,
    DeleteLine {
        line: usize,
    },
    MarkExactMatchesValidated,
    CopyAllOcrToGroundTruth {
        filter: CopyFilter,
    },
}

impl Command {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SplitWord { .. } => "split_word",
            Command::MergeWords { .. } => "merge_words",
            Command::DeleteWord { .. } => "delete_word",
            Command::CopyOcrToGroundTruth { .. } => "copy_ocr_to_ground_truth",
            Command::SetGroundTruth { .. } => "set_ground_truth",
            Command::SetValidated { .. } => "set_validated",
            Command::SetLineValidated { .. } => "set_line_validated",
            Command::EditBoxMargins { .. } => "edit_box_margins",
            Command::BeginSplit { .. } => "begin_split",
            Command::BeginBoxEdit { .. } => "begin_box_edit",
            Command::NudgeSplitPixels { .. } => "nudge_split_pixels",
            Command::NudgeSplitPercent { .. } => "nudge_split_percent",
            Command::NudgeSplitChars { .. } => "nudge_split_chars",
            Command::NudgeMargin { .. } => "nudge_margin",
            Command::NudgeMarginPercent { .. } => "nudge_margin_percent",
            Command::PreviewTask { .. } => "preview_task",
            Command::CommitTask { .. } => "commit_task",
            Command::CancelTask { .. } => "cancel_task",
            Command::Rematch { .. } => "rematch",
            Command::RematchAll => "rematch_all",
            Command::DeleteLine { .. } => "delete_line",
            Command::MarkExactMatchesValidated => "mark_exact_matches_validated",
            Command::CopyAllOcrToGroundTruth { .. } => "copy_all_ocr_to_ground_truth",
        }
    }

    /// The line the command targets, if it targets one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Command::SplitWord { line, .. }
            | Command::MergeWords { line, .. }
            | Command::DeleteWord { line, .. }
            | Command::CopyOcrToGroundTruth { line, .. }
            | Command::SetGroundTruth { line, .. }
            | Command::SetValidated { line, .. }
            | Command::SetLineValidated { line, .. }
            | Command::EditBoxMargins { line, .. }
            | Command::BeginSplit { line, .. }
            | Command::BeginBoxEdit { line, .. }
            | Command::NudgeSplitPixels { line, .. }
            | Command::NudgeSplitPercent { line, .. }
            | Command::NudgeSplitChars { line, .. }
            | Command::NudgeMargin { line, .. }
            | Command::NudgeMarginPercent { line, .. }
            | Command::PreviewTask { line }
            | Command::CommitTask { line }
            | Command::CancelTask { line }
            | Command::Rematch { line }
            | Command::DeleteLine { line } => Some(*line),
            Command::RematchAll
            | Command::MarkExactMatchesValidated
            | Command::CopyAllOcrToGroundTruth { .. } => None,
        }
    }
}

/// What a successfully executed command did.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The page changed; nothing further to report.
    Applied,
    /// A box was resized.
    BoxChanged(BoundingBox),
    /// A word was removed from its line.
    WordDeleted(Word),
    /// A line was removed from the page; later lines shift down by one.
    LineDeleted { line: usize },
    /// An edit task was opened or nudged; this is its current state.
    Task(EditTask),
    /// What committing the open task would produce.
    Preview(TaskPreview),
    /// The open task was applied.
    Committed(TaskKind),
    /// The open task was discarded.
    Cancelled(EditTask),
    /// Lines newly validated by a batch operation.
    LinesValidated(usize),
    /// Words whose ground truth was overwritten by a batch copy.
    WordsCopied(usize),
    /// Lines re-aligned by a page-wide rematch.
    LinesRematched(usize),
}
