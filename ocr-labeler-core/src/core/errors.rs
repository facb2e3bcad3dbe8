//! Error types for the alignment-and-edit engine.
//!
//! Every error here is local and recoverable: an operation that returns one of
//! these leaves the line, page, and pending edit task exactly as they were.
//! The operator-facing layer decides whether to display, ignore, or retry.

use thiserror::Error;

/// The kind of interactive edit task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Splitting one word into two.
    Split,
    /// Adjusting the margins of one word's bounding box.
    BoxEdit,
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskKind::Split => write!(f, "split"),
            TaskKind::BoxEdit => write!(f, "box edit"),
        }
    }
}

/// Errors returned by geometry, line, task, and page operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    /// A word or line index does not exist.
    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of items available.
        len: usize,
    },

    /// A split would leave one side of the text or box empty.
    #[error("invalid split position: {reason}")]
    InvalidSplitPosition {
        /// What made the position unusable.
        reason: String,
    },

    /// A merge was requested at the start or end of the line.
    #[error("word {index} has no neighbor to merge with")]
    NoNeighbor {
        /// The index of the word that was to be merged.
        index: usize,
    },

    /// The two boxes are not adjacent in reading order.
    #[error("boxes are not adjacent: gap of {gap}px exceeds tolerance of {tolerance}px")]
    InvalidMerge {
        /// Horizontal gap between the boxes; negative when the second box starts
        /// before the first.
        gap: i64,
        /// The configured tolerance.
        tolerance: u32,
    },

    /// The resulting box would have a width or height below one pixel.
    #[error("box would be degenerate ({width}x{height})")]
    DegenerateBox {
        /// Resulting width in pixels (may be zero or negative).
        width: i64,
        /// Resulting height in pixels (may be zero or negative).
        height: i64,
    },

    /// Coordinates handed to a constructor do not describe a box.
    #[error("invalid box: top={top} left={left} bottom={bottom} right={right}")]
    InvalidBox {
        /// Top edge.
        top: u32,
        /// Left edge.
        left: u32,
        /// Bottom edge (exclusive).
        bottom: u32,
        /// Right edge (exclusive).
        right: u32,
    },

    /// No foreground pixels were found; the box was left unchanged.
    #[error("no content found inside the box")]
    EmptyContent,

    /// The word is a ground-truth placeholder without a bounding box.
    #[error("word {index} has no bounding box")]
    MissingBox {
        /// Index of the box-less word.
        index: usize,
    },

    /// A task is already pending on this line.
    #[error("a {active} task is already active on this line")]
    TaskAlreadyActive {
        /// The task that is currently pending.
        active: TaskKind,
    },

    /// Commit, cancel, or nudge was issued without a matching pending task.
    #[error("no active {}task", task_label(.expected))]
    NoActiveTask {
        /// The kind of task the command needed, if it needed a specific one.
        expected: Option<TaskKind>,
    },
}

impl EditError {
    /// Creates an `IndexOutOfRange` error.
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Creates an `InvalidSplitPosition` error with a reason.
    pub fn invalid_split(reason: impl Into<String>) -> Self {
        Self::InvalidSplitPosition {
            reason: reason.into(),
        }
    }

    /// Returns true for soft signals that do not indicate a rejected command.
    pub fn is_soft(&self) -> bool {
        matches!(self, Self::EmptyContent)
    }
}

fn task_label(kind: &Option<TaskKind>) -> String {
    kind.map(|kind| format!("{kind} ")).unwrap_or_default()
}

/// Convenient result alias for engine operations.
pub type EditResult<T> = Result<T, EditError>;
