//! Interactive edit tasks.
//!
//! Splitting a word or adjusting its box is an interactive operation: the
//! operator opens a task, nudges it until the preview looks right, then
//! commits or cancels. A [`LineEditor`] holds a line together with the one
//! task that may be open on it.

use serde::{Deserialize, Serialize};

use crate::core::{EditError, EditResult, TaskKind};
use crate::domain::{Line, Word};
use crate::processors::{BoundingBox, Edge, MarginDeltas, SplitPosition};

/// A pending word split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitTask {
    pub word_index: usize,
    /// Cut position in pixels from the left edge of the box.
    pub box_offset: u32,
    /// Cut position in OCR characters.
    pub char_index: usize,
}

/// A pending box edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxEditTask {
    pub word_index: usize,
    pub margins: MarginDeltas,
}

/// The task open on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditTask {
    Split(SplitTask),
    BoxEdit(BoxEditTask),
}

impl EditTask {
    pub fn kind(&self) -> TaskKind {
        match self {
            EditTask::Split(_) => TaskKind::Split,
            EditTask::BoxEdit(_) => TaskKind::BoxEdit,
        }
    }

    pub fn word_index(&self) -> usize {
        match self {
            EditTask::Split(task) => task.word_index,
            EditTask::BoxEdit(task) => task.word_index,
        }
    }
}

/// What committing the open task would produce.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskPreview {
    Split { left: Word, right: Word },
    BoxEdit { bbox: BoundingBox },
}

/// A line plus its edit-task slot.
#[derive(Debug, Clone, PartialEq)]
pub struct LineEditor {
    line: Line,
    task: Option<EditTask>,
}

impl From<Line> for LineEditor {
    fn from(line: Line) -> Self {
        Self::new(line)
    }
}

impl LineEditor {
    pub fn new(line: Line) -> Self {
        Self { line, task: None }
    }

    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Mutable access for direct, non-interactive edits.
    ///
    /// # Errors
    ///
    /// `EditError::TaskAlreadyActive` while a task is open, since the task
    /// refers to words by index.
    pub fn line_mut(&mut self) -> EditResult<&mut Line> {
        self.ensure_idle()?;
        Ok(&mut self.line)
    }

    pub fn into_line(self) -> Line {
        self.line
    }

    pub fn task(&self) -> Option<&EditTask> {
        self.task.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.task.is_none()
    }

    /// Opens a split task on a word.
    ///
    /// The cut starts at the configured default fraction of the box width
    /// and at half of the OCR characters.
    pub fn begin_split(&mut self, word_index: usize) -> EditResult<SplitTask> {
        self.ensure_idle()?;
        let word = self.line.word(word_index)?;
        let bbox = word
            .bounding_box()
            .ok_or(EditError::MissingBox { index: word_index })?;

        let fraction = f64::from(self.line.config().default_split_fraction);
        let task = SplitTask {
            word_index,
            box_offset: (fraction * f64::from(bbox.width())).round() as u32,
            char_index: word.ocr_text().chars().count() / 2,
        };
        tracing::debug!("Begin split task: {:?}", task);
        self.task = Some(EditTask::Split(task));
        Ok(task)
    }

    /// Opens a box-edit task on a word.
    pub fn begin_box_edit(&mut self, word_index: usize) -> EditResult<BoxEditTask> {
        self.ensure_idle()?;
        let word = self.line.word(word_index)?;
        if !word.has_box() {
            return Err(EditError::MissingBox { index: word_index });
        }

        let task = BoxEditTask {
            word_index,
            margins: MarginDeltas::default(),
        };
        tracing::debug!("Begin box edit task: {:?}", task);
        self.task = Some(EditTask::BoxEdit(task));
        Ok(task)
    }

    /// Moves the split cut by `delta` pixels, clamped to the box.
    ///
    /// # Returns
    ///
    /// The new pixel offset.
    pub fn nudge_split_pixels(&mut self, delta: i32) -> EditResult<u32> {
        let Some(EditTask::Split(task)) = &mut self.task else {
            return Err(no_task(TaskKind::Split));
        };
        let width = target_box(&self.line, task.word_index)?.width();
        let offset = (i64::from(task.box_offset) + i64::from(delta)).clamp(0, i64::from(width));
        task.box_offset = offset as u32;
        Ok(task.box_offset)
    }

    /// Moves the split cut by a fraction of the box width.
    pub fn nudge_split_percent(&mut self, fraction: f32) -> EditResult<u32> {
        let width = match &self.task {
            Some(EditTask::Split(task)) => target_box(&self.line, task.word_index)?.width(),
            _ => return Err(no_task(TaskKind::Split)),
        };
        let delta = (f64::from(fraction) * f64::from(width)).round();
        self.nudge_split_pixels(delta.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
    }

    /// Moves the OCR text cut by `delta` characters, clamped to the text.
    pub fn nudge_split_chars(&mut self, delta: i32) -> EditResult<usize> {
        let Some(EditTask::Split(task)) = &mut self.task else {
            return Err(no_task(TaskKind::Split));
        };
        let char_count = self.line.word(task.word_index)?.ocr_text().chars().count();
        let moved = task.char_index as i64 + i64::from(delta);
        task.char_index = moved.clamp(0, char_count as i64) as usize;
        Ok(task.char_index)
    }

    /// Moves one edge of the pending box edit by `delta` pixels.
    pub fn nudge_margin(&mut self, edge: Edge, delta: i32) -> EditResult<MarginDeltas> {
        let Some(EditTask::BoxEdit(task)) = &mut self.task else {
            return Err(no_task(TaskKind::BoxEdit));
        };
        task.margins.nudge(edge, delta);
        Ok(task.margins)
    }

    /// Moves one edge by a fraction of the box dimension along that edge's
    /// axis (width for left/right, height for top/bottom).
    pub fn nudge_margin_percent(&mut self, edge: Edge, fraction: f32) -> EditResult<MarginDeltas> {
        let bbox = match &self.task {
            Some(EditTask::BoxEdit(task)) => target_box(&self.line, task.word_index)?,
            _ => return Err(no_task(TaskKind::BoxEdit)),
        };
        let dimension = match edge {
            Edge::Left | Edge::Right => bbox.width(),
            Edge::Top | Edge::Bottom => bbox.height(),
        };
        let delta = (f64::from(fraction) * f64::from(dimension)).round();
        self.nudge_margin(edge, delta.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
    }

    /// Computes what [`LineEditor::commit`] would produce without changing
    /// the line.
    pub fn preview(&self) -> EditResult<TaskPreview> {
        match self.task.as_ref().ok_or(EditError::NoActiveTask { expected: None })? {
            EditTask::Split(task) => {
                let mut scratch = self.line.clone();
                apply_split(&mut scratch, task)?;
                let left = scratch.word(task.word_index)?.clone();
                let right = scratch.word(task.word_index + 1)?.clone();
                Ok(TaskPreview::Split { left, right })
            }
            EditTask::BoxEdit(task) => {
                let bbox = target_box(&self.line, task.word_index)?;
                let limits = self.line.margin_limits(task.word_index)?;
                Ok(TaskPreview::BoxEdit {
                    bbox: bbox.adjust_margins(&task.margins, &limits)?,
                })
            }
        }
    }

    /// Applies the open task to the line.
    ///
    /// On failure the task stays open so the operator can adjust it.
    pub fn commit(&mut self) -> EditResult<TaskKind> {
        let task = self.task.ok_or(EditError::NoActiveTask { expected: None })?;
        match &task {
            EditTask::Split(split) => apply_split(&mut self.line, split)?,
            EditTask::BoxEdit(edit) => {
                self.line.edit_box_margins(edit.word_index, &edit.margins)?;
            }
        }
        self.task = None;
        tracing::debug!("Committed {} task on word {}", task.kind(), task.word_index());
        Ok(task.kind())
    }

    /// Discards the open task.
    pub fn cancel(&mut self) -> EditResult<EditTask> {
        let task = self
            .task
            .take()
            .ok_or(EditError::NoActiveTask { expected: None })?;
        tracing::debug!("Cancelled {} task", task.kind());
        Ok(task)
    }

    fn ensure_idle(&self) -> EditResult<()> {
        match &self.task {
            Some(task) => Err(EditError::TaskAlreadyActive {
                active: task.kind(),
            }),
            None => Ok(()),
        }
    }
}

fn no_task(expected: TaskKind) -> EditError {
    EditError::NoActiveTask {
        expected: Some(expected),
    }
}

fn target_box(line: &Line, word_index: usize) -> EditResult<BoundingBox> {
    line.word(word_index)?
        .bounding_box()
        .copied()
        .ok_or(EditError::MissingBox { index: word_index })
}

fn apply_split(line: &mut Line, task: &SplitTask) -> EditResult<()> {
    line.split_word(
        task.word_index,
        SplitPosition::Pixel(task.box_offset),
        Some(task.char_index),
    )
}
