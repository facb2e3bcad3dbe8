//! The labeling session: one page, its configuration, and command dispatch.

use ocr_labeler_core::core::{EditError, EngineConfig};
use ocr_labeler_core::core::config::ConfigValidatorExt;
use ocr_labeler_core::domain::{
    CropSummary, Line, LineEditor, LineFilter, LineFilterMode, Page, PageInput, PageStatistics,
};
use ocr_labeler_core::processors::{BoundingBox, ContentMask, CropEdges};
use std::path::Path;

use crate::command::{Command, CommandOutcome};
use crate::errors::{LabelerError, LabelerResult};
use crate::export::{ExportRecord, ExportScope, export_records};
use crate::report::ValidationReport;

/// Settings shared by everything a session does.
///
/// The context is passed in explicitly; nothing is read from globals.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub config: EngineConfig,
    /// Free-form name for log output, such as the project or operator.
    pub label: String,
}

impl SessionContext {
    pub fn new(config: EngineConfig, label: impl Into<String>) -> Self {
        Self {
            config,
            label: label.into(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(EngineConfig::default(), "default")
    }
}

/// An editing session over one page.
#[derive(Debug, Clone)]
pub struct LabelingSession {
    context: SessionContext,
    page: Page,
}

impl LabelingSession {
    /// Starts a session by aligning every line of `input`.
    ///
    /// # Errors
    ///
    /// Fails when the configuration is invalid or the page has no extent.
    pub fn new(context: SessionContext, input: PageInput) -> LabelerResult<Self> {
        let config = context.config.validated()?;
        let page = Page::from_input(input, config)?;
        Ok(Self { context, page })
    }

    /// Starts a session from a JSON page file.
    pub fn load(context: SessionContext, path: &Path) -> LabelerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| LabelerError::io(path, e))?;
        let input: PageInput = serde_json::from_str(&content)?;
        Self::new(context, input)
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn statistics(&self) -> PageStatistics {
        self.page.statistics()
    }

    pub fn filter_lines(&self, mode: LineFilterMode) -> LineFilter<'_> {
        self.page.filter_lines(mode)
    }

    /// Executes one operator command.
    ///
    /// A rejected command leaves the page exactly as it was and returns the
    /// engine error.
    pub fn execute(&mut self, command: Command) -> LabelerResult<CommandOutcome> {
        let span = tracing::info_span!(
            "command",
            session = %self.context.label,
            kind = command.name(),
            line = ?command.line()
        );
        let _guard = span.enter();

        match self.dispatch(command) {
            Ok(outcome) => {
                tracing::debug!("Command applied: {:?}", outcome);
                Ok(outcome)
            }
            Err(err) if err.is_soft() => {
                tracing::info!("Command had no effect: {}", err);
                Err(err.into())
            }
            Err(err) => {
                tracing::warn!("Command rejected: {}", err);
                Err(err.into())
            }
        }
    }

    /// Executes commands in order, stopping at the first rejection.
    pub fn execute_all<I>(&mut self, commands: I) -> LabelerResult<Vec<CommandOutcome>>
    where
        I: IntoIterator<Item = Command>,
    {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    /// Crops one word box to the content in `mask`.
    pub fn crop_box(
        &mut self,
        line: usize,
        word: usize,
        mask: &ContentMask,
        edges: CropEdges,
    ) -> LabelerResult<BoundingBox> {
        let bbox = self.line_mut(line)?.crop_box(word, mask, edges)?;
        Ok(bbox)
    }

    /// Crops every box on one line to the content in `mask`.
    pub fn crop_line(
        &mut self,
        line: usize,
        mask: &ContentMask,
        edges: CropEdges,
    ) -> LabelerResult<CropSummary> {
        Ok(self.line_mut(line)?.crop_all(mask, edges))
    }

    /// Per-word records for the export layer.
    pub fn export(&self, scope: ExportScope) -> Vec<ExportRecord> {
        export_records(&self.page, scope)
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport::from_page(&self.page)
    }

    fn editor(&mut self, line: usize) -> Result<&mut LineEditor, EditError> {
        self.page.editor_mut(line)
    }

    /// Direct edits are refused while the line has an open task.
    fn line_mut(&mut self, line: usize) -> Result<&mut Line, EditError> {
        self.editor(line)?.line_mut()
    }

    fn dispatch(&mut self, command: Command) -> Result<CommandOutcome, EditError> {
        let outcome = match command {
            Command::SplitWord {
                line,
                word,
                position,
                char_index,
            } => {
                self.line_mut(line)?.split_word(word, position, char_index)?;
                CommandOutcome::Applied
            }
            Command::MergeWords {
                line,
                word,
                direction,
            } => {
                self.line_mut(line)?.merge_words(word, direction)?;
                CommandOutcome::Applied
            }
            Command::DeleteWord { line, word } => {
                CommandOutcome::WordDeleted(self.line_mut(line)?.delete_word(word)?)
            }
            Command::CopyOcrToGroundTruth { line, word } => {
                self.line_mut(line)?.copy_ocr_to_ground_truth(word)?;
                CommandOutcome::Applied
            }
            Command::SetGroundTruth { line, word, text } => {
                self.line_mut(line)?.set_ground_truth_text(word, text)?;
                CommandOutcome::Applied
            }
            Command::SetValidated {
                line,
                word,
                validated,
            } => {
                self.line_mut(line)?.set_validated(word, validated)?;
                CommandOutcome::Applied
            }
            Command::SetLineValidated { line, validated } => {
                self.line_mut(line)?.set_all_validated(validated);
                CommandOutcome::Applied
            }
            Command::EditBoxMargins {
                line,
                word,
                margins,
            } => CommandOutcome::BoxChanged(self.line_mut(line)?.edit_box_margins(word, &margins)?),
            Command::BeginSplit { line, word } => {
                let editor = self.editor(line)?;
                editor.begin_split(word)?;
                current_task(editor)
            }
            Command::BeginBoxEdit { line, word } => {
                let editor = self.editor(line)?;
                editor.begin_box_edit(word)?;
                current_task(editor)
            }
            Command::NudgeSplitPixels { line, delta } => {
                let editor = self.editor(line)?;
                editor.nudge_split_pixels(delta)?;
                current_task(editor)
            }
            Command::NudgeSplitPercent { line, fraction } => {
                let editor = self.editor(line)?;
                editor.nudge_split_percent(fraction)?;
                current_task(editor)
            }
            Command::NudgeSplitChars { line, delta } => {
                let editor = self.editor(line)?;
                editor.nudge_split_chars(delta)?;
                current_task(editor)
            }
            Command::NudgeMargin { line, edge, delta } => {
                let editor = self.editor(line)?;
                editor.nudge_margin(edge, delta)?;
                current_task(editor)
            }
            Command::NudgeMarginPercent {
                line,
                edge,
                fraction,
            } => {
                let editor = self.editor(line)?;
                editor.nudge_margin_percent(edge, fraction)?;
                current_task(editor)
            }
            Command::PreviewTask { line } => CommandOutcome::Preview(self.editor(line)?.preview()?),
            Command::CommitTask { line } => CommandOutcome::Committed(self.editor(line)?.commit()?),
            Command::CancelTask { line } => CommandOutcome::Cancelled(self.editor(line)?.cancel()?),
            Command::Rematch { line } => {
                self.line_mut(line)?.rematch();
                CommandOutcome::Applied
            }
            Command::RematchAll => CommandOutcome::LinesRematched(self.page.rematch_all()),
            Command::DeleteLine { line } => {
                self.page.delete_line(line)?;
                CommandOutcome::LineDeleted { line }
            }
            Command::MarkExactMatchesValidated => {
                CommandOutcome::LinesValidated(self.page.mark_exact_matches_validated())
            }
            Command::CopyAllOcrToGroundTruth { filter } => CommandOutcome::WordsCopied(
                self.page
                    .copy_all_ocr_to_ground_truth(|word| filter.matches(word)),
            ),
        };
        Ok(outcome)
    }
}

fn current_task(editor: &LineEditor) -> CommandOutcome {
    match editor.task() {
        Some(task) => CommandOutcome::Task(*task),
        None => CommandOutcome::Applied,
    }
}
