//! Pages: the lines of one image and the batch operations over them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Enumerate;
use std::slice::Iter;

use crate::core::{EditError, EditResult, EngineConfig};
use crate::domain::{Line, LineEditor, MatchStatus, PageInput, Word};
use crate::processors::BoundingBox;

/// Reference to the page image. The pixels stay with the image layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageImage {
    pub id: String,
    pub width: u32,
    pub height: u32,
}

impl PageImage {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// The box covering the whole image.
    pub fn extent(&self) -> EditResult<BoundingBox> {
        BoundingBox::from_extent(self.width, self.height)
    }
}

/// Which lines a filtered view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineFilterMode {
    #[default]
    All,
    /// Lines that are not an exact match.
    MismatchOnly,
    /// Lines that are not an exact match and not yet validated.
    UnvalidatedMismatchOnly,
}

impl LineFilterMode {
    pub fn accepts(&self, line: &Line) -> bool {
        match self {
            LineFilterMode::All => true,
            LineFilterMode::MismatchOnly => !line.is_exact(),
            LineFilterMode::UnvalidatedMismatchOnly => !line.is_exact() && !line.is_validated(),
        }
    }
}

/// Lazy iterator over `(line index, line)` pairs accepted by a filter.
///
/// Cloning the iterator restarts nothing; it forks the current position.
#[derive(Debug, Clone)]
pub struct LineFilter<'a> {
    lines: Enumerate<Iter<'a, LineEditor>>,
    mode: LineFilterMode,
}

impl<'a> Iterator for LineFilter<'a> {
    type Item = (usize, &'a Line);

    fn next(&mut self) -> Option<Self::Item> {
        let mode = self.mode;
        self.lines
            .by_ref()
            .map(|(index, editor)| (index, editor.line()))
            .find(|(_, line)| mode.accepts(line))
    }
}

/// Preset word filters for copying OCR text into ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyFilter {
    /// Every word.
    All,
    /// Words whose texts differ, including words without ground truth.
    Mismatches,
    /// Words without ground truth.
    MissingGroundTruth,
}

impl CopyFilter {
    pub fn matches(&self, word: &Word) -> bool {
        match self {
            CopyFilter::All => true,
            CopyFilter::Mismatches => word.status() != MatchStatus::Exact,
            CopyFilter::MissingGroundTruth => word.ground_truth_text().is_empty(),
        }
    }
}

/// Line-level progress counts for a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PageStatistics {
    pub total_lines: usize,
    pub exact_lines: usize,
    pub mismatched_lines: usize,
    pub validated_lines: usize,
    pub total_words: usize,
    pub validated_words: usize,
}

impl PageStatistics {
    /// Percentage of lines that match exactly (0.0 to 100.0).
    pub fn accuracy(&self) -> f64 {
        percentage(self.exact_lines, self.total_lines)
    }

    /// Percentage of lines the operator has validated (0.0 to 100.0).
    pub fn validation_progress(&self) -> f64 {
        percentage(self.validated_lines, self.total_lines)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (part as f64 / total as f64) * 100.0
    }
}

impl fmt::Display for PageStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Page Statistics:")?;
        writeln!(f, "  Total lines: {}", self.total_lines)?;
        writeln!(
            f,
            "  Exact matches: {} ({:.1}%)",
            self.exact_lines,
            self.accuracy()
        )?;
        writeln!(f, "  Mismatches: {}", self.mismatched_lines)?;
        writeln!(
            f,
            "  Validated: {} ({:.1}%)",
            self.validated_lines,
            self.validation_progress()
        )?;
        writeln!(
            f,
            "  Words: {} ({} validated)",
            self.total_words, self.validated_words
        )?;
        Ok(())
    }
}

/// Final state of one word, as handed to the export layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordRecord {
    pub line_index: usize,
    pub word_index: usize,
    pub ocr_text: String,
    pub ground_truth_text: String,
    pub bbox: Option<BoundingBox>,
    pub validated: bool,
    pub status: MatchStatus,
}

/// All lines of one page image.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    image: PageImage,
    lines: Vec<LineEditor>,
    config: EngineConfig,
}

impl Page {
    pub fn new(image: PageImage, lines: Vec<Line>, config: EngineConfig) -> Self {
        Self {
            image,
            lines: lines.into_iter().map(LineEditor::new).collect(),
            config,
        }
    }

    /// Builds a page by aligning every input line.
    ///
    /// # Errors
    ///
    /// `EditError::InvalidBox` when the image has a zero dimension.
    pub fn from_input(input: PageInput, config: EngineConfig) -> EditResult<Self> {
        let extent = input.image.extent()?;
        let lines: Vec<Line> = input
            .lines
            .into_iter()
            .map(|line| {
                Line::from_alignment(line.ocr_words, line.ground_truth_words, extent, config)
            })
            .collect();
        tracing::info!("Loaded page {} with {} lines", input.image.id, lines.len());
        Ok(Self::new(input.image, lines, config))
    }

    pub fn image(&self) -> &PageImage {
        &self.image
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line(&self, index: usize) -> EditResult<&Line> {
        self.editor(index).map(LineEditor::line)
    }

    pub fn editor(&self, index: usize) -> EditResult<&LineEditor> {
        self.lines
            .get(index)
            .ok_or_else(|| EditError::index_out_of_range(index, self.lines.len()))
    }

    pub fn editor_mut(&mut self, index: usize) -> EditResult<&mut LineEditor> {
        let len = self.lines.len();
        self.lines
            .get_mut(index)
            .ok_or_else(|| EditError::index_out_of_range(index, len))
    }

    /// All lines in page order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> + Clone + '_ {
        self.lines.iter().map(LineEditor::line)
    }

    /// Lines accepted by `mode`, with their page indices.
    pub fn filter_lines(&self, mode: LineFilterMode) -> LineFilter<'_> {
        LineFilter {
            lines: self.lines.iter().enumerate(),
            mode,
        }
    }

    /// Validates every word of every exact-match line.
    ///
    /// Lines with an open edit task are skipped.
    ///
    /// # Returns
    ///
    /// The number of lines that were not validated before.
    pub fn mark_exact_matches_validated(&mut self) -> usize {
        let mut newly_validated = 0;
        for line in self.idle_lines_mut() {
            if line.is_empty() || !line.is_exact() || line.is_validated() {
                continue;
            }
            line.set_all_validated(true);
            newly_validated += 1;
        }
        tracing::info!("Validated {} exact-match lines", newly_validated);
        newly_validated
    }

    /// Copies OCR text into ground truth for every word that satisfies
    /// `predicate` and whose texts differ. Lines with an open edit task are
    /// skipped.
    ///
    /// # Returns
    ///
    /// The number of words changed.
    pub fn copy_all_ocr_to_ground_truth<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&Word) -> bool,
    {
        let changed: usize = self
            .idle_lines_mut()
            .map(|line| line.copy_ocr_to_ground_truth_where(&predicate))
            .sum();
        tracing::info!("Copied OCR text to ground truth for {} words", changed);
        changed
    }

    /// Re-aligns every line without an open edit task.
    ///
    /// # Returns
    ///
    /// The number of lines re-aligned.
    pub fn rematch_all(&mut self) -> usize {
        let mut rematched = 0;
        for line in self.idle_lines_mut() {
            line.rematch();
            rematched += 1;
        }
        let busy = self.lines.len() - rematched;
        if busy > 0 {
            tracing::info!("Skipped {} lines with an open edit task", busy);
        }
        rematched
    }

    fn idle_lines_mut(&mut self) -> impl Iterator<Item = &mut Line> + '_ {
        self.lines
            .iter_mut()
            .filter_map(|editor| editor.line_mut().ok())
    }

    /// Removes a line, discarding any task open on it.
    pub fn delete_line(&mut self, index: usize) -> EditResult<Line> {
        self.editor(index)?;
        Ok(self.lines.remove(index).into_line())
    }

    pub fn statistics(&self) -> PageStatistics {
        self.lines().fold(PageStatistics::default(), |mut stats, line| {
            stats.total_lines += 1;
            if line.is_exact() {
                stats.exact_lines += 1;
            } else {
                stats.mismatched_lines += 1;
            }
            if line.is_validated() {
                stats.validated_lines += 1;
            }
            stats.total_words += line.len();
            stats.validated_words += line.words().iter().filter(|w| w.is_validated()).count();
            stats
        })
    }

    /// Final per-word state for every line.
    pub fn export_words(&self) -> Vec<WordRecord> {
        self.lines()
            .enumerate()
            .flat_map(|(line_index, line)| {
                line.words()
                    .iter()
                    .enumerate()
                    .map(move |(word_index, word)| WordRecord {
                        line_index,
                        word_index,
                        ocr_text: word.ocr_text().to_string(),
                        ground_truth_text: word.ground_truth_text().to_string(),
                        bbox: word.bounding_box().copied(),
                        validated: word.is_validated(),
                        status: word.status(),
                    })
            })
            .collect()
    }
}
