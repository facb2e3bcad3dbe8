//! A line of words and the edits an operator applies to it.
//!
//! A [`Line`] owns its words in left-to-right reading order. Every editing
//! operation either succeeds completely or returns an [`EditError`] and leaves
//! the line untouched.

use serde::{Deserialize, Serialize};

use crate::core::{EditError, EditResult, EngineConfig};
use crate::domain::{GroundTruthWord, MatchStatus, OcrWord, Word};
use crate::processors::{
    AlignToken, AlignedPair, Axis, BoundingBox, ContentMask, CropEdges, CropOutcome,
    MarginDeltas, SplitPosition, WordAligner, crop_to_content, first_horizontal_overlap,
    sort_reading_order,
};

/// Which neighbor a word is merged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeDirection {
    Left,
    Right,
}

/// Counts from cropping every box on a line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CropSummary {
    /// Boxes that shrank.
    pub cropped: usize,
    /// Boxes that already fit their content.
    pub unchanged: usize,
    /// Boxes with no content inside; left as they were.
    pub empty: usize,
}

/// One line of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    words: Vec<Word>,
    extent: BoundingBox,
    config: EngineConfig,
}

impl Line {
    /// Creates a line from words already in reading order.
    ///
    /// # Arguments
    ///
    /// * `words` - The words, left to right.
    /// * `extent` - The page extent; box edits never leave it.
    /// * `config` - Engine tunables used by the line's edits.
    pub fn new(words: Vec<Word>, extent: BoundingBox, config: EngineConfig) -> Self {
        let line = Self {
            words,
            extent,
            config,
        };
        line.warn_on_overlap();
        line
    }

    /// Builds a line by aligning OCR words with ground-truth words.
    ///
    /// OCR boxes are clamped to `extent` (words entirely outside it are
    /// dropped) and sorted into reading order before alignment. Ground-truth
    /// words without an OCR partner become box-less placeholders.
    pub fn from_alignment(
        ocr_words: Vec<OcrWord>,
        ground_truth_words: Vec<GroundTruthWord>,
        extent: BoundingBox,
        config: EngineConfig,
    ) -> Self {
        let mut ocr_words: Vec<OcrWord> = ocr_words
            .into_iter()
            .filter_map(|word| match word.bbox.clamp_to(&extent) {
                Ok(bbox) => Some(OcrWord { bbox, ..word }),
                Err(_) => {
                    tracing::warn!(
                        "Dropping OCR word {:?}: box {:?} lies outside the page",
                        word.text,
                        word.bbox
                    );
                    None
                }
            })
            .collect();
        sort_reading_order(&mut ocr_words, |word| &word.bbox);

        let ocr_tokens: Vec<AlignToken<'_>> = ocr_words
            .iter()
            .map(|word| AlignToken::new(&word.text, Some(&word.bbox)))
            .collect();
        let gt_tokens: Vec<AlignToken<'_>> = ground_truth_words
            .iter()
            .map(|word| AlignToken::new(&word.text, word.bbox.as_ref()))
            .collect();
        let pairs = WordAligner::from_config(&config).align(&ocr_tokens, &gt_tokens);

        let words = pairs
            .iter()
            .map(|pair| {
                let gt_text = pair
                    .ground_truth
                    .map_or("", |index| ground_truth_words[index].text.as_str());
                match pair.ocr {
                    Some(index) => {
                        let ocr = &ocr_words[index];
                        Word::new(ocr.text.as_str(), gt_text, Some(ocr.bbox))
                    }
                    None => Word::ground_truth_only(gt_text),
                }
            })
            .collect();

        Self::new(words, extent, config)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    /// Returns the word at `index`.
    pub fn word(&self, index: usize) -> EditResult<&Word> {
        self.words
            .get(index)
            .ok_or_else(|| EditError::index_out_of_range(index, self.words.len()))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn extent(&self) -> &BoundingBox {
        &self.extent
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// `Exact` when every word is an exact match, `Mismatch` otherwise.
    ///
    /// A line without words is `Exact`.
    pub fn status(&self) -> MatchStatus {
        if self.is_exact() {
            MatchStatus::Exact
        } else {
            MatchStatus::Mismatch
        }
    }

    pub fn is_exact(&self) -> bool {
        self.words.iter().all(|word| word.status().is_exact())
    }

    /// True when the line has words and the operator validated all of them.
    pub fn is_validated(&self) -> bool {
        !self.words.is_empty() && self.words.iter().all(Word::is_validated)
    }

    /// OCR text of the line, words separated by single spaces.
    pub fn ocr_text(&self) -> String {
        join_non_empty(self.words.iter().map(Word::ocr_text))
    }

    /// Ground truth of the line, words separated by single spaces.
    pub fn ground_truth_text(&self) -> String {
        join_non_empty(self.words.iter().map(Word::ground_truth_text))
    }

    /// Splits one word into two at a horizontal box position.
    ///
    /// # Arguments
    ///
    /// * `index` - The word to split; it must have a box.
    /// * `position` - Where to cut the box.
    /// * `char_index` - Where to cut the OCR text, in characters. When `None`
    ///   the cut follows the box position proportionally.
    ///
    /// The ground truth is cut at the whitespace boundary nearest the OCR cut
    /// when it holds several tokens. A single token stays whole on the side
    /// that received more OCR characters.
    pub fn split_word(
        &mut self,
        index: usize,
        position: SplitPosition,
        char_index: Option<usize>,
    ) -> EditResult<()> {
        let word = self.word(index)?;
        let bbox = self.boxed(index)?;
        let (left_box, right_box) = bbox.split(position, Axis::Horizontal)?;

        let ocr_text = word.ocr_text();
        let char_count = ocr_text.chars().count();
        if char_count < 2 {
            return Err(EditError::invalid_split(format!(
                "OCR text {ocr_text:?} has fewer than two characters"
            )));
        }
        let cut = match char_index {
            Some(cut) => cut,
            None => {
                let fraction = f64::from(left_box.width()) / f64::from(bbox.width());
                ((fraction * char_count as f64).round() as usize).clamp(1, char_count - 1)
            }
        };
        if cut == 0 || cut >= char_count {
            return Err(EditError::invalid_split(format!(
                "character index {cut} leaves one side of {ocr_text:?} empty"
            )));
        }
        let byte_cut = ocr_text
            .char_indices()
            .nth(cut)
            .map_or(ocr_text.len(), |(offset, _)| offset);
        let (ocr_left, ocr_right) = ocr_text.split_at(byte_cut);

        let (gt_left, gt_right) = split_ground_truth(
            word.ground_truth_text(),
            cut as f64 / char_count as f64,
            cut * 2 >= char_count,
        );

        let left = Word::new(ocr_left, gt_left, Some(left_box));
        let right = Word::new(ocr_right, gt_right, Some(right_box));
        tracing::debug!(
            "Split word {} into {:?} | {:?}",
            index,
            left.ocr_text(),
            right.ocr_text()
        );
        self.words.splice(index..=index, [left, right]);
        Ok(())
    }

    /// Merges a word with its left or right neighbor.
    ///
    /// OCR fragments are concatenated as they are; ground-truth texts are
    /// joined with a single space. The merged word is not validated.
    pub fn merge_words(&mut self, index: usize, direction: MergeDirection) -> EditResult<()> {
        self.word(index)?;
        let (first, second) = match direction {
            MergeDirection::Left if index > 0 => (index - 1, index),
            MergeDirection::Right if index + 1 < self.words.len() => (index, index + 1),
            _ => return Err(EditError::NoNeighbor { index }),
        };

        let (a, b) = (&self.words[first], &self.words[second]);
        let bbox = match (a.bounding_box(), b.bounding_box()) {
            (Some(left), Some(right)) => {
                Some(left.merge_adjacent(right, self.config.merge_gap_tolerance)?)
            }
            (Some(only), None) | (None, Some(only)) => Some(*only),
            (None, None) => None,
        };
        let ocr_text = format!("{}{}", a.ocr_text(), b.ocr_text());
        let gt_text = join_non_empty([a.ground_truth_text(), b.ground_truth_text()]);

        let merged = Word::new(ocr_text, gt_text, bbox);
        tracing::debug!("Merged words {} and {} into {:?}", first, second, merged.ocr_text());
        self.words.splice(first..=second, [merged]);
        Ok(())
    }

    /// Removes and returns a word.
    pub fn delete_word(&mut self, index: usize) -> EditResult<Word> {
        self.word(index)?;
        Ok(self.words.remove(index))
    }

    /// Overwrites a word's ground truth with its OCR text.
    pub fn copy_ocr_to_ground_truth(&mut self, index: usize) -> EditResult<()> {
        self.word_mut(index)?.copy_ocr_to_ground_truth();
        Ok(())
    }

    /// Copies OCR text into ground truth for every word whose texts differ.
    ///
    /// # Returns
    ///
    /// The number of words changed.
    pub fn copy_all_ocr_to_ground_truth(&mut self) -> usize {
        self.copy_ocr_to_ground_truth_where(|_| true)
    }

    /// Copies OCR text into ground truth for each word that satisfies
    /// `predicate` and whose texts differ.
    pub fn copy_ocr_to_ground_truth_where<P>(&mut self, predicate: P) -> usize
    where
        P: Fn(&Word) -> bool,
    {
        let mut changed = 0;
        for word in &mut self.words {
            if word.ocr_text() != word.ground_truth_text() && predicate(word) {
                word.copy_ocr_to_ground_truth();
                changed += 1;
            }
        }
        changed
    }

    /// Replaces the ground truth of one word.
    pub fn set_ground_truth_text(&mut self, index: usize, text: impl Into<String>) -> EditResult<()> {
        self.word_mut(index)?.set_ground_truth_text(text);
        Ok(())
    }

    /// Sets the operator sign-off for one word.
    pub fn set_validated(&mut self, index: usize, validated: bool) -> EditResult<()> {
        self.word_mut(index)?.set_validated(validated);
        Ok(())
    }

    /// Sets the operator sign-off for every word.
    ///
    /// # Returns
    ///
    /// The number of words whose flag changed.
    pub fn set_all_validated(&mut self, validated: bool) -> usize {
        self.words
            .iter_mut()
            .map(|word| word.set_validated(validated))
            .filter(|&changed| changed)
            .count()
    }

    /// The region a word's box may occupy: the page extent, narrowed on the
    /// left by the previous boxed word and on the right by the next one.
    pub fn margin_limits(&self, index: usize) -> EditResult<BoundingBox> {
        self.word(index)?;
        let left = self.words[..index]
            .iter()
            .rev()
            .find_map(|word| word.bounding_box())
            .map_or(self.extent.left(), |prev| {
                prev.right().max(self.extent.left())
            });
        let right = self.words[index + 1..]
            .iter()
            .find_map(|word| word.bounding_box())
            .map_or(self.extent.right(), |next| {
                next.left().min(self.extent.right())
            });
        BoundingBox::new(self.extent.top(), left, self.extent.bottom(), right)
    }

    /// Moves the edges of a word's box.
    ///
    /// The result is clamped to [`Line::margin_limits`], so boxes never grow
    /// into their neighbors or off the page.
    ///
    /// # Returns
    ///
    /// The new box, or `EditError::DegenerateBox` when it would collapse.
    pub fn edit_box_margins(&mut self, index: usize, deltas: &MarginDeltas) -> EditResult<BoundingBox> {
        let bbox = self.boxed(index)?;
        let limits = self.margin_limits(index)?;
        let adjusted = bbox.adjust_margins(deltas, &limits)?;
        self.words[index].set_bounding_box(Some(adjusted));
        tracing::debug!("Word {} box {:?} -> {:?}", index, bbox, adjusted);
        Ok(adjusted)
    }

    /// Shrinks a word's box vertically to the content in `mask`.
    ///
    /// # Returns
    ///
    /// The resulting box. When the box holds no content it is left alone and
    /// `EditError::EmptyContent` is returned.
    pub fn crop_box(
        &mut self,
        index: usize,
        mask: &ContentMask,
        edges: CropEdges,
    ) -> EditResult<BoundingBox> {
        let bbox = self.boxed(index)?;
        match crop_to_content(&bbox, mask, edges, self.config.content_threshold) {
            CropOutcome::Cropped(cropped) => {
                self.words[index].set_bounding_box(Some(cropped));
                Ok(cropped)
            }
            CropOutcome::EmptyContent(_) => {
                tracing::debug!("Word {} has no content inside {:?}", index, bbox);
                Err(EditError::EmptyContent)
            }
        }
    }

    /// Crops every boxed word on the line.
    pub fn crop_all(&mut self, mask: &ContentMask, edges: CropEdges) -> CropSummary {
        let threshold = self.config.content_threshold;
        let mut summary = CropSummary::default();
        for word in &mut self.words {
            let Some(bbox) = word.bounding_box().copied() else {
                continue;
            };
            match crop_to_content(&bbox, mask, edges, threshold) {
                CropOutcome::Cropped(cropped) if cropped != bbox => {
                    word.set_bounding_box(Some(cropped));
                    summary.cropped += 1;
                }
                CropOutcome::Cropped(_) => summary.unchanged += 1,
                CropOutcome::EmptyContent(_) => summary.empty += 1,
            }
        }
        tracing::debug!("Cropped line: {:?}", summary);
        summary
    }

    /// Re-aligns the line after the operator changed its words.
    ///
    /// Boxed words are aligned against the line's ground truth split on
    /// whitespace. A rebuilt word keeps its validated flag only when its OCR
    /// text, ground truth, and box all survive unchanged.
    pub fn rematch(&mut self) {
        let boxed: Vec<&Word> = self.words.iter().filter(|word| word.has_box()).collect();
        let ocr_tokens: Vec<AlignToken<'_>> = boxed
            .iter()
            .map(|word| AlignToken::new(word.ocr_text(), word.bounding_box()))
            .collect();
        let gt_tokens: Vec<AlignToken<'_>> = self
            .words
            .iter()
            .flat_map(|word| {
                word.ground_truth_text()
                    .split_whitespace()
                    .map(|token| AlignToken::new(token, word.bounding_box()))
            })
            .collect();
        let pairs = WordAligner::from_config(&self.config).align(&ocr_tokens, &gt_tokens);

        let words = pairs
            .iter()
            .map(|pair| rebuild_word(pair, &boxed, &gt_tokens))
            .collect();
        self.words = words;
        self.warn_on_overlap();
        tracing::debug!("Rematched line: {} words, status {}", self.words.len(), self.status());
    }

    fn word_mut(&mut self, index: usize) -> EditResult<&mut Word> {
        let len = self.words.len();
        self.words
            .get_mut(index)
            .ok_or_else(|| EditError::index_out_of_range(index, len))
    }

    fn boxed(&self, index: usize) -> EditResult<BoundingBox> {
        self.word(index)?
            .bounding_box()
            .copied()
            .ok_or(EditError::MissingBox { index })
    }

    fn warn_on_overlap(&self) {
        let boxes = self.words.iter().filter_map(|word| word.bounding_box());
        if let Some(position) = first_horizontal_overlap(boxes) {
            tracing::warn!("Line has overlapping word boxes after boxed word {}", position);
        }
    }
}

fn rebuild_word(pair: &AlignedPair, boxed: &[&Word], gt_tokens: &[AlignToken<'_>]) -> Word {
    let gt_text = pair.ground_truth.map_or("", |index| gt_tokens[index].text);
    let Some(source) = pair.ocr.map(|index| boxed[index]) else {
        return Word::ground_truth_only(gt_text);
    };
    let mut word = Word::new(source.ocr_text(), gt_text, source.bounding_box().copied());
    if source.is_validated() && source.ground_truth_text() == gt_text {
        word.set_validated(true);
    }
    word
}

/// Joins the non-empty parts with single spaces.
fn join_non_empty<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Cuts ground truth for a word split.
///
/// With several whitespace-separated tokens the cut goes to the token boundary
/// closest to `fraction` of the text. A single token goes whole to the left
/// side when `keep_left` is set, to the right otherwise.
fn split_ground_truth(text: &str, fraction: f64, keep_left: bool) -> (String, String) {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() < 2 {
        let whole = tokens.first().copied().unwrap_or_default().to_string();
        return if keep_left {
            (whole, String::new())
        } else {
            (String::new(), whole)
        };
    }

    let total: usize = tokens.iter().map(|t| t.chars().count()).sum::<usize>() + tokens.len() - 1;
    let mut best = 1;
    let mut best_distance = f64::INFINITY;
    let mut offset = 0;
    for (boundary, token) in tokens.iter().enumerate().take(tokens.len() - 1) {
        offset += token.chars().count() + usize::from(boundary > 0);
        let distance = (offset as f64 / total as f64 - fraction).abs();
        if distance < best_distance {
            best_distance = distance;
            best = boundary + 1;
        }
    }
    (tokens[..best].join(" "), tokens[best..].join(" "))
}
