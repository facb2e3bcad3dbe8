//! Word-level state: OCR text, ground truth, box, and operator sign-off.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::processors::BoundingBox;

/// How a word's OCR text relates to its ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    /// Both texts are present and identical (case-sensitive).
    Exact,
    /// Both texts are present and differ.
    Mismatch,
    /// No ground truth; the operator must merge or delete the word.
    OcrOnly,
    /// No OCR text; the operator must split a neighbor or insert a word.
    GtOnly,
}

impl MatchStatus {
    /// Classifies a pair of texts.
    ///
    /// A word with neither text counts as `OcrOnly`: there is nothing to
    /// confirm, so it must not read as an exact match.
    pub fn classify(ocr_text: &str, ground_truth_text: &str) -> Self {
        match (ocr_text.is_empty(), ground_truth_text.is_empty()) {
            (_, true) => MatchStatus::OcrOnly,
            (true, false) => MatchStatus::GtOnly,
            (false, false) if ocr_text == ground_truth_text => MatchStatus::Exact,
            (false, false) => MatchStatus::Mismatch,
        }
    }

    #[inline]
    pub fn is_exact(self) -> bool {
        self == MatchStatus::Exact
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Exact => write!(f, "EXACT"),
            MatchStatus::Mismatch => write!(f, "MISMATCH"),
            MatchStatus::OcrOnly => write!(f, "OCR_ONLY"),
            MatchStatus::GtOnly => write!(f, "GT_ONLY"),
        }
    }
}

/// One word on a line.
///
/// A word without a bounding box is a ground-truth placeholder: the ground
/// truth has a token there that no OCR detection covers. Match status and
/// match score are computed from the texts on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    ocr_text: String,
    ground_truth_text: String,
    bounding_box: Option<BoundingBox>,
    validated: bool,
}

impl Word {
    /// Creates an unvalidated word.
    pub fn new(
        ocr_text: impl Into<String>,
        ground_truth_text: impl Into<String>,
        bounding_box: Option<BoundingBox>,
    ) -> Self {
        Self {
            ocr_text: ocr_text.into(),
            ground_truth_text: ground_truth_text.into(),
            bounding_box,
            validated: false,
        }
    }

    /// Creates a detected word that has no ground truth yet.
    pub fn ocr_only(ocr_text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self::new(ocr_text, String::new(), Some(bounding_box))
    }

    /// Creates a box-less placeholder for an unmatched ground-truth token.
    pub fn ground_truth_only(ground_truth_text: impl Into<String>) -> Self {
        Self::new(String::new(), ground_truth_text, None)
    }

    pub fn ocr_text(&self) -> &str {
        &self.ocr_text
    }

    pub fn ground_truth_text(&self) -> &str {
        &self.ground_truth_text
    }

    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref()
    }

    pub fn has_box(&self) -> bool {
        self.bounding_box.is_some()
    }

    pub fn is_validated(&self) -> bool {
        self.validated
    }

    /// The current match status.
    pub fn status(&self) -> MatchStatus {
        MatchStatus::classify(&self.ocr_text, &self.ground_truth_text)
    }

    /// Similarity of OCR text and ground truth on a 0-100 scale.
    pub fn match_score(&self) -> u8 {
        let similarity = strsim::normalized_levenshtein(&self.ocr_text, &self.ground_truth_text);
        (similarity * 100.0).round().clamp(0.0, 100.0) as u8
    }

    pub(crate) fn set_validated(&mut self, validated: bool) -> bool {
        let changed = self.validated != validated;
        self.validated = validated;
        changed
    }

    /// Replaces the ground truth. Returns true if the text changed, in which
    /// case the validated flag is cleared.
    pub(crate) fn set_ground_truth_text(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.ground_truth_text {
            return false;
        }
        self.ground_truth_text = text;
        self.validated = false;
        true
    }

    /// Overwrites the ground truth with the OCR text and clears validated.
    pub(crate) fn copy_ocr_to_ground_truth(&mut self) {
        self.ground_truth_text.clone_from(&self.ocr_text);
        self.validated = false;
    }

    /// Replaces the box. Returns true if it changed, in which case the
    /// validated flag is cleared.
    pub(crate) fn set_bounding_box(&mut self, bbox: Option<BoundingBox>) -> bool {
        if bbox == self.bounding_box {
            return false;
        }
        self.bounding_box = bbox;
        self.validated = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(MatchStatus::classify("cat", "cat"), MatchStatus::Exact);
        assert_eq!(MatchStatus::classify("cat", "Cat"), MatchStatus::Mismatch);
        assert_eq!(MatchStatus::classify("cat", ""), MatchStatus::OcrOnly);
        assert_eq!(MatchStatus::classify("", "cat"), MatchStatus::GtOnly);
        assert_eq!(MatchStatus::classify("", ""), MatchStatus::OcrOnly);
    }

    #[test]
    fn test_status_follows_text() {
        let bbox = BoundingBox::new(0, 0, 10, 10).unwrap();
        let mut word = Word::ocr_only("Tbe", bbox);
        assert_eq!(word.status(), MatchStatus::OcrOnly);

        word.set_ground_truth_text("The");
        assert_eq!(word.status(), MatchStatus::Mismatch);
        assert_eq!(word.match_score(), 67);

        word.copy_ocr_to_ground_truth();
        assert_eq!(word.status(), MatchStatus::Exact);
        assert_eq!(word.match_score(), 100);
    }

    #[test]
    fn test_text_change_clears_validated() {
        let mut word = Word::new("cat", "cat", None);
        word.set_validated(true);

        assert!(!word.set_ground_truth_text("cat"));
        assert!(word.is_validated());

        assert!(word.set_ground_truth_text("cab"));
        assert!(!word.is_validated());
    }

    #[test]
    fn test_box_change_clears_validated() {
        let bbox = BoundingBox::new(0, 0, 10, 10).unwrap();
        let mut word = Word::new("cat", "cat", Some(bbox));
        word.set_validated(true);

        assert!(!word.set_bounding_box(Some(bbox)));
        assert!(word.is_validated());

        let moved = BoundingBox::new(0, 1, 10, 10).unwrap();
        assert!(word.set_bounding_box(Some(moved)));
        assert!(!word.is_validated());
    }

    #[test]
    fn test_status_serializes_screaming_case() {
        let json = serde_json::to_string(&MatchStatus::GtOnly).unwrap();
        assert_eq!(json, "\"GT_ONLY\"");
    }
}
