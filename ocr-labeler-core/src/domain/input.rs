//! Typed page input handed over by the OCR and ground-truth collaborators.

use serde::{Deserialize, Serialize};

use crate::domain::PageImage;
use crate::processors::BoundingBox;

/// A word detected by the OCR model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrWord {
    pub text: String,
    pub bbox: BoundingBox,
}

impl OcrWord {
    pub fn new(text: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            bbox,
        }
    }
}

/// A word of the trusted transcription.
///
/// The box is optional: most ground-truth sources carry text only. When
/// present it is used as a positional hint during alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthWord {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BoundingBox>,
}

impl GroundTruthWord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bbox: None,
        }
    }

    /// Splits a plain line of ground truth into box-less words.
    pub fn from_line_text(text: &str) -> Vec<Self> {
        text.split_whitespace().map(Self::new).collect()
    }
}

/// OCR and ground-truth words for one line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineInput {
    #[serde(default)]
    pub ocr_words: Vec<OcrWord>,
    #[serde(default)]
    pub ground_truth_words: Vec<GroundTruthWord>,
}

impl LineInput {
    pub fn new(ocr_words: Vec<OcrWord>, ground_truth_words: Vec<GroundTruthWord>) -> Self {
        Self {
            ocr_words,
            ground_truth_words,
        }
    }
}

/// Everything needed to build a [`crate::domain::Page`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    pub image: PageImage,
    #[serde(default)]
    pub lines: Vec<LineInput>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line_text() {
        let words = GroundTruthWord::from_line_text("  The quick\tfox ");
        let texts: Vec<&str> = words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "quick", "fox"]);
        assert!(words.iter().all(|w| w.bbox.is_none()));
    }

    #[test]
    fn test_deserialize_page_input() {
        let json = r#"{
            "image": { "id": "page_001", "width": 200, "height": 50 },
            "lines": [
                {
                    "ocr_words": [
                        { "text": "Th", "bbox": { "top": 5, "left": 10, "bottom": 25, "right": 30 } }
                    ],
                    "ground_truth_words": [ { "text": "The" } ]
                },
                {}
            ]
        }"#;
        let input: PageInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.image.id, "page_001");
        assert_eq!(input.lines.len(), 2);
        assert_eq!(input.lines[0].ocr_words[0].bbox.width(), 20);
        assert!(input.lines[1].ocr_words.is_empty());
    }

    #[test]
    fn test_deserialize_rejects_inverted_box() {
        let json = r#"{ "text": "x", "bbox": { "top": 5, "left": 30, "bottom": 25, "right": 10 } }"#;
        assert!(serde_json::from_str::<OcrWord>(json).is_err());
    }
}
