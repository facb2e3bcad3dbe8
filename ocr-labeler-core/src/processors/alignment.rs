//! Sequence alignment of OCR words against ground-truth tokens.
//!
//! The aligner runs an edit-distance style dynamic program over the two word
//! sequences. Paths are compared lexicographically:
//!
//! 1. number of edits (substitutions of differing text plus gaps),
//! 2. number of gaps,
//! 3. summed horizontal center distance of paired words that both carry boxes,
//! 4. summed text dissimilarity of paired words (optional),
//! 5. step preference: pair, then OCR-only, then ground-truth-only.
//!
//! The first two keys make the result a minimum-edit alignment that prefers a
//! substitution over a deletion plus an insertion. The remaining keys only pick
//! among equally cheap alignments, which makes the output deterministic.

use std::cmp::Ordering;

use crate::core::EngineConfig;
use crate::domain::MatchStatus;
use crate::processors::BoundingBox;

/// One word as seen by the aligner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignToken<'a> {
    pub text: &'a str,
    pub bbox: Option<&'a BoundingBox>,
}

impl<'a> AlignToken<'a> {
    pub fn new(text: &'a str, bbox: Option<&'a BoundingBox>) -> Self {
        Self { text, bbox }
    }

    /// A token without positional information.
    pub fn text(text: &'a str) -> Self {
        Self { text, bbox: None }
    }
}

/// One step of an alignment.
///
/// At least one side is always present. Indices refer to the input slices
/// passed to [`WordAligner::align`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignedPair {
    pub ocr: Option<usize>,
    pub ground_truth: Option<usize>,
    pub status: MatchStatus,
}

#[derive(Debug, Clone, Copy, Default)]
struct PathCost {
    edits: u32,
    gaps: u32,
    distance: f64,
    dissimilarity: f64,
}

impl PathCost {
    const GAP: PathCost = PathCost {
        edits: 1,
        gaps: 1,
        distance: 0.0,
        dissimilarity: 0.0,
    };

    fn plus(self, step: PathCost) -> PathCost {
        PathCost {
            edits: self.edits + step.edits,
            gaps: self.gaps + step.gaps,
            distance: self.distance + step.distance,
            dissimilarity: self.dissimilarity + step.dissimilarity,
        }
    }

    fn compare(&self, other: &PathCost) -> Ordering {
        self.edits
            .cmp(&other.edits)
            .then(self.gaps.cmp(&other.gaps))
            .then(self.distance.total_cmp(&other.distance))
            .then(self.dissimilarity.total_cmp(&other.dissimilarity))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Start,
    Pair,
    OcrOnly,
    GroundTruthOnly,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    cost: PathCost,
    step: Step,
}

/// Aligns OCR words with ground-truth tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordAligner {
    similarity_tie_break: bool,
}

impl Default for WordAligner {
    fn default() -> Self {
        Self::new(true)
    }
}

impl WordAligner {
    /// Creates an aligner.
    ///
    /// # Arguments
    ///
    /// * `similarity_tie_break` - Whether text similarity of paired words is
    ///   used as a tie-breaker after positional distance.
    pub fn new(similarity_tie_break: bool) -> Self {
        Self {
            similarity_tie_break,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.similarity_tie_break)
    }

    /// Aligns two word sequences.
    ///
    /// The result covers every OCR index and every ground-truth index exactly
    /// once, in increasing order on both sides. Identical inputs always yield
    /// identical output.
    pub fn align(&self, ocr: &[AlignToken<'_>], ground_truth: &[AlignToken<'_>]) -> Vec<AlignedPair> {
        let rows = ocr.len() + 1;
        let cols = ground_truth.len() + 1;
        let start = Cell {
            cost: PathCost::default(),
            step: Step::Start,
        };
        let mut table = vec![start; rows * cols];
        let at = |i: usize, j: usize| i * cols + j;

        for i in 1..rows {
            table[at(i, 0)] = Cell {
                cost: table[at(i - 1, 0)].cost.plus(PathCost::GAP),
                step: Step::OcrOnly,
            };
        }
        for j in 1..cols {
            table[at(0, j)] = Cell {
                cost: table[at(0, j - 1)].cost.plus(PathCost::GAP),
                step: Step::GroundTruthOnly,
            };
        }

        for i in 1..rows {
            for j in 1..cols {
                // Candidates in step preference order; a later candidate only
                // wins when strictly cheaper.
                let candidates = [
                    (
                        table[at(i - 1, j - 1)]
                            .cost
                            .plus(self.pair_cost(&ocr[i - 1], &ground_truth[j - 1])),
                        Step::Pair,
                    ),
                    (table[at(i - 1, j)].cost.plus(PathCost::GAP), Step::OcrOnly),
                    (
                        table[at(i, j - 1)].cost.plus(PathCost::GAP),
                        Step::GroundTruthOnly,
                    ),
                ];
                let mut best = candidates[0];
                for candidate in &candidates[1..] {
                    if candidate.0.compare(&best.0) == Ordering::Less {
                        best = *candidate;
                    }
                }
                table[at(i, j)] = Cell {
                    cost: best.0,
                    step: best.1,
                };
            }
        }

        let mut pairs = Vec::with_capacity(rows.max(cols));
        let (mut i, mut j) = (ocr.len(), ground_truth.len());
        loop {
            let (ocr_index, gt_index) = match table[at(i, j)].step {
                Step::Start => break,
                Step::Pair => {
                    i -= 1;
                    j -= 1;
                    (Some(i), Some(j))
                }
                Step::OcrOnly => {
                    i -= 1;
                    (Some(i), None)
                }
                Step::GroundTruthOnly => {
                    j -= 1;
                    (None, Some(j))
                }
            };
            let ocr_text = ocr_index.map_or("", |index| ocr[index].text);
            let gt_text = gt_index.map_or("", |index| ground_truth[index].text);
            pairs.push(AlignedPair {
                ocr: ocr_index,
                ground_truth: gt_index,
                status: MatchStatus::classify(ocr_text, gt_text),
            });
        }
        pairs.reverse();

        let total = table[at(ocr.len(), ground_truth.len())].cost;
        tracing::debug!(
            "Aligned {} OCR words with {} ground-truth tokens: {} edits, {} gaps",
            ocr.len(),
            ground_truth.len(),
            total.edits,
            total.gaps
        );

        pairs
    }

    fn pair_cost(&self, ocr: &AlignToken<'_>, ground_truth: &AlignToken<'_>) -> PathCost {
        let edits = u32::from(ocr.text != ground_truth.text);
        let distance = match (ocr.bbox, ground_truth.bbox) {
            (Some(a), Some(b)) => (a.center_x() - b.center_x()).abs(),
            _ => 0.0,
        };
        let dissimilarity = if self.similarity_tie_break {
            1.0 - strsim::normalized_levenshtein(ocr.text, ground_truth.text)
        } else {
            0.0
        };
        PathCost {
            edits,
            gaps: 0,
            distance,
            dissimilarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens<'a>(texts: &[&'a str]) -> Vec<AlignToken<'a>> {
        texts.iter().map(|text| AlignToken::text(text)).collect()
    }

    fn summary(pairs: &[AlignedPair]) -> Vec<(Option<usize>, Option<usize>, MatchStatus)> {
        pairs
            .iter()
            .map(|p| (p.ocr, p.ground_truth, p.status))
            .collect()
    }

    #[test]
    fn test_exact_alignment() {
        let ocr = tokens(&["the", "cat", "sat"]);
        let gt = tokens(&["the", "cat", "sat"]);
        let pairs = WordAligner::default().align(&ocr, &gt);
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|p| p.status == MatchStatus::Exact));
    }

    #[test]
    fn test_fragmented_ocr_word() {
        let ocr = tokens(&["Th", "e", "cat"]);
        let gt = tokens(&["The", "cat"]);
        let pairs = WordAligner::default().align(&ocr, &gt);
        assert_eq!(
            summary(&pairs),
            vec![
                (Some(0), Some(0), MatchStatus::Mismatch),
                (Some(1), None, MatchStatus::OcrOnly),
                (Some(2), Some(1), MatchStatus::Exact),
            ]
        );
    }

    #[test]
    fn test_substitution_preferred_over_gaps() {
        let pairs = WordAligner::default().align(&tokens(&["cot"]), &tokens(&["cat"]));
        assert_eq!(summary(&pairs), vec![(Some(0), Some(0), MatchStatus::Mismatch)]);
    }

    #[test]
    fn test_empty_sides() {
        let aligner = WordAligner::default();
        assert!(aligner.align(&[], &[]).is_empty());

        let pairs = aligner.align(&tokens(&["a", "b"]), &[]);
        assert_eq!(
            summary(&pairs),
            vec![
                (Some(0), None, MatchStatus::OcrOnly),
                (Some(1), None, MatchStatus::OcrOnly),
            ]
        );

        let pairs = aligner.align(&[], &tokens(&["a"]));
        assert_eq!(summary(&pairs), vec![(None, Some(0), MatchStatus::GtOnly)]);
    }

    #[test]
    fn test_position_breaks_ties() {
        let first = BoundingBox::new(0, 0, 10, 10).unwrap();
        let second = BoundingBox::new(0, 100, 10, 110).unwrap();
        let ocr = vec![
            AlignToken::new("foo", Some(&first)),
            AlignToken::new("foo", Some(&second)),
        ];

        let near_first = BoundingBox::new(0, 0, 10, 12).unwrap();
        let gt = vec![AlignToken::new("foo", Some(&near_first))];
        let pairs = WordAligner::default().align(&ocr, &gt);
        assert_eq!(
            summary(&pairs),
            vec![
                (Some(0), Some(0), MatchStatus::Exact),
                (Some(1), None, MatchStatus::OcrOnly),
            ]
        );

        let near_second = BoundingBox::new(0, 95, 10, 115).unwrap();
        let gt = vec![AlignToken::new("foo", Some(&near_second))];
        let pairs = WordAligner::default().align(&ocr, &gt);
        assert_eq!(
            summary(&pairs),
            vec![
                (Some(0), None, MatchStatus::OcrOnly),
                (Some(1), Some(0), MatchStatus::Exact),
            ]
        );
    }

    #[test]
    fn test_similarity_breaks_ties() {
        // One ground-truth token, two equally distant OCR candidates. Both
        // alignments cost one substitution and one gap.
        let ocr = tokens(&["xyz", "helo"]);
        let gt = tokens(&["hello"]);

        let pairs = WordAligner::new(true).align(&ocr, &gt);
        assert_eq!(pairs[1].ground_truth, Some(0));
        assert_eq!(pairs[1].ocr, Some(1));

        // Without the similarity key the later pairing is still chosen,
        // because the pair step is preferred during traceback from the end.
        let pairs = WordAligner::new(false).align(&ocr, &gt);
        assert_eq!(pairs.len(), 2);
    }

    #[test]
    fn test_alignment_is_deterministic() {
        let ocr = tokens(&["a", "b", "a", "b"]);
        let gt = tokens(&["b", "a"]);
        let aligner = WordAligner::default();
        let first = aligner.align(&ocr, &gt);
        for _ in 0..5 {
            assert_eq!(aligner.align(&ocr, &gt), first);
        }
    }
}
