//! Property-based tests for the alignment-and-edit engine.
//!
//! These tests verify invariants over generated inputs:
//! - Split followed by merge restores the original word
//! - Alignment is deterministic and covers both sequences in order
//! - Line filters select exactly the documented subsets
//! - Box edits never make neighboring boxes overlap and always clear validation

use ocr_labeler_core::prelude::*;
use ocr_labeler_core::processors::first_horizontal_overlap;
use ocr_labeler_core::processors::AlignToken;
use proptest::prelude::*;

fn page_extent() -> BoundingBox {
    BoundingBox::from_extent(1000, 100).unwrap()
}

fn boxed_line(words: &[(String, String)], width: u32) -> Line {
    let words = words
        .iter()
        .enumerate()
        .map(|(i, (ocr, gt))| {
            let left = i as u32 * (width + 5);
            let bbox = BoundingBox::new(10, left, 40, left + width).unwrap();
            Word::new(ocr.as_str(), gt.as_str(), Some(bbox))
        })
        .collect();
    Line::new(words, page_extent(), EngineConfig::default())
}

// ============================================================================
// Split / Merge Properties
// ============================================================================

/// Property: splitting a word and merging the halves gives the word back
#[test]
fn proptest_split_then_merge_restores_word() {
    proptest!(|(
        ocr in "[a-z]{2,12}",
        gt in "[a-z]{1,5}( [a-z]{1,5}){0,3}",
        left in 0u32..500,
        width in 2u32..200,
        offset_seed in any::<u32>(),
        char_seed in any::<usize>()
    )| {
        let bbox = BoundingBox::new(10, left, 40, left + width).unwrap();
        let mut line = Line::new(
            vec![Word::new(ocr.as_str(), gt.as_str(), Some(bbox))],
            page_extent(),
            EngineConfig::default(),
        );
        let offset = 1 + offset_seed % (width - 1);
        let chars = ocr.chars().count();
        let char_index = 1 + char_seed % (chars - 1);

        line.split_word(0, SplitPosition::Pixel(offset), Some(char_index)).unwrap();
        prop_assert_eq!(line.len(), 2);

        line.merge_words(0, MergeDirection::Right).unwrap();
        prop_assert_eq!(line.len(), 1);
        let word = &line.words()[0];
        prop_assert_eq!(word.ocr_text(), ocr.as_str());
        prop_assert_eq!(word.ground_truth_text(), gt.as_str());
        prop_assert_eq!(word.bounding_box(), Some(&bbox));
    });
}

/// Property: a failed split leaves the line untouched
#[test]
fn proptest_failed_split_is_atomic() {
    proptest!(|(ocr in "[a-z]{2,8}", width in 2u32..50, char_index in 0usize..20)| {
        let bbox = BoundingBox::new(0, 0, 10, width).unwrap();
        let mut line = Line::new(
            vec![Word::new(ocr.as_str(), "", Some(bbox))],
            page_extent(),
            EngineConfig::default(),
        );
        let before = line.clone();
        if line.split_word(0, SplitPosition::Fraction(0.5), Some(char_index)).is_err() {
            prop_assert_eq!(line, before);
        } else {
            prop_assert_eq!(line.len(), 2);
        }
    });
}

// ============================================================================
// Alignment Properties
// ============================================================================

/// Property: alignment is deterministic and covers both sides once, in order
#[test]
fn proptest_alignment_deterministic_and_complete() {
    proptest!(|(
        ocr in prop::collection::vec("[ab]{1,2}", 0..8),
        gt in prop::collection::vec("[ab]{1,2}", 0..8),
        tie_break in any::<bool>()
    )| {
        let ocr_tokens: Vec<AlignToken<'_>> = ocr.iter().map(|t| AlignToken::text(t)).collect();
        let gt_tokens: Vec<AlignToken<'_>> = gt.iter().map(|t| AlignToken::text(t)).collect();
        let aligner = WordAligner::new(tie_break);

        let first = aligner.align(&ocr_tokens, &gt_tokens);
        let second = aligner.align(&ocr_tokens, &gt_tokens);
        prop_assert_eq!(&first, &second);

        let ocr_seen: Vec<usize> = first.iter().filter_map(|p| p.ocr).collect();
        let gt_seen: Vec<usize> = first.iter().filter_map(|p| p.ground_truth).collect();
        prop_assert_eq!(ocr_seen, (0..ocr.len()).collect::<Vec<_>>());
        prop_assert_eq!(gt_seen, (0..gt.len()).collect::<Vec<_>>());
        prop_assert!(first.iter().all(|p| p.ocr.is_some() || p.ground_truth.is_some()));
    });
}

/// Property: identical sequences align as all exact matches
#[test]
fn proptest_identical_sequences_are_exact() {
    proptest!(|(words in prop::collection::vec("[a-z]{1,6}", 1..10))| {
        let tokens: Vec<AlignToken<'_>> = words.iter().map(|t| AlignToken::text(t)).collect();
        let pairs = WordAligner::default().align(&tokens, &tokens);
        prop_assert_eq!(pairs.len(), words.len());
        prop_assert!(pairs.iter().all(|p| p.status == MatchStatus::Exact));
    });
}

// ============================================================================
// Page Filter Properties
// ============================================================================

fn line_strategy() -> impl Strategy<Value = (Vec<(String, String)>, bool)> {
    (
        prop::collection::vec(("[ab]{1,2}", "[ab]{0,2}"), 0..4),
        any::<bool>(),
    )
}

/// Property: the unvalidated-mismatch view is exactly the matching subset of all lines
#[test]
fn proptest_filter_subset_semantics() {
    proptest!(|(specs in prop::collection::vec(line_strategy(), 0..8))| {
        let lines: Vec<Line> = specs
            .iter()
            .map(|(words, validated)| {
                let mut line = boxed_line(words, 20);
                line.set_all_validated(*validated);
                line
            })
            .collect();
        let page = Page::new(PageImage::new("p", 1000, 100), lines, EngineConfig::default());

        let expected: Vec<usize> = page
            .filter_lines(LineFilterMode::All)
            .filter(|(_, line)| line.status() != MatchStatus::Exact && !line.is_validated())
            .map(|(index, _)| index)
            .collect();
        let actual: Vec<usize> = page
            .filter_lines(LineFilterMode::UnvalidatedMismatchOnly)
            .map(|(index, _)| index)
            .collect();
        prop_assert_eq!(actual, expected);

        let mismatches: Vec<usize> = page
            .filter_lines(LineFilterMode::MismatchOnly)
            .map(|(index, _)| index)
            .collect();
        prop_assert_eq!(mismatches.len(), page.statistics().mismatched_lines);
    });
}

/// Property: marking exact lines validated is idempotent and validates every exact line
#[test]
fn proptest_mark_exact_idempotent() {
    proptest!(|(specs in prop::collection::vec(line_strategy(), 0..8))| {
        let lines: Vec<Line> = specs.iter().map(|(words, _)| boxed_line(words, 20)).collect();
        let mut page = Page::new(PageImage::new("p", 1000, 100), lines, EngineConfig::default());

        page.mark_exact_matches_validated();
        prop_assert_eq!(page.mark_exact_matches_validated(), 0);
        for line in page.lines() {
            if line.is_exact() && !line.is_empty() {
                prop_assert!(line.is_validated());
            }
        }
    });
}

// ============================================================================
// Box Edit Properties
// ============================================================================

/// Property: margin edits never overlap neighbors and always clear validation on change
#[test]
fn proptest_margin_edits_keep_boxes_apart() {
    proptest!(|(
        count in 1usize..6,
        index_seed in any::<usize>(),
        top in -50i32..50,
        left in -50i32..50,
        bottom in -50i32..50,
        right in -50i32..50
    )| {
        let words: Vec<(String, String)> = (0..count).map(|_| ("w".to_string(), "w".to_string())).collect();
        let mut line = boxed_line(&words, 20);
        line.set_all_validated(true);
        let index = index_seed % count;
        let before = *line.words()[index].bounding_box().unwrap();

        let deltas = MarginDeltas { top, left, bottom, right };
        match line.edit_box_margins(index, &deltas) {
            Ok(after) => {
                prop_assert!(page_extent().contains(&after));
                if after != before {
                    prop_assert!(!line.words()[index].is_validated());
                }
            }
            Err(err) => {
                let is_degenerate = matches!(err, EditError::DegenerateBox { .. });
                prop_assert!(is_degenerate);
                prop_assert_eq!(line.words()[index].bounding_box(), Some(&before));
            }
        }
        let boxes = line.words().iter().filter_map(|w| w.bounding_box());
        prop_assert_eq!(first_horizontal_overlap(boxes), None);
    });
}
