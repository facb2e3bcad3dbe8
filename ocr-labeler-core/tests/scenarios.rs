//! End-to-end operator scenarios against the public API.

use ocr_labeler_core::prelude::*;

fn bbox(left: u32, right: u32) -> BoundingBox {
    BoundingBox::new(10, left, 40, right).unwrap()
}

fn the_cat_page() -> Page {
    let input = PageInput {
        image: PageImage::new("scan_0001", 400, 60),
        lines: vec![LineInput::new(
            vec![
                OcrWord::new("Th", bbox(10, 30)),
                OcrWord::new("e", bbox(31, 40)),
                OcrWord::new("cat", bbox(50, 80)),
            ],
            GroundTruthWord::from_line_text("The cat"),
        )],
    };
    Page::from_input(input, EngineConfig::default()).unwrap()
}

#[test]
fn test_fragment_merge_scenario() {
    let mut page = the_cat_page();
    let line = page.line(0).unwrap();
    let statuses: Vec<MatchStatus> = line.words().iter().map(Word::status).collect();
    assert_eq!(
        statuses,
        vec![MatchStatus::Mismatch, MatchStatus::OcrOnly, MatchStatus::Exact]
    );
    assert_eq!(page.filter_lines(LineFilterMode::MismatchOnly).count(), 1);

    page.editor_mut(0)
        .unwrap()
        .line_mut()
        .unwrap()
        .merge_words(0, MergeDirection::Right)
        .unwrap();

    let line = page.line(0).unwrap();
    assert_eq!(line.words()[0].ocr_text(), "The");
    assert_eq!(line.words()[0].ground_truth_text(), "The");
    assert_eq!(line.status(), MatchStatus::Exact);
    assert_eq!(page.filter_lines(LineFilterMode::MismatchOnly).count(), 0);

    assert_eq!(page.mark_exact_matches_validated(), 1);
    assert_eq!(page.filter_lines(LineFilterMode::UnvalidatedMismatchOnly).count(), 0);
}

#[test]
fn test_degenerate_margin_scenario() {
    let mut page = the_cat_page();
    let editor = page.editor_mut(0).unwrap();
    editor.begin_box_edit(1).unwrap();
    editor.nudge_margin(Edge::Left, -9).unwrap();

    assert!(matches!(
        editor.commit(),
        Err(EditError::DegenerateBox { width: 0, .. })
    ));
    assert_eq!(editor.line().words()[1].bounding_box(), Some(&bbox(31, 40)));
    assert!(editor.task().is_some());
    editor.cancel().unwrap();
}

#[test]
fn test_double_split_scenario() {
    let mut page = the_cat_page();
    let editor = page.editor_mut(0).unwrap();
    editor.begin_split(2).unwrap();
    assert_eq!(
        editor.begin_split(2),
        Err(EditError::TaskAlreadyActive {
            active: TaskKind::Split
        })
    );
}

#[test]
fn test_box_edit_clears_validation() {
    let mut page = the_cat_page();
    page.copy_all_ocr_to_ground_truth(|w| CopyFilter::All.matches(w));
    page.mark_exact_matches_validated();
    assert!(page.line(0).unwrap().is_validated());

    let editor = page.editor_mut(0).unwrap();
    editor.begin_box_edit(2).unwrap();
    editor.nudge_margin(Edge::Bottom, -5).unwrap();
    editor.commit().unwrap();

    let line = editor.line();
    assert!(!line.words()[2].is_validated());
    assert!(line.words()[0].is_validated());
    assert!(!line.is_validated());
}
