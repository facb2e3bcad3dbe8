//! Plain-text line validation report.

use ocr_labeler_core::domain::Page;
use std::fmt;

const PREVIEW_CHARS: usize = 50;

/// One line of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub line_index: usize,
    pub exact: bool,
    pub validated: bool,
    pub ocr_preview: String,
    pub ground_truth_preview: String,
}

/// Match and validation status of every line on a page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub entries: Vec<ReportEntry>,
}

impl ValidationReport {
    pub fn from_page(page: &Page) -> Self {
        let entries = page
            .lines()
            .enumerate()
            .map(|(line_index, line)| ReportEntry {
                line_index,
                exact: line.is_exact(),
                validated: line.is_validated(),
                ocr_preview: preview(&line.ocr_text()),
                ground_truth_preview: preview(&line.ground_truth_text()),
            })
            .collect();
        Self { entries }
    }
}

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Line Validation Report")?;
        writeln!(f, "{}", "=".repeat(50))?;
        for entry in &self.entries {
            let status = if entry.exact { "EXACT_MATCH" } else { "MISMATCH" };
            let suffix = if entry.validated { " (VALIDATED)" } else { "" };
            writeln!(f, "Line {}: {}{}", entry.line_index, status, suffix)?;
            writeln!(f, "  OCR: {}", entry.ocr_preview)?;
            writeln!(f, "  GT:  {}", entry.ground_truth_preview)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ocr_labeler_core::core::EngineConfig;
    use ocr_labeler_core::domain::{Line, PageImage, Word};
    use ocr_labeler_core::processors::BoundingBox;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "é".repeat(60);
        let cut = preview(&long);
        assert_eq!(cut.chars().count(), PREVIEW_CHARS + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_report_text() {
        let extent = BoundingBox::from_extent(100, 20).unwrap();
        let bbox = BoundingBox::new(0, 0, 10, 10).unwrap();
        let mut exact = Line::new(vec![Word::new("ok", "ok", Some(bbox))], extent, EngineConfig::default());
        exact.set_all_validated(true);
        let mismatch = Line::new(vec![Word::new("rn", "m", Some(bbox))], extent, EngineConfig::default());
        let page = ocr_labeler_core::domain::Page::new(
            PageImage::new("p", 100, 20),
            vec![exact, mismatch],
            EngineConfig::default(),
        );

        let text = ValidationReport::from_page(&page).to_string();
        assert!(text.contains("Line 0: EXACT_MATCH (VALIDATED)"));
        assert!(text.contains("Line 1: MISMATCH\n"));
        assert!(text.contains("  GT:  m\n"));
    }
}
