//! Export of the final word state.
//!
//! Records are flat, one per word, and serialize to JSON. Writing them into
//! a training-data directory layout is left to the caller.

use ocr_labeler_core::domain::{Page, WordRecord};
use serde::Serialize;
use std::path::Path;

use crate::errors::{LabelerError, LabelerResult};

/// Which words an export includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportScope {
    #[default]
    All,
    /// Only words on lines the operator has fully validated.
    ValidatedLines,
}

/// One exported word.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub image_id: String,
    #[serde(flatten)]
    pub word: WordRecord,
}

/// Collects export records for a page.
pub fn export_records(page: &Page, scope: ExportScope) -> Vec<ExportRecord> {
    let image_id = &page.image().id;
    page.export_words()
        .into_iter()
        .filter(|record| match scope {
            ExportScope::All => true,
            ExportScope::ValidatedLines => page
                .line(record.line_index)
                .is_ok_and(|line| line.is_validated()),
        })
        .map(|word| ExportRecord {
            image_id: image_id.clone(),
            word,
        })
        .collect()
}

/// Serializes records as a pretty-printed JSON array.
pub fn to_json(records: &[ExportRecord]) -> LabelerResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Writes records as JSON to `path`.
pub fn write_json(records: &[ExportRecord], path: &Path) -> LabelerResult<()> {
    let json = to_json(records)?;
    std::fs::write(path, json).map_err(|e| LabelerError::io(path, e))?;
    tracing::info!("Exported {} words to {}", records.len(), path.display());
    Ok(())
}
