//! Vocabulary report rows and export

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;

use crate::db::VocabRecord;
use crate::error::Result;

/// One row handed to the document renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub word: String,
    pub definition: String,
    pub page: i64,
    pub source: String,
}

/// Rows ordered by page then word, keeping the first occurrence of each word
pub fn report_rows(records: &[VocabRecord]) -> Vec<ReportRow> {
    let mut sorted: Vec<&VocabRecord> = records.iter().collect();
    sorted.sort_by(|a, b| {
        a.page_number
            .cmp(&b.page_number)
            .then_with(|| a.word.cmp(&b.word))
    });

    let mut seen = HashSet::new();
    sorted
        .into_iter()
        .filter(|r| seen.insert(r.word.as_str()))
        .map(|r| ReportRow {
            word: r.word.clone(),
            definition: r.definition.clone(),
            page: r.page_number,
            source: r.source_tier.clone(),
        })
        .collect()
}

/// Write rows as pretty-printed JSON
pub fn export_json(rows: &[ReportRow], output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(output, json)?;

    tracing::info!(rows = rows.len(), output = %output.display(), "Report exported");
    Ok(())
}
