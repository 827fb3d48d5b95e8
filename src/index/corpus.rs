//! Loading documents handed over by the document repository.
//!
//! A corpus file is either a JSON array of documents or JSON Lines, one
//! document per line.

use crate::index::types::SourceDocument;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read every document from a corpus file
pub fn load_corpus(path: &Path) -> Result<Vec<SourceDocument>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus: {}", path.display()))?;
    let documents =
        parse_corpus(&raw).with_context(|| format!("Failed to parse corpus: {}", path.display()))?;
    debug!(documents = documents.len(), path = %path.display(), "loaded corpus");
    Ok(documents)
}

/// Parse corpus text; a leading `[` selects the JSON array form
pub fn parse_corpus(raw: &str) -> Result<Vec<SourceDocument>> {
    if raw.trim_start().starts_with('[') {
        return serde_json::from_str(raw).context("Invalid JSON document array");
    }

    raw.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str::<SourceDocument>(line)
                .with_context(|| format!("Invalid document on line {}", i + 1))
        })
        .collect()
}
