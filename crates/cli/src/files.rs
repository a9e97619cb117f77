//! Corpus/query loading and report writing for the retrieve command.

use anyhow::Context;
use retriever_core::models::{Document, Query, RankedResult};
use retriever_core::report;
use std::path::Path;

/// Read corpus lines from a file, one document per non-blank line.
pub fn load_corpus(path: &Path) -> anyhow::Result<Vec<Document>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading corpus {}", path.display()))?;
    Ok(Document::from_lines(raw.lines()))
}

pub fn load_query(path: &Path) -> anyhow::Result<Query> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading query {}", path.display()))?;
    Ok(Query::new(&raw))
}

/// Write the JSON payload and the human-readable listing side by side.
pub fn write_outputs(
    result: &RankedResult,
    json_path: &Path,
    text_path: &Path,
) -> anyhow::Result<()> {
    let payload = report::to_json(result);
    std::fs::write(json_path, serde_json::to_string_pretty(&payload)?)
        .with_context(|| format!("writing {}", json_path.display()))?;
    std::fs::write(text_path, report::render_text(result))
        .with_context(|| format!("writing {}", text_path.display()))?;
    Ok(())
}
