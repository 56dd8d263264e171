//! Knowledge file I/O.
//!
//! The serving path calls [`load`] once at startup. [`save`] and
//! [`import_past_papers`] exist for the offline import command; nothing that
//! answers questions ever writes the store.
//!
//! Import rewrites only the `past_papers` region. Every other byte of meaning
//! in the target document (unmodelled fields, explicit nulls, key order) is
//! carried through as raw JSON.

use examiner_core::KnowledgeError;
use examiner_core::knowledge::{KnowledgeStore, PastPapers, merge_past_papers, paper_entries};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, info};

/// Load the knowledge store. A missing file yields an empty store.
pub fn load(path: &Path) -> Result<KnowledgeStore, KnowledgeError> {
    if !path.exists() {
        info!(
            path = %path.display(),
            "No knowledge file found, serving without retrieval context"
        );
        return Ok(KnowledgeStore::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let store: KnowledgeStore =
        serde_json::from_str(&content).map_err(|e| KnowledgeError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let stats = store.stats();
    info!(
        path = %path.display(),
        topics = stats.topics,
        syllabus_items = stats.syllabus_items,
        past_paper_entries = stats.past_paper_entries,
        "Knowledge store loaded"
    );

    Ok(store)
}

/// Write a knowledge document as pretty JSON, creating parent directories.
pub fn save<T: Serialize + ?Sized>(document: &T, path: &Path) -> Result<(), KnowledgeError> {
    let write_err = |reason: String| KnowledgeError::Write {
        path: path.to_path_buf(),
        reason,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
    }

    let json = serde_json::to_string_pretty(document).map_err(|e| write_err(e.to_string()))?;
    std::fs::write(path, json).map_err(|e| write_err(e.to_string()))?;

    debug!(path = %path.display(), "Knowledge store written");
    Ok(())
}

/// Read a past-papers document produced by the data pipeline.
///
/// Accepts either a whole knowledge document (its `past_papers` region is
/// used) or a bare `year -> season -> paper` mapping.
pub fn load_past_papers(path: &Path) -> Result<PastPapers, KnowledgeError> {
    let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let parse_err = |e: serde_json::Error| KnowledgeError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let mut value: serde_json::Value = serde_json::from_str(&content).map_err(parse_err)?;
    let papers = match value.get_mut("past_papers").map(serde_json::Value::take) {
        Some(inner) => inner,
        None => value,
    };
    serde_json::from_value(papers).map_err(parse_err)
}

/// Read the target knowledge file as an untyped JSON object.
/// A missing file is an empty document.
fn read_document(path: &Path) -> Result<Map<String, Value>, KnowledgeError> {
    if !path.exists() {
        return Ok(Map::new());
    }

    let content = std::fs::read_to_string(path).map_err(|e| KnowledgeError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match serde_json::from_str(&content) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(_) => Err(KnowledgeError::Parse {
            path: path.to_path_buf(),
            reason: "knowledge document must be a JSON object".into(),
        }),
        Err(e) => Err(KnowledgeError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
    }
}

/// Merge the past papers at `source` into the knowledge file at `target`.
///
/// Returns the number of mark-scheme entries merged.
pub fn import_past_papers(source: &Path, target: &Path) -> Result<usize, KnowledgeError> {
    let incoming = load_past_papers(source)?;
    let mut document = read_document(target)?;

    let slot = document
        .entry("past_papers")
        .or_insert(Value::Object(Map::new()));
    let mut papers: PastPapers = match slot.take() {
        Value::Null => PastPapers::default(),
        existing => serde_json::from_value(existing).map_err(|e| KnowledgeError::Parse {
            path: target.to_path_buf(),
            reason: e.to_string(),
        })?,
    };

    let merged = merge_past_papers(&mut papers, incoming);
    let total = paper_entries(&papers).count();
    *slot = serde_json::to_value(&papers).map_err(|e| KnowledgeError::Write {
        path: target.to_path_buf(),
        reason: e.to_string(),
    })?;

    save(&document, target)?;

    info!(
        source = %source.display(),
        target = %target.display(),
        merged,
        total,
        "Past papers imported"
    );
    Ok(merged)
}
