#![deny(missing_docs)]

//! # Annotation Extraction
//!
//! - **models**: `AnnotationBlock`, field tables and sentinel configuration.
//! - **payload**: JSON payload validation and envelope injection.
//! - **scanner**: Per-file block scanning.
//!
//! Files are processed in the order given; callers are expected to pass a
//! sorted list so output is stable across runs.

pub mod models;
mod payload;
pub mod scanner;

pub use models::{
    AnnotationBlock, AnnotationSyntax, FieldEntry, FieldTable, SourceLocation, ENVELOPE_FIELDS,
};
pub use scanner::scan_source;

use crate::error::{AppError, AppResult};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Extracts every block from `files`, in file order then line order.
///
/// Fails on the first malformed block, and when two blocks document the
/// same operation.
pub fn extract_annotations(
    files: &[PathBuf],
    syntax: &AnnotationSyntax,
) -> AppResult<Vec<AnnotationBlock>> {
    let mut blocks = Vec::new();
    for file in files {
        let source = fs::read_to_string(file)
            .map_err(|e| AppError::General(format!("Failed to read source {:?}: {}", file, e)))?;
        let found = scan_source(&source, file, syntax)?;
        if !found.is_empty() {
            tracing::debug!(file = %file.display(), blocks = found.len(), "scanned source");
        }
        blocks.extend(found);
    }

    ensure_unique_operations(&blocks)?;
    tracing::info!(files = files.len(), blocks = blocks.len(), "extracted annotations");
    Ok(blocks)
}

fn ensure_unique_operations(blocks: &[AnnotationBlock]) -> AppResult<()> {
    let mut seen: HashMap<&str, &AnnotationBlock> = HashMap::new();
    for block in blocks {
        if let Some(first) = seen.insert(block.operation_name(), block) {
            return Err(AppError::AnnotationStructure {
                file: block.location.file.clone(),
                line: block.location.begin_line,
                message: format!(
                    "operation '{}' is already documented at {}:{}",
                    block.operation_name(),
                    first.location.file.display(),
                    first.location.begin_line
                ),
            });
        }
    }
    Ok(())
}
