#![deny(missing_docs)]

//! # Annotation Models
//!
//! Data extracted from `BEGIN`/`END` documentation blocks in handler sources.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Response-envelope fields present in every `json_output` table, in order.
///
/// Tuple layout: (field name, type, description).
pub const ENVELOPE_FIELDS: [(&str, &str, &str); 2] = [
    (
        "wrench_api_request_success",
        "bool",
        "true if the request succeeded, false otherwise",
    ),
    (
        "failure_cause",
        "string",
        "human-readable description of the failure (only set when the request failed)",
    ),
];

/// One row of a documentation field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    /// Declared type, e.g. `string`, `[string]`, `int`.
    pub field_type: String,
    /// Free-text description.
    pub description: String,
}

/// Field name -> entry, in declaration order.
pub type FieldTable = IndexMap<String, FieldEntry>;

/// Where a block was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Source file.
    pub file: PathBuf,
    /// Line of the begin sentinel (1-based).
    pub begin_line: usize,
    /// Line of the end sentinel (1-based).
    pub end_line: usize,
}

/// A validated documentation block and the method it documents.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationBlock {
    /// `Type::method` of the definition following the block.
    pub qualified_name: String,
    /// The method part of `qualified_name`.
    pub method_name: String,
    /// `REST_func` declared in the payload, if any.
    pub rest_func: Option<String>,
    /// `purpose` string, if any.
    pub purpose: Option<String>,
    /// `json_input` table, if declared.
    pub json_input: Option<FieldTable>,
    /// `json_output` table; always present and starting with [`ENVELOPE_FIELDS`].
    pub json_output: FieldTable,
    /// Raw JSON payload as written.
    pub raw: serde_json::Value,
    /// Source location for diagnostics.
    pub location: SourceLocation,
}

impl AnnotationBlock {
    /// The operation this block documents: `REST_func` when declared,
    /// otherwise the method name.
    pub fn operation_name(&self) -> &str {
        self.rest_func.as_deref().unwrap_or(&self.method_name)
    }
}

/// Sentinels and comment conventions used to find blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationSyntax {
    /// Marker opening a block.
    pub begin_marker: String,
    /// Marker closing a block.
    pub end_marker: String,
    /// Per-line comment leaders stripped from block lines.
    pub comment_leaders: Vec<String>,
}

impl Default for AnnotationSyntax {
    fn default() -> Self {
        Self {
            begin_marker: "BEGIN_REST_API_DOCUMENTATION".into(),
            end_marker: "END_REST_API_DOCUMENTATION".into(),
            comment_leaders: vec![
                "///".into(),
                "//".into(),
                "/*".into(),
                "*".into(),
                "#".into(),
            ],
        }
    }
}

impl AnnotationSyntax {
    /// Leaders ordered longest first so `///` wins over `//`.
    pub(crate) fn leaders_longest_first(&self) -> Vec<&str> {
        let mut leaders: Vec<&str> = self.comment_leaders.iter().map(String::as_str).collect();
        leaders.sort_by(|a, b| b.len().cmp(&a.len()));
        leaders
    }
}
