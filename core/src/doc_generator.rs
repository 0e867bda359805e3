#![deny(missing_docs)]

//! # Documentation Generator
//!
//! Joins the route table with the extracted annotations and renders an HTML
//! API reference through the `reference.html` askama template.
//!
//! Records follow route order. Field rows follow declaration order.

use crate::annotations::{AnnotationBlock, FieldTable};
use crate::error::{AppError, AppResult};
use crate::oas::HttpMethod;
use crate::routes::RouteSpec;
use askama::Template;
use std::collections::{HashMap, HashSet};

/// One route and its documentation, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentationRecord {
    /// Original path template.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// `operationId`.
    pub operation_id: String,
    /// Dispatch key; also the HTML anchor.
    pub dispatch_key: String,
    /// Annotation purpose, falling back to the operation summary.
    pub purpose: Option<String>,
    /// The matching annotation block.
    pub annotation: Option<AnnotationBlock>,
}

impl DocumentationRecord {
    /// `json_input` rows; empty when undocumented.
    pub fn json_input(&self) -> FieldTable {
        self.annotation
            .as_ref()
            .and_then(|block| block.json_input.clone())
            .unwrap_or_default()
    }

    /// `json_output` rows; empty when undocumented.
    pub fn json_output(&self) -> FieldTable {
        self.annotation
            .as_ref()
            .map(|block| block.json_output.clone())
            .unwrap_or_default()
    }
}

/// Pairs every route with the annotation naming its `operationId`.
///
/// Annotations that match no route are reported with `tracing::warn!` and
/// otherwise ignored.
pub fn build_documentation_records(
    routes: &[RouteSpec],
    blocks: &[AnnotationBlock],
) -> Vec<DocumentationRecord> {
    let by_operation: HashMap<&str, &AnnotationBlock> = blocks
        .iter()
        .map(|block| (block.operation_name(), block))
        .collect();

    let operations: HashSet<&str> = routes.iter().map(|r| r.operation_id.as_str()).collect();
    for block in blocks {
        if !operations.contains(block.operation_name()) {
            tracing::warn!(
                operation = block.operation_name(),
                method = %block.qualified_name,
                file = %block.location.file.display(),
                line = block.location.begin_line,
                "annotation does not match any operationId"
            );
        }
    }

    routes
        .iter()
        .map(|route| {
            let annotation = by_operation.get(route.operation_id.as_str()).copied();
            if annotation.is_none() {
                tracing::debug!(operation = %route.operation_id, "route has no annotation");
            }
            DocumentationRecord {
                path: route.path.clone(),
                method: route.method,
                operation_id: route.operation_id.clone(),
                dispatch_key: route.dispatch_key.clone(),
                purpose: annotation
                    .and_then(|block| block.purpose.clone())
                    .or_else(|| route.summary.clone()),
                annotation: annotation.cloned(),
            }
        })
        .collect()
}

struct FieldRow {
    name: String,
    field_type: String,
    description: String,
}

struct RecordView {
    anchor: String,
    method: String,
    path: String,
    has_purpose: bool,
    purpose: String,
    inputs: Vec<FieldRow>,
    outputs: Vec<FieldRow>,
    has_source: bool,
    source: String,
}

#[derive(Template)]
#[template(path = "reference.html")]
struct ReferenceTemplate<'a> {
    title: &'a str,
    records: Vec<RecordView>,
}

/// Renders `records` as a standalone HTML document.
pub fn render_documentation(records: &[DocumentationRecord], title: &str) -> AppResult<String> {
    let template = ReferenceTemplate {
        title,
        records: records.iter().map(record_view).collect(),
    };
    template
        .render()
        .map_err(|e| AppError::General(format!("Failed to render documentation: {}", e)))
}

fn record_view(record: &DocumentationRecord) -> RecordView {
    let source = record
        .annotation
        .as_ref()
        .map(|block| {
            format!(
                "{} ({}:{})",
                block.qualified_name,
                block.location.file.display(),
                block.location.begin_line
            )
        })
        .unwrap_or_default();

    RecordView {
        anchor: record.dispatch_key.clone(),
        method: record.method.to_string(),
        path: record.path.clone(),
        has_purpose: record.purpose.is_some(),
        purpose: record.purpose.clone().unwrap_or_default(),
        inputs: rows(&record.json_input()),
        outputs: rows(&record.json_output()),
        has_source: record.annotation.is_some(),
        source,
    }
}

fn rows(table: &FieldTable) -> Vec<FieldRow> {
    table
        .iter()
        .map(|(name, entry)| FieldRow {
            name: name.clone(),
            field_type: entry.field_type.clone(),
            description: entry.description.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotations::{scan_source, AnnotationSyntax};
    use std::path::Path;

    const SOURCE: &str = r#"
/**
 * BEGIN_REST_API_DOCUMENTATION
 * {
 *   "REST_func": "addHost",
 *   "documentation": {
 *     "purpose": "Add a <compute> host",
 *     "json_input": {
 *       "hostname": ["string", "name of the new host"],
 *       "cores": ["int", "number of cores"],
 *       "speed": ["string", "core speed"],
 *       "disk": ["string", "attached disk"]
 *     },
 *     "json_output": {
 *       "host_id": ["string", "identifier"]
 *     }
 *   }
 * }
 * END_REST_API_DOCUMENTATION
 */
json SimulationController::addHost(json data) {
"#;

    fn blocks() -> Vec<AnnotationBlock> {
        scan_source(SOURCE, Path::new("SimulationController.cpp"), &AnnotationSyntax::default())
            .unwrap()
    }

    fn route(id: &str, path: &str, key: &str, summary: Option<&str>) -> RouteSpec {
        RouteSpec {
            path: path.into(),
            method: HttpMethod::Post,
            pattern: path.into(),
            parameters: vec![],
            request_schema: None,
            dispatch_key: key.into(),
            operation_id: id.into(),
            dispatchable: true,
            summary: summary.map(Into::into),
        }
    }

    #[test]
    fn test_join_by_operation_id() {
        let routes = vec![
            route("addHost", "/simulation/{simid}/addHost", "addHost_0", None),
            route("getTime", "/simulation/{simid}/getTime", "getTime_1", Some("Current time")),
        ];
        let records = build_documentation_records(&routes, &blocks());
        assert_eq!(records.len(), 2);
        assert!(records[0].annotation.is_some());
        assert_eq!(records[0].purpose.as_deref(), Some("Add a <compute> host"));
        assert!(records[1].annotation.is_none());
        assert_eq!(records[1].purpose.as_deref(), Some("Current time"));
        assert!(records[1].json_input().is_empty());
        assert!(records[1].json_output().is_empty());
    }

    #[test]
    fn test_orphan_annotation_is_ignored() {
        let routes = vec![route("getTime", "/t", "t_0", None)];
        let records = build_documentation_records(&routes, &blocks());
        assert_eq!(records.len(), 1);
        assert!(records[0].annotation.is_none());
    }

    #[test]
    fn test_render_preserves_field_order() {
        let routes = vec![route("addHost", "/simulation/{simid}/addHost", "addHost_0", None)];
        let html = render_documentation(&build_documentation_records(&routes, &blocks()), "Daemon")
            .unwrap();

        let positions: Vec<usize> = ["hostname", "cores", "speed", "disk"]
            .iter()
            .map(|field| html.find(&format!("<code>{}</code>", field)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let success = html.find("<code>wrench_api_request_success</code>").unwrap();
        let failure = html.find("<code>failure_cause</code>").unwrap();
        let host_id = html.find("<code>host_id</code>").unwrap();
        assert!(success < failure && failure < host_id);
    }

    #[test]
    fn test_render_escapes_and_marks_empty_tables() {
        let routes = vec![
            route("addHost", "/simulation/{simid}/addHost", "addHost_0", None),
            route("getTime", "/simulation/{simid}/getTime", "getTime_1", None),
        ];
        let html = render_documentation(&build_documentation_records(&routes, &blocks()), "Daemon")
            .unwrap();

        assert!(html.contains("<title>Daemon</title>"));
        // askama spells `<` and `>` as numeric entities
        assert!(html.contains("Add a &#60;compute&#62; host"));
        assert!(!html.contains("<compute>"));
        assert!(html.contains("id=\"getTime_1\""));
        // getTime has neither table
        assert_eq!(html.matches("No fields.").count(), 2);
        assert_eq!(html.matches("class=\"purpose\"").count(), 1);
    }
}
