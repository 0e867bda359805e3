#![deny(missing_docs)]

//! # Compiler
//!
//! End-to-end pipeline from a loaded document and extracted annotations to
//! the three generated texts. Nothing is written here; a failure at any
//! stage returns before any artifact exists.

use crate::annotations::AnnotationBlock;
use crate::dispatch_generator::emit_dispatch_map;
use crate::doc_generator::{build_documentation_records, render_documentation};
use crate::error::AppResult;
use crate::oas::SpecDocument;
use crate::route_generator::emit_route_bindings;
use crate::routes::{build_routes, DispatchPolicy, RouteSpec};
use crate::strategies::RouterStrategy;

const DEFAULT_TITLE: &str = "REST API Reference";

/// Per-run settings that are not tied to a router.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Operations excluded from the dispatch map.
    pub policy: DispatchPolicy,
    /// Documentation title; defaults to the document's `info.title`.
    pub title: Option<String>,
}

/// Everything a run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifacts {
    /// The route table the texts were rendered from.
    pub routes: Vec<RouteSpec>,
    /// Route binding source.
    pub route_bindings: String,
    /// Dispatch map source.
    pub dispatch_map: String,
    /// HTML API reference.
    pub documentation: String,
}

/// Builds routes, then renders bindings, dispatch map and documentation.
pub fn compile(
    document: &SpecDocument,
    blocks: &[AnnotationBlock],
    options: &CompileOptions,
    strategy: &dyn RouterStrategy,
) -> AppResult<GeneratedArtifacts> {
    let routes = build_routes(&document.operations, &options.policy)?;

    let route_bindings = emit_route_bindings(&routes, strategy);
    let dispatch_map = emit_dispatch_map(&routes, strategy);

    let title = options
        .title
        .as_deref()
        .or(document.title.as_deref())
        .unwrap_or(DEFAULT_TITLE);
    let records = build_documentation_records(&routes, blocks);
    let documentation = render_documentation(&records, title)?;

    tracing::info!(
        router = strategy.name(),
        routes = routes.len(),
        annotations = blocks.len(),
        "compiled artifacts"
    );

    Ok(GeneratedArtifacts {
        routes,
        route_bindings,
        dispatch_map,
        documentation,
    })
}
