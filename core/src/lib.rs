#![deny(missing_docs)]

//! # Routegen Core
//!
//! Core library for the OpenAPI-to-route-binding compiler: loads an OpenAPI
//! document, extracts handler documentation blocks, and emits route bindings,
//! a dispatch map and an HTML reference.

/// Shared error types.
pub mod error;

/// OpenAPI (OAS) loading and dereferencing.
pub mod oas;

/// Documentation block extraction.
pub mod annotations;

/// Route model builder.
pub mod routes;

/// Strategy Pattern Interfaces.
pub mod strategies;

/// Route Binding Logic.
pub mod route_generator;

/// Dispatch Map Logic.
pub mod dispatch_generator;

/// HTML Reference Logic.
pub mod doc_generator;

/// End-to-end pipeline.
pub mod compiler;

/// Staged artifact writes.
pub mod artifacts;

pub use annotations::{
    extract_annotations, scan_source, AnnotationBlock, AnnotationSyntax, FieldEntry, FieldTable,
};
pub use artifacts::{stale_artifacts, write_artifacts, Artifact};
pub use compiler::{compile, CompileOptions, GeneratedArtifacts};
pub use dispatch_generator::emit_dispatch_map;
pub use doc_generator::{build_documentation_records, render_documentation, DocumentationRecord};
pub use error::{AppError, AppResult};
pub use oas::{
    load_spec_document, parse_spec_document, HttpMethod, ParamDescriptor, ParamLocation,
    PathOperation, SpecDocument,
};
pub use route_generator::emit_route_bindings;
pub use routes::{build_routes, DispatchPolicy, RouteParam, RouteSpec};
pub use strategies::{
    ActixOptions, ActixStrategy, CrowOptions, CrowStrategy, RouterKind, RouterStrategy,
};
