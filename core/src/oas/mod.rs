#![deny(missing_docs)]

//! # OpenAPI Loading Module
//!
//! - **models**: Typed operations read from the document.
//! - **document**: JSON parsing and validation into `SpecDocument`.
//! - **ref_utils**: Local `$ref` dereferencing with cycle detection.

pub mod document;
pub mod models;
pub mod ref_utils;

pub use document::{load_spec_document, parse_spec_document};
pub use models::{
    HttpMethod, ParamDescriptor, ParamLocation, PathOperation, PropertySchema, RequestBodySchema,
    SpecDocument,
};
