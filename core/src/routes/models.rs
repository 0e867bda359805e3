#![deny(missing_docs)]

//! # Route Models
//!
//! Canonical, immutable route descriptions consumed by every emitter.

use crate::oas::HttpMethod;
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// A path placeholder and the slot type it binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteParam {
    /// Placeholder name, e.g. `simid`.
    pub name: String,
    /// Resolved slot type, e.g. `string`, `int`, `double`.
    pub slot: String,
}

/// The canonical form of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSpec {
    /// Original template, e.g. `/simulation/{simid}/getTime`.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// Template with typed slots, e.g. `/simulation/<string>/getTime`.
    pub pattern: String,
    /// Placeholders in order of appearance in `pattern`.
    pub parameters: Vec<RouteParam>,
    /// Flattened body (name -> type) for body-bearing methods.
    pub request_schema: Option<IndexMap<String, String>>,
    /// Unique key under which the handler is registered.
    pub dispatch_key: String,
    /// `operationId`; the handler the dispatcher invokes.
    pub operation_id: String,
    /// Whether the route gets an entry in the dispatch map.
    pub dispatchable: bool,
    /// `summary` from the document.
    pub summary: Option<String>,
}

/// Operation ids excluded from the dispatch map.
///
/// Such routes still get a binding; their handler is wired by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchPolicy {
    /// Excluded `operationId`s.
    pub non_dispatchable: BTreeSet<String>,
}

impl DispatchPolicy {
    /// Builds a policy from a list of operation ids.
    pub fn new<I, S>(non_dispatchable: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            non_dispatchable: non_dispatchable.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `operation_id` gets a dispatch entry.
    pub fn is_dispatchable(&self, operation_id: &str) -> bool {
        !self.non_dispatchable.contains(operation_id)
    }
}
