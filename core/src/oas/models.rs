#![deny(missing_docs)]

//! # OpenAPI Models
//!
//! Typed representation of the operations read from an OpenAPI document.
//!
//! These structs are produced once by the loader and never mutated afterwards;
//! the route builder folds each `PathOperation` into a `RouteSpec`.

use indexmap::IndexMap;
use std::fmt;

/// HTTP methods recognised inside an OpenAPI path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `get`
    Get,
    /// `put`
    Put,
    /// `post`
    Post,
    /// `delete`
    Delete,
    /// `options`
    Options,
    /// `head`
    Head,
    /// `patch`
    Patch,
    /// `trace`
    Trace,
}

impl HttpMethod {
    /// Parses a path-item key. Returns `None` for non-method keys
    /// (`parameters`, `summary`, `x-...`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(Self::Get),
            "put" => Some(Self::Put),
            "post" => Some(Self::Post),
            "delete" => Some(Self::Delete),
            "options" => Some(Self::Options),
            "head" => Some(Self::Head),
            "patch" => Some(Self::Patch),
            "trace" => Some(Self::Trace),
            _ => None,
        }
    }

    /// Lowercase OpenAPI spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Post => "post",
            Self::Delete => "delete",
            Self::Options => "options",
            Self::Head => "head",
            Self::Patch => "patch",
            Self::Trace => "trace",
        }
    }

    /// Whether requests with this method carry a JSON body that the
    /// generated handler must parse.
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// The source location of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    /// Path.
    Path,
    /// Query.
    Query,
    /// Header.
    Header,
    /// Cookie.
    Cookie,
}

impl ParamLocation {
    /// Parses the `in` field of a parameter object.
    pub fn from_in(value: &str) -> Option<Self> {
        match value {
            "path" => Some(Self::Path),
            "query" => Some(Self::Query),
            "header" => Some(Self::Header),
            "cookie" => Some(Self::Cookie),
            _ => None,
        }
    }
}

/// A parameter as declared in the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDescriptor {
    /// Parameter name (matches the `{name}` placeholder for path params).
    pub name: String,
    /// Location.
    pub location: ParamLocation,
    /// Declared `schema.type`.
    pub schema_type: String,
    /// Declared `schema.format`, if any.
    pub format: Option<String>,
}

/// Type information for a single request-body property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySchema {
    /// Declared `type`.
    pub schema_type: String,
    /// Declared `format`, if any.
    pub format: Option<String>,
}

/// Flattened request body: property name -> type, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RequestBodySchema {
    /// Properties of the body object.
    pub properties: IndexMap<String, PropertySchema>,
}

/// A single `path + method` entry of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct PathOperation {
    /// Path template, e.g. `/simulation/{simid}/getTime`.
    pub path: String,
    /// HTTP method.
    pub method: HttpMethod,
    /// `operationId`.
    pub operation_id: String,
    /// Parameters in declaration order (operation-level first, then inherited path-level).
    pub parameters: Vec<ParamDescriptor>,
    /// JSON request body schema, if declared.
    pub request_body: Option<RequestBodySchema>,
    /// `summary` of the operation.
    pub summary: Option<String>,
}

/// A loaded, dereferenced OpenAPI document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecDocument {
    /// `info.title`.
    pub title: Option<String>,
    /// `info.version`.
    pub version: Option<String>,
    /// Operations in document order.
    pub operations: Vec<PathOperation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_keys() {
        assert_eq!(HttpMethod::from_key("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::from_key("put"), Some(HttpMethod::Put));
        assert_eq!(HttpMethod::from_key("parameters"), None);
        assert_eq!(HttpMethod::from_key("x-internal"), None);
    }

    #[test]
    fn test_body_methods() {
        assert!(HttpMethod::Post.carries_body());
        assert!(HttpMethod::Put.carries_body());
        assert!(!HttpMethod::Get.carries_body());
        assert!(!HttpMethod::Patch.carries_body());
        assert!(!HttpMethod::Delete.carries_body());
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
