#![deny(missing_docs)]

//! # Reference Utilities
//!
//! Resolves local `$ref` pointers (`#/components/...`) until no reference
//! nodes remain in the document.
//!
//! External documents are never fetched: a reference whose document part is
//! not empty is rejected. A pointer that is revisited while it is still being
//! resolved is a cycle and fails the load.

use crate::error::{AppError, AppResult};
use percent_encoding::percent_decode_str;
use serde_json::{Map, Value};

/// Upper bound on nested reference resolution.
const MAX_REF_DEPTH: usize = 64;

/// Returns a copy of `root` with every local `$ref` replaced by its target.
pub fn dereference(root: &Value) -> AppResult<Value> {
    let mut stack = Vec::new();
    resolve_node(root, root, &mut stack)
}

fn resolve_node(node: &Value, root: &Value, stack: &mut Vec<String>) -> AppResult<Value> {
    match node {
        Value::Object(map) => {
            if let Some(reference) = map.get("$ref") {
                let reference = reference.as_str().ok_or_else(|| {
                    AppError::Schema("'$ref' must be a string".into())
                })?;
                return resolve_reference(reference, map, root, stack);
            }
            let mut out = Map::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key.clone(), resolve_node(value, root, stack)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| resolve_node(item, root, stack))
            .collect::<AppResult<Vec<_>>>()
            .map(Value::Array),
        other => Ok(other.clone()),
    }
}

fn resolve_reference(
    reference: &str,
    holder: &Map<String, Value>,
    root: &Value,
    stack: &mut Vec<String>,
) -> AppResult<Value> {
    if stack.iter().any(|seen| seen == reference) {
        let mut chain = stack.clone();
        chain.push(reference.to_string());
        return Err(AppError::Schema(format!(
            "Cyclic $ref detected: {}",
            chain.join(" -> ")
        )));
    }
    if stack.len() >= MAX_REF_DEPTH {
        return Err(AppError::Schema(format!(
            "$ref nesting deeper than {} while resolving '{}'",
            MAX_REF_DEPTH, reference
        )));
    }

    let pointer = local_pointer(reference)?;
    let target = root.pointer(&pointer).ok_or_else(|| {
        AppError::Schema(format!("Unresolved $ref '{}'", reference))
    })?;

    stack.push(reference.to_string());
    let resolved = resolve_node(target, root, stack);
    stack.pop();
    let mut resolved = resolved?;

    // Sibling keywords next to `$ref` take precedence over the target's keys.
    if let Value::Object(target_map) = &mut resolved {
        for (key, value) in holder {
            if key == "$ref" {
                continue;
            }
            target_map.insert(key.clone(), resolve_node(value, root, stack)?);
        }
    }

    Ok(resolved)
}

/// Converts a `#/a/b` reference into an RFC 6901 pointer usable with
/// [`Value::pointer`], decoding percent-escapes in each segment.
fn local_pointer(reference: &str) -> AppResult<String> {
    let fragment = reference.strip_prefix('#').ok_or_else(|| {
        AppError::Schema(format!(
            "External $ref '{}' is not supported; flatten the document first",
            reference
        ))
    })?;
    if fragment.is_empty() {
        return Ok(String::new());
    }
    if !fragment.starts_with('/') {
        return Err(AppError::Schema(format!(
            "Malformed $ref '{}': fragment must be a JSON pointer",
            reference
        )));
    }

    // Segments are fully decoded then re-escaped in the form `Value::pointer` expects.
    let segments: Vec<String> = fragment[1..]
        .split('/')
        .map(|segment| {
            decode_pointer_segment(segment)
                .replace('~', "~0")
                .replace('/', "~1")
        })
        .collect();
    Ok(format!("/{}", segments.join("/")))
}

/// Decodes a JSON Pointer segment (handles `~1` and `~0`).
pub(crate) fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolves_nested_refs() {
        let doc = json!({
            "components": {
                "parameters": { "SimId": { "name": "simid", "in": "path", "schema": { "$ref": "#/components/schemas/Id" } } },
                "schemas": { "Id": { "type": "string" } }
            },
            "paths": { "/x/{simid}": { "get": { "parameters": [ { "$ref": "#/components/parameters/SimId" } ] } } }
        });
        let out = dereference(&doc).unwrap();
        let param = &out["paths"]["/x/{simid}"]["get"]["parameters"][0];
        assert_eq!(param["name"], "simid");
        assert_eq!(param["schema"]["type"], "string");
        assert!(!out.to_string().contains("$ref"));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let doc = json!({
            "components": { "schemas": {
                "A": { "$ref": "#/components/schemas/B" },
                "B": { "$ref": "#/components/schemas/A" }
            } }
        });
        let err = dereference(&doc).unwrap_err();
        match err {
            AppError::Schema(msg) => assert!(msg.contains("Cyclic $ref"), "{msg}"),
            other => panic!("expected schema error, got {other}"),
        }
    }

    #[test]
    fn test_self_referencing_property_is_a_cycle() {
        let doc = json!({
            "components": { "schemas": {
                "Node": { "type": "object", "properties": { "next": { "$ref": "#/components/schemas/Node" } } }
            } }
        });
        assert!(matches!(dereference(&doc), Err(AppError::Schema(_))));
    }

    #[test]
    fn test_dangling_and_external_refs() {
        let dangling = json!({ "a": { "$ref": "#/components/schemas/Missing" } });
        assert!(matches!(dereference(&dangling), Err(AppError::Schema(_))));

        let external = json!({ "a": { "$ref": "other.json#/x" } });
        let err = dereference(&external).unwrap_err();
        assert!(err.to_string().contains("External $ref"));
    }

    #[test]
    fn test_sibling_keys_override_target() {
        let doc = json!({
            "components": { "schemas": { "N": { "type": "number", "format": "float" } } },
            "value": { "$ref": "#/components/schemas/N", "format": "double" }
        });
        let out = dereference(&doc).unwrap();
        assert_eq!(out["value"]["type"], "number");
        assert_eq!(out["value"]["format"], "double");
    }

    #[test]
    fn test_escaped_segments() {
        let doc = json!({
            "paths": { "/a/b": { "summary": "slash path" } },
            "alias": { "$ref": "#/paths/~1a~1b" }
        });
        let out = dereference(&doc).unwrap();
        assert_eq!(out["alias"]["summary"], "slash path");
    }
}
