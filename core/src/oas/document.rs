#![deny(missing_docs)]

//! # OpenAPI Document Loading
//!
//! Reads a JSON OpenAPI document, dereferences it, and validates every
//! operation into a typed `PathOperation`.
//!
//! Operations keep document order (paths first, then the method keys inside
//! each path item) because dispatch keys downstream are counter based.

use crate::error::{AppError, AppResult};
use crate::oas::models::{
    HttpMethod, ParamDescriptor, ParamLocation, PathOperation, PropertySchema, RequestBodySchema,
    SpecDocument,
};
use crate::oas::ref_utils::dereference;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// --- Shims ---
//
// Intermediate deserialization layer; these map directly to OpenAPI objects
// after dereferencing and are converted into the models right away.

#[derive(Debug, Deserialize)]
struct ShimInfo {
    title: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShimOperation {
    operation_id: Option<String>,
    summary: Option<String>,
    #[serde(default)]
    parameters: Vec<ShimParameter>,
    request_body: Option<ShimRequestBody>,
}

#[derive(Debug, Deserialize)]
struct ShimParameter {
    name: Option<String>,
    #[serde(rename = "in")]
    location: Option<String>,
    schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ShimRequestBody {
    #[serde(default)]
    content: IndexMap<String, ShimMediaType>,
}

#[derive(Debug, Deserialize)]
struct ShimMediaType {
    schema: Option<Value>,
}

/// Reads and parses an OpenAPI JSON document from disk.
pub fn load_spec_document(path: &Path) -> AppResult<SpecDocument> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::Schema(format!("Failed to read OpenAPI file {:?}: {}", path, e))
    })?;
    let document = parse_spec_document(&content)?;
    tracing::info!(
        spec = %path.display(),
        operations = document.operations.len(),
        "loaded OpenAPI document"
    );
    Ok(document)
}

/// Parses raw OpenAPI JSON into a `SpecDocument`.
///
/// Fails with `AppError::Schema` on malformed JSON, reference cycles, missing
/// or duplicate `operationId`, and parameters/properties without a type.
pub fn parse_spec_document(json_content: &str) -> AppResult<SpecDocument> {
    let raw: Value = serde_json::from_str(json_content).map_err(|e| {
        AppError::Schema(format!(
            "Failed to parse OpenAPI JSON at line {}, column {}: {}",
            e.line(),
            e.column(),
            e
        ))
    })?;
    let root = dereference(&raw)?;

    let info = match root.get("info") {
        Some(value) => Some(
            ShimInfo::deserialize(value)
                .map_err(|e| AppError::Schema(format!("Invalid 'info' object: {}", e)))?,
        ),
        None => None,
    };

    let paths = root
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| AppError::Schema("OpenAPI document has no 'paths' object".into()))?;

    let mut operations = Vec::new();
    let mut operation_ids = HashSet::new();

    for (path, item) in paths {
        if path.starts_with("x-") {
            continue;
        }
        let item = item.as_object().ok_or_else(|| {
            AppError::Schema(format!("Path item '{}' must be an object", path))
        })?;

        let common_params = match item.get("parameters") {
            Some(list) => {
                let shims: Vec<ShimParameter> = Vec::deserialize(list).map_err(|e| {
                    AppError::Schema(format!("Invalid parameters on path '{}': {}", path, e))
                })?;
                resolve_parameters(&shims, path, "*")?
            }
            None => Vec::new(),
        };

        for (key, value) in item {
            let Some(method) = HttpMethod::from_key(key) else {
                continue;
            };
            let op = ShimOperation::deserialize(value).map_err(|e| {
                AppError::Schema(format!("Invalid operation {} {}: {}", method, path, e))
            })?;
            let operation = build_operation(path, method, op, &common_params)?;

            if !operation_ids.insert(operation.operation_id.clone()) {
                return Err(AppError::Schema(format!(
                    "Duplicate operationId '{}' detected",
                    operation.operation_id
                )));
            }
            tracing::debug!(
                method = %operation.method,
                path = %operation.path,
                operation_id = %operation.operation_id,
                "operation loaded"
            );
            operations.push(operation);
        }
    }

    Ok(SpecDocument {
        title: info.as_ref().and_then(|i| i.title.clone()),
        version: info.and_then(|i| i.version),
        operations,
    })
}

fn build_operation(
    path: &str,
    method: HttpMethod,
    op: ShimOperation,
    common_params: &[ParamDescriptor],
) -> AppResult<PathOperation> {
    let operation_id = op
        .operation_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| {
            AppError::Schema(format!("Operation {} {} is missing an operationId", method, path))
        })?;

    // Operation params take priority; inherited ones are appended unless overridden.
    let mut parameters = resolve_parameters(&op.parameters, path, &operation_id)?;
    for common in common_params {
        let overridden = parameters
            .iter()
            .any(|p| p.name == common.name && p.location == common.location);
        if !overridden {
            parameters.push(common.clone());
        }
    }

    let request_body = match op.request_body {
        Some(body) => extract_request_body(&body, &operation_id)?,
        None => None,
    };

    Ok(PathOperation {
        path: path.to_string(),
        method,
        operation_id,
        parameters,
        request_body,
        summary: op.summary,
    })
}

fn resolve_parameters(
    shims: &[ShimParameter],
    path: &str,
    operation_id: &str,
) -> AppResult<Vec<ParamDescriptor>> {
    shims
        .iter()
        .map(|shim| {
            let name = shim.name.clone().ok_or_else(|| {
                AppError::Schema(format!(
                    "Parameter without a name in '{}' ({})",
                    operation_id, path
                ))
            })?;
            let location = match shim.location.as_deref() {
                Some(raw) => ParamLocation::from_in(raw).ok_or_else(|| {
                    AppError::Schema(format!(
                        "Parameter '{}' in '{}' has unknown location '{}'",
                        name, operation_id, raw
                    ))
                })?,
                None => ParamLocation::Path,
            };
            let (schema_type, format) = shim
                .schema
                .as_ref()
                .and_then(schema_type_and_format)
                .ok_or_else(|| {
                    AppError::Schema(format!(
                        "Parameter '{}' in '{}' lacks a schema.type",
                        name, operation_id
                    ))
                })?;
            Ok(ParamDescriptor {
                name,
                location,
                schema_type,
                format,
            })
        })
        .collect()
}

fn extract_request_body(
    body: &ShimRequestBody,
    operation_id: &str,
) -> AppResult<Option<RequestBodySchema>> {
    let media = body
        .content
        .get("application/json")
        .or_else(|| body.content.values().next());
    let Some(schema) = media.and_then(|m| m.schema.as_ref()) else {
        return Ok(None);
    };
    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(Some(RequestBodySchema::default()));
    };

    let mut flattened = IndexMap::new();
    for (name, property) in properties {
        let (schema_type, format) = schema_type_and_format(property).ok_or_else(|| {
            AppError::Schema(format!(
                "Request body property '{}' in '{}' lacks a type",
                name, operation_id
            ))
        })?;
        flattened.insert(
            name.clone(),
            PropertySchema {
                schema_type,
                format,
            },
        );
    }
    Ok(Some(RequestBodySchema {
        properties: flattened,
    }))
}

/// Extracts `(type, format)` from a schema object.
///
/// OAS 3.1 type arrays resolve to their first non-`null` entry.
fn schema_type_and_format(schema: &Value) -> Option<(String, Option<String>)> {
    let schema_type = match schema.get("type")? {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null")?
            .to_string(),
        _ => return None,
    };
    let format = schema
        .get("format")
        .and_then(Value::as_str)
        .map(str::to_string);
    Some((schema_type, format))
}
