//! # Payload Parsing
//!
//! Turns the JSON object of one block into typed documentation fields.
//!
//! Two layouts are accepted: the daemon layout, where `purpose` and the tables
//! sit under a `documentation` object next to `REST_func`, and a flat layout
//! with everything at the top level.

use crate::annotations::models::{FieldEntry, FieldTable, ENVELOPE_FIELDS};
use serde_json::{Map, Value};

/// Typed view of a block payload.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnnotationPayload {
    pub rest_func: Option<String>,
    pub purpose: Option<String>,
    pub json_input: Option<FieldTable>,
    pub json_output: FieldTable,
}

/// Validates a parsed block payload. Errors are plain messages; the scanner
/// attaches file and line information.
pub(crate) fn parse_payload(value: &Value) -> Result<AnnotationPayload, String> {
    let root = value
        .as_object()
        .ok_or_else(|| "block payload must be a JSON object".to_string())?;

    let rest_func = optional_string(root, "REST_func")?;

    let docs = match root.get("documentation") {
        Some(Value::Object(inner)) => inner,
        Some(_) => return Err("'documentation' must be an object".into()),
        None => root,
    };

    let purpose = optional_string(docs, "purpose")?;
    let json_input = optional_table(docs, "json_input")?;
    let declared_output = optional_table(docs, "json_output")?;

    Ok(AnnotationPayload {
        rest_func,
        purpose,
        json_input,
        json_output: with_envelope(declared_output),
    })
}

/// Prepends the response-envelope fields. A declared field of the same name
/// keeps the envelope position but takes the declared type and description.
fn with_envelope(declared: Option<FieldTable>) -> FieldTable {
    let mut table = FieldTable::new();
    for (name, field_type, description) in ENVELOPE_FIELDS {
        table.insert(
            name.to_string(),
            FieldEntry {
                field_type: field_type.to_string(),
                description: description.to_string(),
            },
        );
    }
    for (name, entry) in declared.unwrap_or_default() {
        table.insert(name, entry);
    }
    table
}

fn optional_string(map: &Map<String, Value>, key: &str) -> Result<Option<String>, String> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(format!("'{}' must be a string", key)),
    }
}

fn optional_table(map: &Map<String, Value>, key: &str) -> Result<Option<FieldTable>, String> {
    let fields = match map.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(fields)) => fields,
        Some(_) => return Err(format!("'{}' must be an object of fields", key)),
    };

    let mut table = FieldTable::new();
    for (name, spec) in fields {
        let entry = parse_field(spec)
            .ok_or_else(|| format!("field '{}' in '{}' must be [\"type\", \"description\"]", name, key))?;
        table.insert(name.clone(), entry);
    }
    Ok(Some(table))
}

/// Accepts `["type", "description"]` or `{"type": .., "description": ..}`.
fn parse_field(spec: &Value) -> Option<FieldEntry> {
    match spec {
        Value::Array(parts) if parts.len() == 2 => Some(FieldEntry {
            field_type: parts[0].as_str()?.to_string(),
            description: parts[1].as_str()?.to_string(),
        }),
        Value::Object(obj) => Some(FieldEntry {
            field_type: obj.get("type")?.as_str()?.to_string(),
            description: obj
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_daemon_layout() {
        let value = json!({
            "REST_func": "startSimulation",
            "documentation": {
                "purpose": "Start a new simulation",
                "json_input": {
                    "platform_xml": ["string", "XML description of the simulated platform"],
                    "controller_hostname": ["string", "Host that runs the controller"]
                },
                "json_output": {
                    "port_number": ["int", "port number for subsequent requests"]
                }
            }
        });
        let payload = parse_payload(&value).unwrap();
        assert_eq!(payload.rest_func.as_deref(), Some("startSimulation"));
        assert_eq!(payload.purpose.as_deref(), Some("Start a new simulation"));

        let inputs: Vec<&String> = payload.json_input.as_ref().unwrap().keys().collect();
        assert_eq!(inputs, vec!["platform_xml", "controller_hostname"]);

        let outputs: Vec<&String> = payload.json_output.keys().collect();
        assert_eq!(
            outputs,
            vec!["wrench_api_request_success", "failure_cause", "port_number"]
        );
    }

    #[test]
    fn test_flat_layout_and_object_fields() {
        let value = json!({
            "purpose": "Get time",
            "json_output": { "time": { "type": "double", "description": "simulated date" } }
        });
        let payload = parse_payload(&value).unwrap();
        assert_eq!(payload.rest_func, None);
        assert!(payload.json_input.is_none());
        assert_eq!(payload.json_output["time"].field_type, "double");
    }

    #[test]
    fn test_envelope_is_injected_without_output_table() {
        let payload = parse_payload(&json!({ "purpose": "p" })).unwrap();
        assert_eq!(payload.json_output.len(), 2);
        assert_eq!(
            payload.json_output["wrench_api_request_success"].field_type,
            "bool"
        );
        assert_eq!(payload.json_output["failure_cause"].field_type, "string");
    }

    #[test]
    fn test_declared_envelope_field_keeps_position() {
        let value = json!({
            "json_output": {
                "answer": ["int", "x"],
                "failure_cause": ["string", "why it broke"]
            }
        });
        let payload = parse_payload(&value).unwrap();
        let names: Vec<&String> = payload.json_output.keys().collect();
        assert_eq!(
            names,
            vec!["wrench_api_request_success", "failure_cause", "answer"]
        );
        assert_eq!(payload.json_output["failure_cause"].description, "why it broke");
    }

    #[test]
    fn test_rejects_malformed_fields() {
        let err = parse_payload(&json!({ "json_input": { "a": ["string"] } })).unwrap_err();
        assert!(err.contains("field 'a'"));

        let err = parse_payload(&json!({ "purpose": 3 })).unwrap_err();
        assert!(err.contains("'purpose' must be a string"));

        let err = parse_payload(&json!([1, 2])).unwrap_err();
        assert!(err.contains("JSON object"));
    }
}
