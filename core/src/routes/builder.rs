#![deny(missing_docs)]

//! # Route Builder
//!
//! Folds each `PathOperation` into a `RouteSpec`: typed pattern, ordered
//! path parameters, flattened request body and dispatch key.

use crate::error::{AppError, AppResult};
use crate::oas::{ParamDescriptor, ParamLocation, PathOperation, PropertySchema};
use crate::routes::models::{DispatchPolicy, RouteParam, RouteSpec};
use crate::routes::naming::{dispatch_segment, extract_placeholders, substitute_placeholders};
use indexmap::IndexMap;
use std::collections::HashSet;

/// Builds the route table for `ops`, in input order.
///
/// Dispatch keys are `<segment>_<n>` where `n` counts operations from zero,
/// so keys are stable for a given operation order.
///
/// # Errors
///
/// * A malformed template or a placeholder with no matching parameter.
/// * A policy entry that names no operation.
/// * A dispatch key collision.
pub fn build_routes(ops: &[PathOperation], policy: &DispatchPolicy) -> AppResult<Vec<RouteSpec>> {
    let known: HashSet<&str> = ops.iter().map(|op| op.operation_id.as_str()).collect();
    if let Some(unknown) = policy
        .non_dispatchable
        .iter()
        .find(|id| !known.contains(id.as_str()))
    {
        return Err(AppError::Build(format!(
            "Non-dispatchable operation '{}' does not match any operationId",
            unknown
        )));
    }

    let mut routes = Vec::with_capacity(ops.len());
    let mut keys = HashSet::new();

    for (counter, op) in ops.iter().enumerate() {
        let route = build_route(op, counter, policy)?;
        if !keys.insert(route.dispatch_key.clone()) {
            return Err(AppError::Build(format!(
                "Dispatch key '{}' of {} {} collides with an earlier route",
                route.dispatch_key, route.method, route.path
            )));
        }
        tracing::debug!(
            method = %route.method,
            pattern = %route.pattern,
            key = %route.dispatch_key,
            dispatchable = route.dispatchable,
            "built route"
        );
        routes.push(route);
    }

    tracing::info!(routes = routes.len(), "built route table");
    Ok(routes)
}

fn build_route(op: &PathOperation, counter: usize, policy: &DispatchPolicy) -> AppResult<RouteSpec> {
    let placeholders = extract_placeholders(&op.path).map_err(|msg| {
        AppError::Build(format!(
            "Invalid path template '{}' ({}): {}",
            op.path, op.operation_id, msg
        ))
    })?;

    let mut parameters = Vec::with_capacity(placeholders.len());
    for name in placeholders {
        let descriptor = find_descriptor(&op.parameters, &name).ok_or_else(|| {
            AppError::Build(format!(
                "Placeholder '{{{}}}' in {} {} ({}) has no parameter definition",
                name, op.method, op.path, op.operation_id
            ))
        })?;
        parameters.push(RouteParam {
            slot: slot_type(&descriptor.schema_type, descriptor.format.as_deref()),
            name,
        });
    }

    let slots: Vec<String> = parameters.iter().map(|p| p.slot.clone()).collect();
    let pattern = substitute_placeholders(&op.path, &slots);

    let request_schema = if op.method.carries_body() {
        op.request_body.as_ref().map(|body| {
            body.properties
                .iter()
                .map(|(name, schema)| (name.clone(), body_field_type(schema)))
                .collect::<IndexMap<String, String>>()
        })
    } else {
        if op.request_body.is_some() {
            tracing::debug!(
                operation = %op.operation_id,
                method = %op.method,
                "request body ignored for method without body"
            );
        }
        None
    };

    Ok(RouteSpec {
        path: op.path.clone(),
        method: op.method,
        pattern,
        parameters,
        request_schema,
        dispatch_key: format!("{}_{}", dispatch_segment(&op.path), counter),
        operation_id: op.operation_id.clone(),
        dispatchable: policy.is_dispatchable(&op.operation_id),
        summary: op.summary.clone(),
    })
}

/// Path-located descriptors win over same-named ones elsewhere.
fn find_descriptor<'a>(params: &'a [ParamDescriptor], name: &str) -> Option<&'a ParamDescriptor> {
    params
        .iter()
        .find(|p| p.name == name && p.location == ParamLocation::Path)
        .or_else(|| params.iter().find(|p| p.name == name))
}

/// Maps a declared schema type onto a placeholder slot.
pub fn slot_type(schema_type: &str, format: Option<&str>) -> String {
    match (schema_type, format) {
        ("string", _) => "string".to_string(),
        ("integer", _) => "int".to_string(),
        ("number", Some(format)) => format.to_string(),
        ("number", None) => "double".to_string(),
        (other, _) => other.to_string(),
    }
}

fn body_field_type(schema: &PropertySchema) -> String {
    match (schema.schema_type.as_str(), schema.format.as_deref()) {
        ("number", Some(format)) => format.to_string(),
        (declared, _) => declared.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::{HttpMethod, RequestBodySchema};
    use pretty_assertions::assert_eq;

    fn param(name: &str, location: ParamLocation, ty: &str, format: Option<&str>) -> ParamDescriptor {
        ParamDescriptor {
            name: name.into(),
            location,
            schema_type: ty.into(),
            format: format.map(Into::into),
        }
    }

    fn op(path: &str, method: HttpMethod, id: &str, parameters: Vec<ParamDescriptor>) -> PathOperation {
        PathOperation {
            path: path.into(),
            method,
            operation_id: id.into(),
            parameters,
            request_body: None,
            summary: None,
        }
    }

    fn body(fields: &[(&str, &str, Option<&str>)]) -> Option<RequestBodySchema> {
        Some(RequestBodySchema {
            properties: fields
                .iter()
                .map(|(name, ty, format)| {
                    (
                        name.to_string(),
                        PropertySchema {
                            schema_type: ty.to_string(),
                            format: format.map(Into::into),
                        },
                    )
                })
                .collect(),
        })
    }

    #[test]
    fn test_get_time_route() {
        let ops = vec![op(
            "/simulation/{simid}/getTime",
            HttpMethod::Get,
            "getTime",
            vec![param("simid", ParamLocation::Path, "string", None)],
        )];
        let routes = build_routes(&ops, &DispatchPolicy::default()).unwrap();
        let route = &routes[0];
        assert_eq!(route.pattern, "/simulation/<string>/getTime");
        assert_eq!(
            route.parameters,
            vec![RouteParam {
                name: "simid".into(),
                slot: "string".into()
            }]
        );
        assert_eq!(route.request_schema, None);
        assert_eq!(route.dispatch_key, "getTime_0");
        assert!(route.dispatchable);
    }

    #[test]
    fn test_post_body_is_flattened_verbatim() {
        let mut add_host = op(
            "/simulation/{simid}/addHost",
            HttpMethod::Post,
            "addHost",
            vec![param("simid", ParamLocation::Path, "string", None)],
        );
        add_host.request_body = body(&[
            ("hostname", "string", None),
            ("cores", "integer", None),
            ("speed", "number", Some("float")),
            ("ram", "number", None),
        ]);

        let routes = build_routes(&[add_host], &DispatchPolicy::default()).unwrap();
        let schema = routes[0].request_schema.as_ref().unwrap();
        let flattened: Vec<(&str, &str)> = schema
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            flattened,
            vec![
                ("hostname", "string"),
                ("cores", "integer"),
                ("speed", "float"),
                ("ram", "number")
            ]
        );
    }

    #[test]
    fn test_body_dropped_for_get_and_patch() {
        let mut get = op("/a", HttpMethod::Get, "a", vec![]);
        get.request_body = body(&[("x", "string", None)]);
        let mut patch = op("/b", HttpMethod::Patch, "b", vec![]);
        patch.request_body = body(&[("x", "string", None)]);
        let mut put = op("/c", HttpMethod::Put, "c", vec![]);
        put.request_body = body(&[("x", "string", None)]);

        let routes = build_routes(&[get, patch, put], &DispatchPolicy::default()).unwrap();
        assert!(routes[0].request_schema.is_none());
        assert!(routes[1].request_schema.is_none());
        assert!(routes[2].request_schema.is_some());
    }

    #[test]
    fn test_slot_mapping() {
        assert_eq!(slot_type("string", Some("uuid")), "string");
        assert_eq!(slot_type("integer", Some("int64")), "int");
        assert_eq!(slot_type("number", Some("float")), "float");
        assert_eq!(slot_type("number", None), "double");
        assert_eq!(slot_type("boolean", None), "boolean");
    }

    #[test]
    fn test_parameters_follow_template_order() {
        let ops = vec![op(
            "/sim/{simid}/tasks/{task}/{n}",
            HttpMethod::Get,
            "task",
            vec![
                param("n", ParamLocation::Path, "integer", None),
                param("task", ParamLocation::Path, "string", None),
                param("simid", ParamLocation::Path, "string", None),
            ],
        )];
        let routes = build_routes(&ops, &DispatchPolicy::default()).unwrap();
        let names: Vec<&str> = routes[0].parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["simid", "task", "n"]);
        assert_eq!(routes[0].pattern, "/sim/<string>/tasks/<string>/<int>");
        assert_eq!(routes[0].pattern.matches('<').count(), routes[0].parameters.len());
    }

    #[test]
    fn test_path_location_preferred() {
        let ops = vec![op(
            "/hosts/{id}",
            HttpMethod::Get,
            "host",
            vec![
                param("id", ParamLocation::Query, "string", None),
                param("id", ParamLocation::Path, "integer", None),
            ],
        )];
        let routes = build_routes(&ops, &DispatchPolicy::default()).unwrap();
        assert_eq!(routes[0].pattern, "/hosts/<int>");
    }

    #[test]
    fn test_dispatch_keys_are_distinct_and_counted() {
        let p = || vec![param("simid", ParamLocation::Path, "string", None)];
        let ops = vec![
            op("/simulation/startSimulation", HttpMethod::Post, "startSimulation", vec![]),
            op("/simulation/{simid}/getTime", HttpMethod::Get, "getTime", p()),
            op("/simulation/{simid}/getTime", HttpMethod::Put, "setTime", p()),
            op("/", HttpMethod::Get, "index", vec![]),
        ];
        let routes = build_routes(&ops, &DispatchPolicy::default()).unwrap();
        let keys: Vec<&str> = routes.iter().map(|r| r.dispatch_key.as_str()).collect();
        assert_eq!(
            keys,
            vec!["startSimulation_0", "getTime_1", "getTime_2", "root_3"]
        );
    }

    #[test]
    fn test_dispatch_keys_distinct_for_lookalike_segments() {
        let ops = vec![
            op("/x/a_1", HttpMethod::Get, "zero", vec![]),
            op("/a", HttpMethod::Get, "one", vec![]),
            op("/y/a", HttpMethod::Get, "two", vec![]),
            op("/z/a_1", HttpMethod::Get, "three", vec![]),
        ];
        let routes = build_routes(&ops, &DispatchPolicy::default()).unwrap();
        let keys: HashSet<&str> = routes.iter().map(|r| r.dispatch_key.as_str()).collect();
        assert_eq!(keys.len(), ops.len());
    }

    #[test]
    fn test_non_dispatchable_policy() {
        let ops = vec![
            op("/simulation/startSimulation", HttpMethod::Post, "startSimulation", vec![]),
            op("/simulation/getTime", HttpMethod::Get, "getTime", vec![]),
        ];
        let policy = DispatchPolicy::new(["startSimulation"]);
        let routes = build_routes(&ops, &policy).unwrap();
        assert!(!routes[0].dispatchable);
        assert!(routes[1].dispatchable);

        let err = build_routes(&ops, &DispatchPolicy::new(["nope"])).unwrap_err();
        assert!(err.to_string().contains("'nope'"));
    }

    #[test]
    fn test_missing_parameter_definition() {
        let ops = vec![op("/simulation/{simid}/getTime", HttpMethod::Get, "getTime", vec![])];
        let err = build_routes(&ops, &DispatchPolicy::default()).unwrap_err();
        assert!(matches!(err, AppError::Build(_)));
        assert!(err.to_string().contains("'{simid}'"));
    }

    #[test]
    fn test_malformed_template() {
        let ops = vec![op("/simulation/{simid/getTime", HttpMethod::Get, "getTime", vec![])];
        let err = build_routes(&ops, &DispatchPolicy::default()).unwrap_err();
        assert!(err.to_string().contains("Invalid path template"));
    }
}
