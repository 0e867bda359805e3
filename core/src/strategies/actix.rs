#![deny(missing_docs)]

//! # Actix Strategy
//!
//! Renders an actix-web `config(cfg: &mut web::ServiceConfig)` function with
//! one `cfg.route(...)` per operation, and a `HashMap` of dispatch keys to
//! controller functions.

use crate::oas::HttpMethod;
use crate::routes::naming::to_snake_case;
use crate::routes::RouteSpec;
use crate::strategies::traits::RouterStrategy;
use serde::{Deserialize, Serialize};

const GENERATED_HEADER: &str = "// Generated by routegen. Do not edit.\n\n";

/// Paths used in the generated Rust code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActixOptions {
    /// Function every route delegates to: `fn(Value, &str) -> HttpResponse`.
    pub dispatcher: String,
    /// Module holding one `fn(Value) -> Value` per operation.
    pub controller_module: String,
}

impl Default for ActixOptions {
    fn default() -> Self {
        Self {
            dispatcher: "crate::dispatch::handle".into(),
            controller_module: "crate::controller".into(),
        }
    }
}

/// Strategy for generating Actix Web compatible code.
#[derive(Debug, Clone, Default)]
pub struct ActixStrategy {
    options: ActixOptions,
}

impl ActixStrategy {
    /// Creates a strategy with the given path options.
    pub fn new(options: ActixOptions) -> Self {
        Self { options }
    }
}

impl RouterStrategy for ActixStrategy {
    fn name(&self) -> &'static str {
        "actix"
    }

    fn routes_prologue(&self) -> String {
        let mut code = String::from(GENERATED_HEADER);
        code.push_str("use actix_web::web;\n\n");
        code.push_str("/// Registers every generated route.\n");
        code.push_str("pub fn config(cfg: &mut web::ServiceConfig) {\n");
        code
    }

    fn route_registration_statement(&self, route: &RouteSpec) -> String {
        let mut args = Vec::new();
        if !route.parameters.is_empty() {
            args.push(format!("path: {}", path_extractor(route)));
        }
        let carries_body = route.method.carries_body();
        if carries_body {
            args.push("body: web::Json<serde_json::Value>".to_string());
        }

        let binding = if route.parameters.is_empty() {
            "let"
        } else {
            "let mut"
        };
        let request_json = if carries_body {
            "body.into_inner()"
        } else {
            "serde_json::json!({})"
        };

        let mut code = String::new();
        code.push_str("    cfg.route(\n");
        code.push_str(&format!("        \"{}\",\n", route.path));
        code.push_str(&format!(
            "        web::{}.to(|{}| async move {{\n",
            actix_method(route.method),
            args.join(", ")
        ));
        code.push_str(&format!(
            "            {} req_json = {};\n",
            binding, request_json
        ));
        if !route.parameters.is_empty() {
            let names: Vec<&str> = route.parameters.iter().map(|p| p.name.as_str()).collect();
            code.push_str(&format!(
                "            let ({},) = path.into_inner();\n",
                names.join(", ")
            ));
            for name in names {
                code.push_str(&format!(
                    "            req_json[\"{}\"] = serde_json::json!({});\n",
                    name, name
                ));
            }
        }
        code.push_str(&format!(
            "            {}(req_json, \"{}\")\n",
            self.options.dispatcher, route.dispatch_key
        ));
        code.push_str("        }),\n");
        code.push_str("    );\n");
        code
    }

    fn routes_epilogue(&self) -> String {
        "}\n".to_string()
    }

    fn dispatch_prologue(&self) -> String {
        let mut code = String::from(GENERATED_HEADER);
        code.push_str("use serde_json::Value;\n");
        code.push_str("use std::collections::HashMap;\n\n");
        code.push_str("/// Handler invoked with the request JSON.\n");
        code.push_str("pub type RequestHandler = fn(Value) -> Value;\n\n");
        code.push_str("/// Dispatch key -> handler.\n");
        code.push_str("pub fn request_handlers() -> HashMap<&'static str, RequestHandler> {\n");
        code.push_str("    let mut handlers: HashMap<&'static str, RequestHandler> = HashMap::new();\n");
        code
    }

    fn dispatch_entry(&self, route: &RouteSpec) -> String {
        format!(
            "    handlers.insert(\"{}\", {}::{});\n",
            route.dispatch_key,
            self.options.controller_module,
            to_snake_case(&route.operation_id)
        )
    }

    fn dispatch_epilogue(&self) -> String {
        "    handlers\n}\n".to_string()
    }
}

fn actix_method(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "get()",
        HttpMethod::Put => "put()",
        HttpMethod::Post => "post()",
        HttpMethod::Delete => "delete()",
        HttpMethod::Options => "method(actix_web::http::Method::OPTIONS)",
        HttpMethod::Head => "head()",
        HttpMethod::Patch => "patch()",
        HttpMethod::Trace => "trace()",
    }
}

/// `web::Path<(T,)>` with one tuple element per placeholder.
fn path_extractor(route: &RouteSpec) -> String {
    let types: Vec<&str> = route
        .parameters
        .iter()
        .map(|p| rust_slot_type(&p.slot))
        .collect();
    format!("web::Path<({},)>", types.join(", "))
}

fn rust_slot_type(slot: &str) -> &'static str {
    match slot {
        "int" | "int64" => "i64",
        "int32" => "i32",
        "uint" => "u64",
        "double" | "float" => "f64",
        "boolean" | "bool" => "bool",
        _ => "String",
    }
}
