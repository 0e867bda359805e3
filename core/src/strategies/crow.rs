#![deny(missing_docs)]

//! # Crow Strategy
//!
//! Renders C++ `CROW_ROUTE` bindings and `std::map` handler registrations
//! for a Crow based daemon. Both artifacts are meant to be `#include`d inside
//! a member function of the daemon class.

use crate::oas::HttpMethod;
use crate::routes::naming::substitute_placeholders;
use crate::routes::RouteSpec;
use crate::strategies::traits::RouterStrategy;
use serde::{Deserialize, Serialize};

const GENERATED_HEADER: &str = "// Generated by routegen. Do not edit.\n\n";

/// Names used in the generated C++ code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrowOptions {
    /// The `crow::SimpleApp` variable routes are attached to.
    pub app: String,
    /// Member function every route delegates to.
    pub dispatcher: String,
    /// Member map from dispatch key to handler.
    pub handler_table: String,
    /// Member holding the controller whose methods implement the operations.
    pub controller: String,
}

impl Default for CrowOptions {
    fn default() -> Self {
        Self {
            app: "app".into(),
            dispatcher: "genericRequestHandler".into(),
            handler_table: "request_handlers".into(),
            controller: "controller".into(),
        }
    }
}

/// Strategy for generating Crow (C++) route and dispatch code.
#[derive(Debug, Clone, Default)]
pub struct CrowStrategy {
    options: CrowOptions,
}

impl CrowStrategy {
    /// Creates a strategy with the given naming options.
    pub fn new(options: CrowOptions) -> Self {
        Self { options }
    }
}

impl RouterStrategy for CrowStrategy {
    fn name(&self) -> &'static str {
        "crow"
    }

    fn routes_prologue(&self) -> String {
        GENERATED_HEADER.to_string()
    }

    fn route_registration_statement(&self, route: &RouteSpec) -> String {
        let mut lambda_args = vec!["const crow::request& req".to_string()];
        for param in &route.parameters {
            lambda_args.push(format!("{} {}", cpp_slot_type(&param.slot), param.name));
        }

        let request_json = if route.method.carries_body() {
            "json::parse(req.body)"
        } else {
            "json::object()"
        };

        let slots: Vec<String> = route
            .parameters
            .iter()
            .map(|p| crow_placeholder(&p.slot).to_string())
            .collect();
        let pattern = substitute_placeholders(&route.path, &slots);

        let mut code = String::new();
        code.push_str(&format!(
            "\tCROW_ROUTE({}, \"{}\").methods(crow::HTTPMethod::{})\n",
            self.options.app,
            pattern,
            crow_method(route.method)
        ));
        code.push_str(&format!("\t\t([this]({}){{\n", lambda_args.join(", ")));
        code.push_str(&format!("\t\t\tjson req_json = {};\n", request_json));
        for param in &route.parameters {
            code.push_str(&format!(
                "\t\t\treq_json[\"{}\"] = {};\n",
                param.name, param.name
            ));
        }
        code.push_str("\t\t\tcrow::response res;\n");
        code.push_str(&format!(
            "\t\t\tthis->{}(req_json, res, \"{}\");\n",
            self.options.dispatcher, route.dispatch_key
        ));
        code.push_str("\t\t\treturn res;\n");
        code.push_str("\t\t});\n\n");
        code
    }

    fn routes_epilogue(&self) -> String {
        String::new()
    }

    fn dispatch_prologue(&self) -> String {
        GENERATED_HEADER.to_string()
    }

    fn dispatch_entry(&self, route: &RouteSpec) -> String {
        format!(
            "\t{}[\"{}\"] = [this](json data) {{ return this->{}->{}(std::move(data)); }};\n",
            self.options.handler_table,
            route.dispatch_key,
            self.options.controller,
            route.operation_id
        )
    }

    fn dispatch_epilogue(&self) -> String {
        String::new()
    }
}

fn crow_method(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "Get",
        HttpMethod::Put => "Put",
        HttpMethod::Post => "Post",
        HttpMethod::Delete => "Delete",
        HttpMethod::Options => "Options",
        HttpMethod::Head => "Head",
        HttpMethod::Patch => "Patch",
        HttpMethod::Trace => "Trace",
    }
}

/// Placeholder Crow understands for a slot. Must agree with [`cpp_slot_type`].
fn crow_placeholder(slot: &str) -> &'static str {
    match slot {
        "int" => "int",
        "uint" => "uint",
        "double" | "float" => "double",
        _ => "string",
    }
}

/// C++ lambda parameter type for a slot. Crow only parses `int`, `uint`,
/// `double` and `string`; anything else is received as a string.
fn cpp_slot_type(slot: &str) -> &'static str {
    match slot {
        "int" => "int",
        "uint" => "unsigned int",
        "double" | "float" => "double",
        _ => "const std::string&",
    }
}
