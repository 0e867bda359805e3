#![deny(missing_docs)]

//! # Route Generator
//!
//! Renders the route binding artifact: one registration per route, in route
//! order, wrapped in the strategy's prologue and epilogue. Each generated
//! handler forwards the request JSON to the single dispatcher under the
//! route's dispatch key.

use crate::routes::RouteSpec;
use crate::strategies::RouterStrategy;

/// Emits the route bindings for `routes`.
///
/// # Arguments
///
/// * `routes` - Route table in construction order.
/// * `strategy` - The router strategy to use for registration syntax.
pub fn emit_route_bindings(routes: &[RouteSpec], strategy: &dyn RouterStrategy) -> String {
    let mut code = strategy.routes_prologue();
    for route in routes {
        code.push_str(&strategy.route_registration_statement(route));
    }
    code.push_str(&strategy.routes_epilogue());

    tracing::debug!(
        router = strategy.name(),
        routes = routes.len(),
        "emitted route bindings"
    );
    code
}
