#![deny(missing_docs)]

//! # Router Strategy Trait
//!
//! Defines the interface required to render route bindings and the dispatch
//! map for a specific router (e.g. Crow, Actix).

use crate::routes::RouteSpec;

/// A strategy trait for decoupling router-specific code generation.
///
/// Implementors define the text surrounding the generated statements and the
/// shape of a single route registration and dispatch entry. Emitters call
/// these in route order and concatenate the results.
pub trait RouterStrategy {
    /// Short identifier used in logs and configuration (e.g. `crow`).
    fn name(&self) -> &'static str;

    // --- Route bindings ---

    /// Text emitted before the first route registration.
    fn routes_prologue(&self) -> String;

    /// Generates the registration statement for one route.
    ///
    /// The generated handler builds the request JSON (empty object or parsed
    /// body), copies every path parameter into it under its name, then calls
    /// the dispatcher with `route.dispatch_key`.
    fn route_registration_statement(&self, route: &RouteSpec) -> String;

    /// Text emitted after the last route registration.
    fn routes_epilogue(&self) -> String;

    // --- Dispatch map ---

    /// Text emitted before the first dispatch entry.
    fn dispatch_prologue(&self) -> String;

    /// Generates the `dispatch_key -> handler` entry for one route.
    fn dispatch_entry(&self, route: &RouteSpec) -> String;

    /// Text emitted after the last dispatch entry.
    fn dispatch_epilogue(&self) -> String;
}
