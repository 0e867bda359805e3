#![deny(missing_docs)]

//! # Dispatch Map Generator
//!
//! Renders the `dispatch_key -> handler` table consumed by the dispatcher.
//! Routes excluded by the dispatch policy get no entry; their handler is
//! registered by hand.

use crate::routes::RouteSpec;
use crate::strategies::RouterStrategy;

/// Emits the dispatch map for the dispatchable subset of `routes`.
pub fn emit_dispatch_map(routes: &[RouteSpec], strategy: &dyn RouterStrategy) -> String {
    let mut code = strategy.dispatch_prologue();
    let mut entries = 0usize;
    for route in routes.iter().filter(|r| r.dispatchable) {
        code.push_str(&strategy.dispatch_entry(route));
        entries += 1;
    }
    code.push_str(&strategy.dispatch_epilogue());

    tracing::debug!(
        router = strategy.name(),
        entries,
        skipped = routes.len() - entries,
        "emitted dispatch map"
    );
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oas::HttpMethod;
    use crate::strategies::{ActixStrategy, CrowStrategy};

    fn route(id: &str, key: &str, dispatchable: bool) -> RouteSpec {
        RouteSpec {
            path: format!("/simulation/{}", id),
            method: HttpMethod::Get,
            pattern: format!("/simulation/{}", id),
            parameters: vec![],
            request_schema: None,
            dispatch_key: key.into(),
            operation_id: id.into(),
            dispatchable,
            summary: None,
        }
    }

    #[test]
    fn test_one_entry_per_dispatchable_route() {
        let routes = vec![
            route("startSimulation", "startSimulation_0", false),
            route("getTime", "getTime_1", true),
            route("getHost", "getHost_2", true),
        ];
        let code = emit_dispatch_map(&routes, &CrowStrategy::default());
        assert_eq!(code.matches("request_handlers[").count(), 2);
        assert_eq!(code.matches("\"getTime_1\"").count(), 1);
        assert_eq!(code.matches("\"getHost_2\"").count(), 1);
        assert!(!code.contains("startSimulation"));
    }

    #[test]
    fn test_actix_dispatch_map() {
        let routes = vec![route("getTime", "getTime_0", true)];
        let code = emit_dispatch_map(&routes, &ActixStrategy::default());
        assert!(code.contains("handlers.insert(\"getTime_0\", crate::controller::get_time);"));
        assert!(code.ends_with("    handlers\n}\n"));
    }
}
