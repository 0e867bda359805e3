#![deny(missing_docs)]

//! # Route Model
//!
//! - **models**: `RouteSpec`, `RouteParam`, `DispatchPolicy`.
//! - **builder**: `build_routes`, the fold from operations to routes.
//! - **naming**: Placeholder scanning, dispatch-key stems, snake_case.

pub mod builder;
pub mod models;
pub mod naming;

pub use builder::{build_routes, slot_type};
pub use models::{DispatchPolicy, RouteParam, RouteSpec};
