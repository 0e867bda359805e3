#![deny(missing_docs)]

//! # Strategies
//!
//! This module defines the architecture for pluggable router generation.
//!
//! - **traits**: Defines `RouterStrategy` for implementing new routers.
//! - **crow**: C++ Crow, the default.
//! - **actix**: Rust actix-web.

pub mod actix;
pub mod crow;
pub mod traits;

// Re-export for easier access downstream
pub use actix::{ActixOptions, ActixStrategy};
pub use crow::{CrowOptions, CrowStrategy};
pub use traits::RouterStrategy;

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects a `RouterStrategy` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterKind {
    /// [`CrowStrategy`].
    #[default]
    Crow,
    /// [`ActixStrategy`].
    Actix,
}

impl RouterKind {
    /// Instantiates the selected strategy with its options.
    pub fn strategy(self, crow: &CrowOptions, actix: &ActixOptions) -> Box<dyn RouterStrategy> {
        match self {
            RouterKind::Crow => Box::new(CrowStrategy::new(crow.clone())),
            RouterKind::Actix => Box::new(ActixStrategy::new(actix.clone())),
        }
    }
}

impl FromStr for RouterKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crow" => Ok(RouterKind::Crow),
            "actix" | "actix-web" => Ok(RouterKind::Actix),
            other => Err(AppError::Config(format!(
                "Unknown router '{}' (expected 'crow' or 'actix')",
                other
            ))),
        }
    }
}

impl fmt::Display for RouterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterKind::Crow => write!(f, "crow"),
            RouterKind::Actix => write!(f, "actix"),
        }
    }
}
