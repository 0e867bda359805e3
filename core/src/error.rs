//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Every input problem maps to exactly one variant so the CLI can report the
//! offending file, line range or identifier and abort before anything is written.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`; the domain variants must be built explicitly.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Malformed or incomplete OpenAPI input (bad JSON, reference cycle,
    /// missing operationId, parameter without a type).
    #[from(ignore)]
    #[display("Schema Error: {_0}")]
    Schema(String),

    /// JSON inside a documentation block failed to parse.
    #[from(ignore)]
    #[display(
        "Annotation Syntax Error in {} (lines {begin_line}-{end_line}): {message}",
        file.display()
    )]
    AnnotationSyntax {
        /// Source file containing the block.
        file: PathBuf,
        /// Line of the begin sentinel (1-based).
        begin_line: usize,
        /// Line of the end sentinel (1-based).
        end_line: usize,
        /// Parser diagnostic.
        message: String,
    },

    /// Unbalanced or misplaced begin/end sentinels.
    #[from(ignore)]
    #[display("Annotation Structure Error in {}:{line}: {message}", file.display())]
    AnnotationStructure {
        /// Source file containing the sentinel.
        file: PathBuf,
        /// Offending line (1-based).
        line: usize,
        /// What was expected at that point.
        message: String,
    },

    /// A route could not be synthesized, or an internal invariant broke.
    #[from(ignore)]
    #[display("Build Error: {_0}")]
    Build(String),

    /// Invalid generator configuration.
    #[from(ignore)]
    #[display("Config Error: {_0}")]
    Config(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
