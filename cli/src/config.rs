#![deny(missing_docs)]

//! # Configuration
//!
//! Optional `routegen.yaml` file. Every key is optional; command line flags
//! take precedence over file values. Unknown keys and empty sentinels are
//! rejected.
//!
//! ```yaml
//! router: crow
//! non_dispatchable: [startSimulation]
//! annotations:
//!   begin_marker: BEGIN_REST_API_DOCUMENTATION
//!   end_marker: END_REST_API_DOCUMENTATION
//!   extensions: [cpp, h]
//! crow:
//!   dispatcher: genericRequestHandler
//! ```

use routegen_core::{ActixOptions, AnnotationSyntax, AppError, AppResult, CrowOptions, RouterKind};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Router strategy.
    pub router: Option<RouterKind>,
    /// Operation ids excluded from the dispatch map.
    pub non_dispatchable: Vec<String>,
    /// Documentation title.
    pub title: Option<String>,
    /// Source scanning options.
    pub annotations: AnnotationConfig,
    /// Crow naming options.
    pub crow: CrowOptions,
    /// Actix path options.
    pub actix: ActixOptions,
}

/// Sentinels, comment leaders and which files to scan.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotationConfig {
    /// Marker opening a block.
    pub begin_marker: String,
    /// Marker closing a block.
    pub end_marker: String,
    /// Per-line comment leaders stripped from block lines.
    pub comment_leaders: Vec<String>,
    /// Extensions scanned when a source path is a directory.
    pub extensions: Vec<String>,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        let AnnotationSyntax {
            begin_marker,
            end_marker,
            comment_leaders,
        } = AnnotationSyntax::default();
        Self {
            begin_marker,
            end_marker,
            comment_leaders,
            extensions: ["cpp", "cc", "cxx", "h", "hpp", "rs"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl AnnotationConfig {
    /// Sentinels and leaders handed to the extractor.
    pub fn syntax(&self) -> AnnotationSyntax {
        AnnotationSyntax {
            begin_marker: self.begin_marker.clone(),
            end_marker: self.end_marker.clone(),
            comment_leaders: self.comment_leaders.clone(),
        }
    }
}

impl GeneratorConfig {
    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read config {:?}: {}", path, e)))?;
        let config: GeneratorConfig = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("Invalid config {:?}: {}", path, e)))?;
        config
            .validate()
            .map_err(|msg| AppError::Config(format!("Invalid config {:?}: {}", path, msg)))?;
        tracing::debug!(config = %path.display(), "loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        let markers = [
            ("annotations.begin_marker", &self.annotations.begin_marker),
            ("annotations.end_marker", &self.annotations.end_marker),
        ];
        for (key, marker) in markers {
            if marker.trim().is_empty() {
                return Err(format!("{} must not be empty", key));
            }
        }
        if self.annotations.begin_marker == self.annotations.end_marker {
            return Err("annotations.begin_marker and annotations.end_marker must differ".into());
        }
        Ok(())
    }
}
