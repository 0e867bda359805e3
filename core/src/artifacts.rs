#![deny(missing_docs)]

//! # Artifact Writer
//!
//! Writes generated files all-or-nothing: every artifact is first staged to
//! a temporary file next to its destination, and destinations are replaced
//! only once all staging succeeded. If a later replacement fails, the
//! destinations already replaced get their previous contents back.

use crate::error::{AppError, AppResult};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A generated file and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Destination path.
    pub path: PathBuf,
    /// Full file contents.
    pub contents: String,
}

impl Artifact {
    /// Creates an artifact.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Stages then persists every artifact.
///
/// A staging failure leaves all destinations untouched. A persist failure
/// restores the destinations persisted before it. The restore itself is
/// best effort; its failures are logged.
pub fn write_artifacts(artifacts: &[Artifact]) -> AppResult<()> {
    let mut staged = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let previous = snapshot(&artifact.path)?;
        staged.push((stage(artifact)?, artifact.path.as_path(), previous));
    }

    let mut persisted: Vec<(&Path, Option<Vec<u8>>)> = Vec::with_capacity(staged.len());
    for (file, path, previous) in staged {
        if let Err(e) = file.persist(path) {
            restore(&persisted);
            return Err(AppError::General(format!(
                "Failed to write {:?}: {}",
                path, e.error
            )));
        }
        tracing::info!(path = %path.display(), "wrote artifact");
        persisted.push((path, previous));
    }
    Ok(())
}

/// Current contents of a destination, `None` when it does not exist.
fn snapshot(path: &Path) -> AppResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::General(format!(
            "Failed to read existing {:?}: {}",
            path, e
        ))),
    }
}

fn restore(persisted: &[(&Path, Option<Vec<u8>>)]) {
    for (path, previous) in persisted.iter().rev() {
        let result = match previous {
            Some(bytes) => fs::write(path, bytes),
            None => fs::remove_file(path),
        };
        match result {
            Ok(()) => tracing::warn!(path = %path.display(), "rolled back artifact"),
            Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to roll back artifact"),
        }
    }
}

fn stage(artifact: &Artifact) -> AppResult<NamedTempFile> {
    let dir = staging_dir(&artifact.path);
    fs::create_dir_all(dir)?;
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(artifact.contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}

fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Returns the destinations whose contents differ from the generated text,
/// including ones that do not exist yet.
pub fn stale_artifacts(artifacts: &[Artifact]) -> AppResult<Vec<PathBuf>> {
    let mut stale = Vec::new();
    for artifact in artifacts {
        let up_to_date = match fs::read_to_string(&artifact.path) {
            Ok(existing) => existing == artifact.contents,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };
        if !up_to_date {
            tracing::debug!(path = %artifact.path.display(), "artifact is stale");
            stale.push(artifact.path.clone());
        }
    }
    Ok(stale)
}
