//! Artifact update request and result shapes

use super::{Dependency, UpdateConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Immutable input to one artifact update invocation
#[derive(Debug, Clone)]
pub struct UpdateArtifactRequest {
    /// Manifest path, relative to the repository root
    pub manifest_path: PathBuf,
    /// Dependencies whose versions changed, in manifest order
    pub updated_deps: Vec<Dependency>,
    /// Full new manifest content to write before regeneration
    pub new_manifest_content: String,
    /// Run configuration (maintenance flag, tool constraints, cache dir)
    pub config: UpdateConfig,
}

impl UpdateArtifactRequest {
    pub fn new(
        manifest_path: impl Into<PathBuf>,
        updated_deps: Vec<Dependency>,
        new_manifest_content: impl Into<String>,
        config: UpdateConfig,
    ) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            updated_deps,
            new_manifest_content: new_manifest_content.into(),
            config,
        }
    }
}

/// Resolved lock file for one manifest
///
/// Derived per invocation and never persisted. `umbrella` is set when the
/// lock file was found in an ancestor directory rather than beside the
/// manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockFileState {
    /// Resolved lock file path, relative to the repository root
    pub path: PathBuf,
    /// Existing content, or `None` when no lock file exists anywhere
    pub content: Option<String>,
    /// True when the lock file is shared from an ancestor directory
    pub umbrella: bool,
}

impl LockFileState {
    /// Lock file found beside the manifest
    pub fn sibling(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content: Some(content),
            umbrella: false,
        }
    }

    /// Lock file found in an ancestor directory (umbrella layout)
    pub fn umbrella(path: impl Into<PathBuf>, content: String) -> Self {
        Self {
            path: path.into(),
            content: Some(content),
            umbrella: true,
        }
    }

    /// No lock file exists; `path` is where a sibling one would live
    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: None,
            umbrella: false,
        }
    }
}

/// Per-manifest failure record returned instead of raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactError {
    /// Lock file path the failure relates to
    pub lock_file: PathBuf,
    /// Diagnostic text (I/O error, or failed command plus its stderr)
    pub message: String,
}

impl ArtifactError {
    pub fn new(lock_file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            lock_file: lock_file.into(),
            message: message.into(),
        }
    }
}

/// New file content produced by a successful regeneration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAddition {
    /// Lock file path, relative to the repository root
    pub path: PathBuf,
    /// Full new contents
    pub contents: String,
}

/// Outcome of one artifact update invocation
///
/// The updater returns `Option<ArtifactResult>`; `None` is the no-op signal,
/// and an invocation never produces more than one of these shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArtifactResult {
    /// The update failed locally; the run continues with other manifests
    Error(ArtifactError),
    /// The lock file changed; `contents` is the regenerated file
    Addition(FileAddition),
}

impl ArtifactResult {
    /// Shorthand for an error result
    pub fn error(lock_file: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ArtifactResult::Error(ArtifactError::new(lock_file, message))
    }

    /// Shorthand for a file-addition result
    pub fn addition(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        ArtifactResult::Addition(FileAddition {
            path: path.into(),
            contents: contents.into(),
        })
    }

    /// Returns true for the error shape
    pub fn is_error(&self) -> bool {
        matches!(self, ArtifactResult::Error(_))
    }
}
