//! Pipeline error types using thiserror
//!
//! Error taxonomy:
//! - LockError: lock file resolution failures (unreadable is distinct from absent)
//! - ExecError: external command execution failures, including the transient signal
//! - TransientError: the single distinguished signal propagated for upstream retry
//! - ExtractError: extraction coordination failures surfaced by the driver

use std::path::PathBuf;
use thiserror::Error;

/// Lock file resolution errors
///
/// "Does not exist" is not an error and never appears here; only a lock file
/// that exists but cannot be read produces a `LockError`.
#[derive(Error, Debug)]
pub enum LockError {
    /// Lock file exists at the path but could not be read
    #[error("lock file {path} exists but is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LockError {
    /// Creates a new Unreadable error
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LockError::Unreadable {
            path: path.into(),
            source,
        }
    }

    /// Path of the offending lock file
    pub fn path(&self) -> &PathBuf {
        match self {
            LockError::Unreadable { path, .. } => path,
        }
    }
}

/// Distinguished transient infrastructure failure
///
/// Re-raised unchanged through the artifact updater so an upstream retry
/// policy can re-invoke the whole pipeline; never converted into an
/// artifact error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transient infrastructure failure: {message}")]
pub struct TransientError {
    pub message: String,
}

impl TransientError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// External command execution errors
#[derive(Error, Debug)]
pub enum ExecError {
    /// Transient infrastructure failure; propagated, never classified
    #[error(transparent)]
    Transient(#[from] TransientError),

    /// Command ran and exited unsuccessfully
    #[error("command '{command}' failed with status {status}: {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// Command could not be started
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExecError {
    /// Creates a new Failed error
    pub fn failed(command: impl Into<String>, status: i32, stderr: impl Into<String>) -> Self {
        ExecError::Failed {
            command: command.into(),
            status,
            stderr: stderr.into(),
        }
    }

    /// Creates a new Spawn error
    pub fn spawn(command: impl Into<String>, source: std::io::Error) -> Self {
        ExecError::Spawn {
            command: command.into(),
            source,
        }
    }

    /// Returns true for the distinguished transient signal
    pub fn is_transient(&self) -> bool {
        matches!(self, ExecError::Transient(_))
    }
}

/// Extraction coordination errors surfaced by the driver
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No capability registered for the ecosystem identifier
    #[error("no extractor registered for ecosystem '{ecosystem}'")]
    UnknownEcosystem { ecosystem: String },
}

impl ExtractError {
    /// Creates a new UnknownEcosystem error
    pub fn unknown_ecosystem(ecosystem: impl Into<String>) -> Self {
        ExtractError::UnknownEcosystem {
            ecosystem: ecosystem.into(),
        }
    }
}
