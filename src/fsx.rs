//! Scoped file system collaborator
//!
//! Every path handed to the pipeline is relative to a repository root; the
//! trait keeps the core testable (extraction tests assert "no file reads")
//! and keeps all I/O confined to the scoped root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Scoped text-file access by root-relative path
pub trait FileSystem: Send + Sync {
    /// Reads a text file.
    ///
    /// Returns `Ok(None)` when the file does not exist, `Ok(Some(..))` when
    /// read, and `Err` when the file exists but cannot be read. Callers rely
    /// on the absent/unreadable distinction.
    fn read_text(&self, path: &Path) -> io::Result<Option<String>>;

    /// Writes a text file, creating parent directories as needed
    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Deletes a file; deleting a missing file is not an error
    fn delete(&self, path: &Path) -> io::Result<()>;

    /// Returns true if a file exists at the path
    fn exists(&self, path: &Path) -> bool;
}

/// File system implementation rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalFs {
    root: PathBuf,
}

impl LocalFs {
    /// Creates a file system scoped to `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The scoped root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl FileSystem for LocalFs {
    fn read_text(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(self.full(path)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_text(&self, path: &Path, contents: &str) -> io::Result<()> {
        let full = self.full(path);
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(full, contents)
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        match fs::remove_file(self.full(path)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.full(path).is_file()
    }
}
