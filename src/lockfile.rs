//! Lock file resolution with umbrella project support
//!
//! A manifest's lock file normally sits beside it. Umbrella/monorepo layouts
//! share a single lock file in an ancestor directory instead, so resolution
//! walks up the tree when no sibling lock exists. "Exists but unreadable" is
//! a hard error, distinct from "does not exist".

use crate::domain::LockFileState;
use crate::error::LockError;
use crate::fsx::FileSystem;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves the lock file for a manifest.
///
/// Paths are repository-root-relative; the ancestor walk stops at the root.
pub fn resolve_lock(
    fs: &dyn FileSystem,
    manifest_path: &Path,
    lock_file_name: &str,
) -> Result<LockFileState, LockError> {
    let manifest_dir = manifest_path.parent().unwrap_or(Path::new(""));
    let sibling = manifest_dir.join(lock_file_name);

    match fs.read_text(&sibling) {
        Ok(Some(content)) => return Ok(LockFileState::sibling(sibling, content)),
        Ok(None) => {}
        Err(e) => return Err(LockError::unreadable(sibling, e)),
    }

    // No sibling lock; search ancestors for a shared one.
    let mut dir: Option<&Path> = manifest_dir.parent();
    while let Some(ancestor) = dir {
        let candidate: PathBuf = ancestor.join(lock_file_name);
        match fs.read_text(&candidate) {
            Ok(Some(content)) => {
                debug!(
                    manifest = %manifest_path.display(),
                    lock = %candidate.display(),
                    "resolved umbrella lock file"
                );
                return Ok(LockFileState::umbrella(candidate, content));
            }
            Ok(None) => {}
            Err(e) => return Err(LockError::unreadable(candidate, e)),
        }
        dir = ancestor.parent();
    }

    Ok(LockFileState::missing(sibling))
}
