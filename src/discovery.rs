//! Candidate manifest file discovery
//!
//! Walks a repository directory and collects the root-relative paths of
//! every file whose base name any registered ecosystem declares. The
//! pipeline itself never scans directories; discovery feeds the candidate
//! file list into each `EcosystemConfig`.

use crate::ecosystems::EcosystemRegistry;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Directories never descended into
const SKIPPED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    "node_modules",
    "target",
    "deps",
    "_build",
    "vendor",
];

/// Collects candidate manifest files under `root`, sorted by path.
///
/// Unreadable directories are skipped rather than failing the scan; the
/// extraction stage tolerates files that vanish afterwards anyway.
pub fn discover_candidates(root: &Path, registry: &EcosystemRegistry) -> Vec<PathBuf> {
    let names: BTreeSet<&str> = registry
        .manifest_names()
        .into_values()
        .flatten()
        .copied()
        .collect();

    let mut found = Vec::new();
    walk(root, Path::new(""), &names, &mut found);
    found.sort();
    found
}

fn walk(root: &Path, relative: &Path, names: &BTreeSet<&str>, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(root.join(relative)) else {
        return;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let child = relative.join(name);
        let Ok(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            if name.starts_with('.') || SKIPPED_DIRS.contains(&name) {
                continue;
            }
            walk(root, &child, names, found);
        } else if file_type.is_file() && names.contains(name) {
            found.push(child);
        }
    }
}
