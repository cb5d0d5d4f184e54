//! Extraction Coordinator
//!
//! For each configured ecosystem: filter by enablement, obtain matching
//! files, read their content, dispatch to the ecosystem's extraction
//! capability (per-file or whole-fileset) and normalize the results into
//! uniform dependency records. Reads only; never writes.

mod matcher;

pub use matcher::{FileMatcher, NameMatcher};

use crate::domain::{Dependency, EcosystemConfig, PackageFileResult};
use crate::ecosystems::{EcosystemRegistry, ExtractorKind};
use crate::error::ExtractError;
use crate::fsx::FileSystem;
use std::path::PathBuf;
use tracing::debug;

/// Runs one ecosystem's extraction pass.
///
/// Returns an empty sequence without touching the file system when the
/// ecosystem is disabled or excluded by the run's allow-list. Matched files
/// whose content cannot be read are skipped silently; this mirrors the
/// tolerance for files deleted between listing and read. Files yielding no
/// dependencies are omitted from the result entirely.
pub fn extract(
    config: &EcosystemConfig,
    registry: &EcosystemRegistry,
    matcher: &dyn FileMatcher,
    fs: &dyn FileSystem,
) -> Result<Vec<PackageFileResult>, ExtractError> {
    if !config.enabled || !config.extract.allows(&config.ecosystem) {
        return Ok(Vec::new());
    }

    let capability = registry
        .get(&config.ecosystem)
        .ok_or_else(|| ExtractError::unknown_ecosystem(&config.ecosystem))?;

    let matched = matcher.matching_files(&config.ecosystem, &config.file_list);

    let mut files: Vec<(PathBuf, String)> = Vec::with_capacity(matched.len());
    for path in matched {
        match fs.read_text(&path) {
            Ok(Some(content)) => files.push((path, content)),
            Ok(None) => debug!(path = %path.display(), "matched file vanished, skipping"),
            Err(e) => debug!(path = %path.display(), error = %e, "matched file unreadable, skipping"),
        }
    }

    let results = match &capability.extractor {
        ExtractorKind::PerFile(extractor) => {
            let mut results = Vec::new();
            for (path, content) in &files {
                let deps = extractor
                    .extract(content, path, &config.extract)
                    .unwrap_or_default();
                if let Some(result) = package_file_result(path.clone(), deps) {
                    results.push(result);
                }
            }
            results
        }
        ExtractorKind::FileSet(extractor) => {
            let mut by_path = extractor
                .extract_all(&files, &config.extract)
                .unwrap_or_default();
            // Emit in matched-file order, not map order.
            files
                .iter()
                .filter_map(|(path, _)| {
                    let deps = by_path.remove(path)?;
                    package_file_result(path.clone(), deps)
                })
                .collect()
        }
    };

    Ok(results)
}

/// Normalizes extracted dependencies; empty files produce no result at all
fn package_file_result(path: PathBuf, deps: Vec<Dependency>) -> Option<PackageFileResult> {
    if deps.is_empty() {
        return None;
    }
    let deps = deps.into_iter().map(Dependency::normalize).collect();
    Some(PackageFileResult::new(path, deps))
}
