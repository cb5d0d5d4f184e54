//! File matching collaborator
//!
//! The coordinator never inspects paths itself; a matcher decides which
//! candidate files belong to an ecosystem. The glob-capable engine lives
//! outside this crate; `NameMatcher` covers the base-name case the built-in
//! capabilities declare.

use crate::ecosystems::EcosystemRegistry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Selects the subset of candidate files relevant to one ecosystem
pub trait FileMatcher: Send + Sync {
    fn matching_files(&self, ecosystem: &str, candidates: &[PathBuf]) -> Vec<PathBuf>;
}

/// Matcher filtering candidates by the capability's declared manifest names
pub struct NameMatcher {
    names: HashMap<String, &'static [&'static str]>,
}

impl NameMatcher {
    /// Builds a matcher from the registry's manifest declarations
    pub fn from_registry(registry: &EcosystemRegistry) -> Self {
        Self {
            names: registry.manifest_names(),
        }
    }

    fn is_match(&self, ecosystem: &str, path: &Path) -> bool {
        let Some(names) = self.names.get(ecosystem) else {
            return false;
        };
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| names.contains(&name))
    }
}

impl FileMatcher for NameMatcher {
    fn matching_files(&self, ecosystem: &str, candidates: &[PathBuf]) -> Vec<PathBuf> {
        candidates
            .iter()
            .filter(|path| self.is_match(ecosystem, path))
            .cloned()
            .collect()
    }
}
