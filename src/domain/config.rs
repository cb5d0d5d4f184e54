//! Ecosystem and run configuration types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Extraction-pass configuration shared across ecosystems in one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Explicit allow-list of ecosystem identifiers; `None` allows all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_ecosystems: Option<Vec<String>>,
}

impl ExtractConfig {
    /// Returns true if this ecosystem passes the allow-list
    pub fn allows(&self, ecosystem: &str) -> bool {
        match &self.enabled_ecosystems {
            Some(allowed) => allowed.iter().any(|e| e == ecosystem),
            None => true,
        }
    }
}

/// Per-ecosystem input to one extraction pass
///
/// Constructed by an upstream discovery stage and consumed once; never
/// mutated by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcosystemConfig {
    /// Ecosystem identifier (registry key, e.g. "mix", "cargo", "npm")
    pub ecosystem: String,
    /// Whether this ecosystem is enabled for the run
    pub enabled: bool,
    /// Candidate file list for the whole repository, root-relative
    pub file_list: Vec<PathBuf>,
    /// Shared extraction configuration
    pub extract: ExtractConfig,
}

impl EcosystemConfig {
    /// Creates an enabled config with the given candidate files
    pub fn new(ecosystem: impl Into<String>, file_list: Vec<PathBuf>) -> Self {
        Self {
            ecosystem: ecosystem.into(),
            enabled: true,
            file_list,
            extract: ExtractConfig::default(),
        }
    }

    /// Sets the enabled flag (builder pattern)
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets the shared extraction configuration
    pub fn with_extract(mut self, extract: ExtractConfig) -> Self {
        self.extract = extract;
        self
    }
}

/// A version requirement for a toolchain the ecosystem's tooling depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConstraint {
    /// Tool name (e.g. "elixir", "erlang", "node")
    pub tool: String,
    /// Version requirement string, passed through to the execution layer
    pub constraint: String,
}

impl ToolConstraint {
    pub fn new(tool: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            constraint: constraint.into(),
        }
    }
}

/// Run configuration for one artifact update invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateConfig {
    /// Maintenance mode: regenerate the whole lock file instead of updating
    /// only the named dependencies
    pub maintenance: bool,
    /// Tool-version constraints keyed by tool name
    pub constraints: BTreeMap<String, String>,
    /// Private cache directory handed to the external tool via environment
    pub cache_dir: Option<PathBuf>,
}

impl UpdateConfig {
    /// Creates a non-maintenance config with no constraints
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables maintenance mode (builder pattern)
    pub fn with_maintenance(mut self, maintenance: bool) -> Self {
        self.maintenance = maintenance;
        self
    }

    /// Adds a tool-version constraint
    pub fn with_constraint(mut self, tool: impl Into<String>, req: impl Into<String>) -> Self {
        self.constraints.insert(tool.into(), req.into());
        self
    }

    /// Sets the private cache directory
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Constraint for one tool, if configured
    pub fn constraint(&self, tool: &str) -> Option<&str> {
        self.constraints.get(tool).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_config_allows_all_by_default() {
        let config = ExtractConfig::default();
        assert!(config.allows("mix"));
        assert!(config.allows("cargo"));
    }

    #[test]
    fn test_extract_config_allow_list() {
        let config = ExtractConfig {
            enabled_ecosystems: Some(vec!["mix".to_string()]),
        };
        assert!(config.allows("mix"));
        assert!(!config.allows("cargo"));
    }

    #[test]
    fn test_extract_config_empty_allow_list_excludes_everything() {
        let config = ExtractConfig {
            enabled_ecosystems: Some(Vec::new()),
        };
        assert!(!config.allows("mix"));
    }

    #[test]
    fn test_ecosystem_config_builder() {
        let config = EcosystemConfig::new("mix", vec![PathBuf::from("mix.exs")])
            .with_enabled(false);
        assert_eq!(config.ecosystem, "mix");
        assert!(!config.enabled);
        assert_eq!(config.file_list.len(), 1);
    }

    #[test]
    fn test_update_config_builder() {
        let config = UpdateConfig::new()
            .with_maintenance(true)
            .with_constraint("elixir", "1.16.2")
            .with_cache_dir("/tmp/cache");
        assert!(config.maintenance);
        assert_eq!(config.constraint("elixir"), Some("1.16.2"));
        assert_eq!(config.constraint("erlang"), None);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/cache")));
    }

    #[test]
    fn test_tool_constraint_new() {
        let constraint = ToolConstraint::new("node", ">=20");
        assert_eq!(constraint.tool, "node");
        assert_eq!(constraint.constraint, ">=20");
    }
}
