//! Rust (cargo) ecosystem capability
//!
//! Cargo workspaces share one Cargo.lock across member manifests, so this
//! capability implements the whole-fileset extraction shape: every matched
//! Cargo.toml is handled in a single pass.
//!
//! Handles:
//! - dependencies / dev-dependencies / build-dependencies
//! - workspace.dependencies on the root manifest
//! - Inline table form: { version = "1.0" }

use super::{EcosystemCapability, ExtractorKind, FileSetExtractor, UpdaterCapability};
use crate::domain::{Dependency, ExtractConfig, ToolConstraint, UpdateConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;
use toml::{Table, Value};

/// Cargo.toml file-set extractor and cargo updater
pub struct CargoCapability;

impl CargoCapability {
    /// Builds the full capability pair for the registry
    pub fn capability() -> EcosystemCapability {
        EcosystemCapability {
            extractor: ExtractorKind::FileSet(Box::new(CargoCapability)),
            updater: Box::new(CargoCapability),
        }
    }
}

/// Version requirement of one dependency entry, if it declares a registry
/// version (path/git-only entries carry none)
fn requirement_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(req) => Some(req),
        Value::Table(table) => table.get("version").and_then(Value::as_str),
        _ => None,
    }
}

fn collect_table(table: &Table, key: &str, dep_type: &str, deps: &mut Vec<Dependency>) {
    let Some(entries) = table.get(key).and_then(Value::as_table) else {
        return;
    };
    for (name, value) in entries {
        let Some(requirement) = requirement_of(value) else {
            continue;
        };
        deps.push(
            Dependency::new(name)
                .with_current_value(requirement)
                .with_replace_string(format!("\"{}\"", requirement))
                .with_datasource("crates-io")
                .with_dep_type(dep_type),
        );
    }
}

fn extract_one(content: &str) -> Vec<Dependency> {
    // A manifest is a document, not a bare value; parse the whole table.
    let Ok(toml) = content.parse::<Table>() else {
        return Vec::new();
    };

    let mut deps = Vec::new();
    collect_table(&toml, "dependencies", "prod", &mut deps);
    collect_table(&toml, "dev-dependencies", "dev", &mut deps);
    collect_table(&toml, "build-dependencies", "build", &mut deps);
    if let Some(workspace) = toml.get("workspace").and_then(Value::as_table) {
        collect_table(workspace, "dependencies", "workspace", &mut deps);
    }
    deps
}

impl FileSetExtractor for CargoCapability {
    fn extract_all(
        &self,
        files: &[(PathBuf, String)],
        _config: &ExtractConfig,
    ) -> Option<BTreeMap<PathBuf, Vec<Dependency>>> {
        let mut results = BTreeMap::new();
        for (path, content) in files {
            let deps = extract_one(content);
            if !deps.is_empty() {
                results.insert(path.clone(), deps);
            }
        }
        if results.is_empty() {
            None
        } else {
            Some(results)
        }
    }
}

impl UpdaterCapability for CargoCapability {
    fn manifest_file_names(&self) -> &'static [&'static str] {
        &["Cargo.toml"]
    }

    fn lock_file_name(&self) -> &'static str {
        "Cargo.lock"
    }

    fn update_command(&self, quoted_deps: &[String]) -> String {
        let packages: Vec<String> = quoted_deps.iter().map(|d| format!("-p {}", d)).collect();
        format!("cargo update {}", packages.join(" "))
    }

    fn maintenance_command(&self) -> String {
        "cargo update".to_string()
    }

    fn extra_env(&self, config: &UpdateConfig) -> Vec<(String, String)> {
        match &config.cache_dir {
            Some(dir) => vec![(
                "CARGO_HOME".to_string(),
                format!("{}/cargo", dir.display()),
            )],
            None => Vec::new(),
        }
    }

    fn tool_constraints(&self, config: &UpdateConfig) -> Vec<ToolConstraint> {
        config
            .constraint("rust")
            .map(|req| vec![ToolConstraint::new("rust", req)])
            .unwrap_or_default()
    }
}
