//! Node.js (npm) ecosystem capability
//!
//! Handles:
//! - dependencies / devDependencies / optionalDependencies
//! - lock-only regeneration via `npm install --package-lock-only`

use super::{EcosystemCapability, ExtractorKind, PackageFileExtractor, UpdaterCapability};
use crate::domain::{Dependency, ExtractConfig, ToolConstraint, UpdateConfig};
use serde_json::Value;
use std::path::Path;

/// package.json extractor and npm updater
pub struct NpmCapability;

impl NpmCapability {
    /// Builds the full capability pair for the registry
    pub fn capability() -> EcosystemCapability {
        EcosystemCapability {
            extractor: ExtractorKind::PerFile(Box::new(NpmCapability)),
            updater: Box::new(NpmCapability),
        }
    }
}

fn collect_object(json: &Value, key: &str, dep_type: &str, deps: &mut Vec<Dependency>) {
    let Some(entries) = json.get(key).and_then(Value::as_object) else {
        return;
    };
    for (name, value) in entries {
        let Some(requirement) = value.as_str() else {
            continue;
        };
        // file:/link: specifiers have no registry counterpart.
        if requirement.starts_with("file:") || requirement.starts_with("link:") {
            continue;
        }
        deps.push(
            Dependency::new(name)
                .with_current_value(requirement)
                .with_replace_string(format!("\"{}\"", requirement))
                .with_datasource("npm")
                .with_dep_type(dep_type),
        );
    }
}

impl PackageFileExtractor for NpmCapability {
    fn extract(
        &self,
        content: &str,
        _path: &Path,
        _config: &ExtractConfig,
    ) -> Option<Vec<Dependency>> {
        let json: Value = serde_json::from_str(content).ok()?;

        let mut deps = Vec::new();
        collect_object(&json, "dependencies", "prod", &mut deps);
        collect_object(&json, "devDependencies", "dev", &mut deps);
        collect_object(&json, "optionalDependencies", "optional", &mut deps);

        if deps.is_empty() {
            None
        } else {
            Some(deps)
        }
    }
}

impl UpdaterCapability for NpmCapability {
    fn manifest_file_names(&self) -> &'static [&'static str] {
        &["package.json"]
    }

    fn lock_file_name(&self) -> &'static str {
        "package-lock.json"
    }

    fn update_command(&self, quoted_deps: &[String]) -> String {
        format!(
            "npm install --package-lock-only {}",
            quoted_deps.join(" ")
        )
    }

    fn maintenance_command(&self) -> String {
        "npm install --package-lock-only".to_string()
    }

    fn extra_env(&self, config: &UpdateConfig) -> Vec<(String, String)> {
        match &config.cache_dir {
            Some(dir) => vec![(
                "npm_config_cache".to_string(),
                format!("{}/npm", dir.display()),
            )],
            None => Vec::new(),
        }
    }

    fn tool_constraints(&self, config: &UpdateConfig) -> Vec<ToolConstraint> {
        config
            .constraint("node")
            .map(|req| vec![ToolConstraint::new("node", req)])
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKAGE_JSON: &str = r#"{
  "name": "app",
  "dependencies": {
    "express": "^4.19.0",
    "local": "file:../local"
  },
  "devDependencies": {
    "jest": "~29.7.0"
  },
  "optionalDependencies": {
    "fsevents": "2.3.3"
  }
}"#;

    fn extract(content: &str) -> Option<Vec<Dependency>> {
        NpmCapability.extract(content, Path::new("package.json"), &ExtractConfig::default())
    }

    #[test]
    fn test_extract_sections() {
        let deps = extract(PACKAGE_JSON).unwrap();
        let type_of = |name: &str| {
            deps.iter()
                .find(|d| d.name == name)
                .and_then(|d| d.dep_type.as_deref())
        };
        assert_eq!(type_of("express"), Some("prod"));
        assert_eq!(type_of("jest"), Some("dev"));
        assert_eq!(type_of("fsevents"), Some("optional"));
    }

    #[test]
    fn test_extract_skips_file_specifiers() {
        let deps = extract(PACKAGE_JSON).unwrap();
        assert!(!deps.iter().any(|d| d.name == "local"));
    }

    #[test]
    fn test_extract_invalid_json_is_none() {
        assert!(extract("{ not json").is_none());
    }

    #[test]
    fn test_extract_no_dependency_sections_is_none() {
        assert!(extract(r#"{"name": "bare"}"#).is_none());
    }

    #[test]
    fn test_update_command() {
        let cmd = NpmCapability.update_command(&["express".to_string()]);
        assert_eq!(cmd, "npm install --package-lock-only express");
    }

    #[test]
    fn test_maintenance_command() {
        assert_eq!(
            NpmCapability.maintenance_command(),
            "npm install --package-lock-only"
        );
    }

    #[test]
    fn test_extra_env() {
        let env = NpmCapability.extra_env(&UpdateConfig::new().with_cache_dir("/cache"));
        assert_eq!(
            env,
            vec![("npm_config_cache".to_string(), "/cache/npm".to_string())]
        );
    }
}
