//! Dependency records and per-file extraction results

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A single dependency declaration extracted from a manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    /// Declared package identifier (the name exactly as the registry knows it)
    pub name: String,
    /// Display name; defaults to the package identifier after normalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Current value/constraint as written in the manifest
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<String>,
    /// Locator string used to replace the version in the manifest text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace_string: Option<String>,
    /// Data source tag (which registry kind this dependency resolves against)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,
    /// Dependency category tag (e.g. prod, dev, build)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dep_type: Option<String>,
}

impl Dependency {
    /// Creates a dependency with only the package identifier set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            current_value: None,
            replace_string: None,
            datasource: None,
            dep_type: None,
        }
    }

    /// Sets the current value/constraint (builder pattern)
    pub fn with_current_value(mut self, value: impl Into<String>) -> Self {
        self.current_value = Some(value.into());
        self
    }

    /// Sets the display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the replacement-string locator
    pub fn with_replace_string(mut self, replace_string: impl Into<String>) -> Self {
        self.replace_string = Some(replace_string.into());
        self
    }

    /// Sets the data source tag
    pub fn with_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    /// Sets the dependency category tag
    pub fn with_dep_type(mut self, dep_type: impl Into<String>) -> Self {
        self.dep_type = Some(dep_type.into());
        self
    }

    /// Fills the display name from the package identifier when absent.
    ///
    /// Extractors may omit the display name; the coordinator guarantees it is
    /// always populated in its output.
    pub fn normalize(mut self) -> Self {
        if self.display_name.is_none() && !self.name.is_empty() {
            self.display_name = Some(self.name.clone());
        }
        self
    }

    /// Organization namespace prefix of the identifier, if one is encoded.
    ///
    /// The first segment is only present when the separator itself is present:
    /// `"acme:widget"` yields `Some("acme")`, plain `"widget"` yields `None`.
    pub fn organization(&self, separator: char) -> Option<&str> {
        self.name.split_once(separator).map(|(org, _)| org)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = self.display_name.as_deref().unwrap_or(&self.name);
        match &self.current_value {
            Some(value) => write!(f, "{}@{}", shown, value),
            None => write!(f, "{}", shown),
        }
    }
}

/// Dependencies extracted from one manifest file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFileResult {
    /// Path of the manifest file, relative to the repository root
    pub path: PathBuf,
    /// Dependencies in declaration order
    pub deps: Vec<Dependency>,
}

impl PackageFileResult {
    /// Creates a result for one manifest file
    pub fn new(path: impl Into<PathBuf>, deps: Vec<Dependency>) -> Self {
        Self {
            path: path.into(),
            deps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_fills_display_name() {
        let dep = Dependency::new("jason").normalize();
        assert_eq!(dep.display_name.as_deref(), Some("jason"));
    }

    #[test]
    fn test_normalize_keeps_existing_display_name() {
        let dep = Dependency::new("acme:widget")
            .with_display_name("widget")
            .normalize();
        assert_eq!(dep.display_name.as_deref(), Some("widget"));
    }

    #[test]
    fn test_normalize_empty_name_stays_unset() {
        let dep = Dependency::new("").normalize();
        assert!(dep.display_name.is_none());
    }

    #[test]
    fn test_organization_with_separator() {
        let dep = Dependency::new("acme:widget");
        assert_eq!(dep.organization(':'), Some("acme"));
    }

    #[test]
    fn test_organization_without_separator() {
        let dep = Dependency::new("widget");
        assert_eq!(dep.organization(':'), None);
    }

    #[test]
    fn test_display_with_value() {
        let dep = Dependency::new("serde").with_current_value("1.0.228");
        assert_eq!(format!("{}", dep), "serde@1.0.228");
    }

    #[test]
    fn test_display_prefers_display_name() {
        let dep = Dependency::new("acme:widget")
            .with_display_name("widget")
            .with_current_value("~> 0.3");
        assert_eq!(format!("{}", dep), "widget@~> 0.3");
    }

    #[test]
    fn test_builder_fields() {
        let dep = Dependency::new("plug")
            .with_current_value("~> 1.14")
            .with_replace_string("\"~> 1.14\"")
            .with_datasource("hex")
            .with_dep_type("prod");
        assert_eq!(dep.replace_string.as_deref(), Some("\"~> 1.14\""));
        assert_eq!(dep.datasource.as_deref(), Some("hex"));
        assert_eq!(dep.dep_type.as_deref(), Some("prod"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let dep = Dependency::new("jason").with_current_value("~> 1.4").normalize();
        let json = serde_json::to_string(&dep).unwrap();
        let parsed: Dependency = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, dep);
    }

    #[test]
    fn test_package_file_result_new() {
        let result = PackageFileResult::new("app/mix.exs", vec![Dependency::new("jason")]);
        assert_eq!(result.path, PathBuf::from("app/mix.exs"));
        assert_eq!(result.deps.len(), 1);
    }
}
