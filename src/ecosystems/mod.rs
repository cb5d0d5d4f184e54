//! Per-ecosystem capability set
//!
//! Extraction and artifact updating are polymorphic capabilities keyed by an
//! ecosystem identifier and resolved through a registry built at process
//! start. The pipeline core never names a concrete ecosystem; new ones are
//! added by registering another capability pair.
//!
//! Built-in capabilities:
//! - mix (Elixir/Hex): per-file extraction, hex.pm organization auth
//! - cargo (Rust): whole-fileset extraction (workspace lock semantics)
//! - npm (Node.js): per-file extraction

mod cargo;
mod mix;
mod npm;

pub use cargo::CargoCapability;
pub use mix::MixCapability;
pub use npm::NpmCapability;

use crate::domain::{
    Dependency, OrganizationCredential, ToolConstraint, UpdateConfig,
};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Single-manifest extraction capability
pub trait PackageFileExtractor: Send + Sync {
    /// Extracts dependencies from one manifest's content.
    ///
    /// Returns `None` when the content is not a usable manifest; an empty
    /// vector is treated the same way by the coordinator.
    fn extract(
        &self,
        content: &str,
        path: &Path,
        config: &crate::domain::ExtractConfig,
    ) -> Option<Vec<Dependency>>;
}

/// Whole-fileset extraction capability
///
/// Used when an ecosystem's lock semantics span multiple manifests (e.g. a
/// workspace): one call receives every matched, readable file and returns
/// the per-file dependency mapping in a single pass.
pub trait FileSetExtractor: Send + Sync {
    fn extract_all(
        &self,
        files: &[(PathBuf, String)],
        config: &crate::domain::ExtractConfig,
    ) -> Option<BTreeMap<PathBuf, Vec<Dependency>>>;
}

/// Which extraction call shape an ecosystem implements
///
/// A tagged variant rather than runtime shape-sniffing: the capability
/// declares its mode and the coordinator dispatches on it.
pub enum ExtractorKind {
    PerFile(Box<dyn PackageFileExtractor>),
    FileSet(Box<dyn FileSetExtractor>),
}

/// Private-registry description for organization authentication
#[derive(Debug)]
pub struct RegistryAuth {
    /// Pattern matched against host-rule targets; must expose a named
    /// capture group `organization`
    host_pattern: Regex,
    /// Canonical organization URL template with an `{organization}` slot
    org_url_template: String,
    /// Separator encoding an organization prefix in dependency identifiers
    namespace_separator: char,
}

impl RegistryAuth {
    /// Creates a registry auth descriptor.
    ///
    /// # Panics
    /// Panics if the pattern lacks an `organization` capture group; the
    /// descriptor is built once at registry construction.
    pub fn new(host_pattern: &str, org_url_template: &str, namespace_separator: char) -> Self {
        let host_pattern = Regex::new(host_pattern).expect("invalid registry host pattern");
        assert!(
            host_pattern
                .capture_names()
                .any(|name| name == Some("organization")),
            "registry host pattern must capture 'organization'"
        );
        Self {
            host_pattern,
            org_url_template: org_url_template.to_string(),
            namespace_separator,
        }
    }

    /// Organization named by a host-rule target, if the target matches
    pub fn organization_from_host(&self, host: &str) -> Option<String> {
        self.host_pattern
            .captures(host)
            .and_then(|caps| caps.name("organization"))
            .map(|m| m.as_str().to_string())
    }

    /// Canonical registry URL for one organization
    pub fn organization_url(&self, organization: &str) -> String {
        self.org_url_template.replace("{organization}", organization)
    }

    /// The identifier namespace separator
    pub fn namespace_separator(&self) -> char {
        self.namespace_separator
    }
}

/// Artifact-update capability for one ecosystem
pub trait UpdaterCapability: Send + Sync {
    /// Manifest base names this ecosystem owns (used by the file matcher)
    fn manifest_file_names(&self) -> &'static [&'static str];

    /// Base name of the ecosystem's lock file
    fn lock_file_name(&self) -> &'static str;

    /// Command updating only the named dependencies.
    ///
    /// Each identifier arrives already shell-quoted.
    fn update_command(&self, quoted_deps: &[String]) -> String;

    /// Command regenerating the whole lock file
    fn maintenance_command(&self) -> String;

    /// Private-registry description, when the ecosystem supports
    /// organization authentication
    fn registry_auth(&self) -> Option<&RegistryAuth> {
        None
    }

    /// Renders one authentication pre-command for a credentialed organization
    fn auth_command(&self, _credential: &OrganizationCredential) -> Option<String> {
        None
    }

    /// Environment overrides for the external tool (private cache dirs)
    fn extra_env(&self, _config: &UpdateConfig) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Toolchain version constraints declared for this run
    fn tool_constraints(&self, _config: &UpdateConfig) -> Vec<ToolConstraint> {
        Vec::new()
    }
}

/// One ecosystem's extractor/updater pair
pub struct EcosystemCapability {
    pub extractor: ExtractorKind,
    pub updater: Box<dyn UpdaterCapability>,
}

/// Capability lookup table keyed by ecosystem identifier
#[derive(Default)]
pub struct EcosystemRegistry {
    capabilities: HashMap<String, EcosystemCapability>,
}

impl EcosystemRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in capabilities
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("mix", MixCapability::capability());
        registry.register("cargo", CargoCapability::capability());
        registry.register("npm", NpmCapability::capability());
        registry
    }

    /// Registers a capability pair under an identifier
    pub fn register(&mut self, ecosystem: impl Into<String>, capability: EcosystemCapability) {
        self.capabilities.insert(ecosystem.into(), capability);
    }

    /// Looks up a capability pair
    pub fn get(&self, ecosystem: &str) -> Option<&EcosystemCapability> {
        self.capabilities.get(ecosystem)
    }

    /// Registered ecosystem identifiers, sorted
    pub fn ecosystems(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.capabilities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Manifest base names per ecosystem, for name-based file matching
    pub fn manifest_names(&self) -> HashMap<String, &'static [&'static str]> {
        self.capabilities
            .iter()
            .map(|(name, cap)| (name.clone(), cap.updater.manifest_file_names()))
            .collect()
    }
}
