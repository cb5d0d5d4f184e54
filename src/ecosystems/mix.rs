//! Elixir (mix/Hex) ecosystem capability
//!
//! Handles:
//! - Per-file extraction of `deps` tuples from mix.exs
//! - `mix deps.update` invocation and lock maintenance
//! - hex.pm private organization authentication

use super::{
    EcosystemCapability, ExtractorKind, PackageFileExtractor, RegistryAuth, UpdaterCapability,
};
use crate::domain::{Dependency, ExtractConfig, OrganizationCredential, ToolConstraint, UpdateConfig};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// Matches dep tuples like {:jason, "~> 1.4"} and
// {:widget, "~> 0.3", organization: "acme"}.
static DEP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\{\s*:(?P<name>\w+)\s*,\s*"(?P<req>[^"]+)"(?P<rest>[^}]*)\}"#).unwrap()
});
static ORG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"organization:\s*"(?P<org>[a-z0-9_]+)""#).unwrap());
static ONLY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"only:\s*(\[[^\]]*\]|:\w+)").unwrap());

static HEX_AUTH: LazyLock<RegistryAuth> = LazyLock::new(|| {
    RegistryAuth::new(
        r"https://hex\.pm/api/repos/(?P<organization>[a-z0-9_]+)/",
        "https://hex.pm/api/repos/{organization}/",
        ':',
    )
});

/// mix.exs extractor and mix updater
pub struct MixCapability;

impl MixCapability {
    /// Builds the full capability pair for the registry
    pub fn capability() -> EcosystemCapability {
        EcosystemCapability {
            extractor: ExtractorKind::PerFile(Box::new(MixCapability)),
            updater: Box::new(MixCapability),
        }
    }
}

impl PackageFileExtractor for MixCapability {
    fn extract(
        &self,
        content: &str,
        _path: &Path,
        _config: &ExtractConfig,
    ) -> Option<Vec<Dependency>> {
        let mut deps = Vec::new();
        for caps in DEP_RE.captures_iter(content) {
            let name = caps.name("name")?.as_str();
            let requirement = caps.name("req")?.as_str();
            let rest = caps.name("rest").map(|m| m.as_str()).unwrap_or("");

            // Private organization packages resolve under org:package.
            let organization = ORG_RE
                .captures(rest)
                .and_then(|c| c.name("org"))
                .map(|m| m.as_str());
            let identifier = match organization {
                Some(org) => format!("{}:{}", org, name),
                None => name.to_string(),
            };

            let dep_type = if ONLY_RE.is_match(rest) { "dev" } else { "prod" };

            let mut dep = Dependency::new(identifier)
                .with_current_value(requirement)
                .with_replace_string(format!("\"{}\"", requirement))
                .with_datasource("hex")
                .with_dep_type(dep_type);
            if organization.is_some() {
                // Keep the bare package name for display; the identifier
                // carries the organization prefix.
                dep = dep.with_display_name(name);
            }
            deps.push(dep);
        }

        if deps.is_empty() {
            None
        } else {
            Some(deps)
        }
    }
}

impl UpdaterCapability for MixCapability {
    fn manifest_file_names(&self) -> &'static [&'static str] {
        &["mix.exs"]
    }

    fn lock_file_name(&self) -> &'static str {
        "mix.lock"
    }

    fn update_command(&self, quoted_deps: &[String]) -> String {
        format!("mix deps.update {}", quoted_deps.join(" "))
    }

    fn maintenance_command(&self) -> String {
        "mix deps.update --all".to_string()
    }

    fn registry_auth(&self) -> Option<&RegistryAuth> {
        Some(&HEX_AUTH)
    }

    fn auth_command(&self, credential: &OrganizationCredential) -> Option<String> {
        Some(format!(
            "mix hex.organization auth {} --key {}",
            credential.organization, credential.token
        ))
    }

    fn extra_env(&self, config: &UpdateConfig) -> Vec<(String, String)> {
        let Some(cache_dir) = &config.cache_dir else {
            return Vec::new();
        };
        let cache = cache_dir.display();
        vec![
            ("MIX_HOME".to_string(), format!("{}/mix", cache)),
            ("HEX_HOME".to_string(), format!("{}/hex", cache)),
        ]
    }

    fn tool_constraints(&self, config: &UpdateConfig) -> Vec<ToolConstraint> {
        ["elixir", "erlang"]
            .iter()
            .filter_map(|tool| {
                config
                    .constraint(tool)
                    .map(|req| ToolConstraint::new(*tool, req))
            })
            .collect()
    }
}
