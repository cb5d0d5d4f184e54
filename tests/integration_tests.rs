//! Integration tests for relock
//!
//! These tests verify:
//! - Manifest discovery and extraction over real directories
//! - Lock regeneration through real shell commands
//! - Umbrella lock resolution on disk
//! - Registry authentication pre-commands reaching the shell line

use relock::discovery::discover_candidates;
use relock::domain::{
    ArtifactResult, Dependency, ExtractConfig, HostRule, HostRules, UpdateArtifactRequest,
    UpdateConfig,
};
use relock::ecosystems::{
    EcosystemCapability, EcosystemRegistry, ExtractorKind, PackageFileExtractor, RegistryAuth,
    UpdaterCapability,
};
use relock::exec::SystemRunner;
use relock::fsx::LocalFs;
use relock::orchestrator::{Orchestrator, RunOptions};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Test fixture directory creation helper
fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

fn write(dir: &TempDir, path: &str, content: &str) {
    let full = dir.path().join(path);
    fs::create_dir_all(full.parent().unwrap()).unwrap();
    fs::write(full, content).unwrap();
}

const MIX_EXS: &str = r#"defmodule Demo.MixProject do
  use Mix.Project

  defp deps do
    [
      {:jason, "~> 1.4"},
      {:widget, "~> 0.3", organization: "acme"},
      {:credo, "~> 1.7", only: [:dev, :test]}
    ]
  end
end
"#;

const PACKAGE_JSON: &str = r#"{
  "name": "demo",
  "dependencies": {
    "express": "^4.18.0"
  },
  "devDependencies": {
    "typescript": "~5.0.0"
  }
}"#;

const CARGO_TOML: &str = r#"[package]
name = "demo"
version = "0.1.0"

[dependencies]
serde = "1.0"
"#;

mod extraction {
    use super::*;

    /// Full extraction pass over a repository mixing three ecosystems
    #[tokio::test]
    async fn test_extracts_across_ecosystems() {
        let dir = create_test_dir();
        write(&dir, "mix.exs", MIX_EXS);
        write(&dir, "ui/package.json", PACKAGE_JSON);
        write(&dir, "native/Cargo.toml", CARGO_TOML);
        write(&dir, "node_modules/x/package.json", "{}");

        let registry = EcosystemRegistry::builtin();
        let candidates = discover_candidates(dir.path(), &registry);
        assert_eq!(candidates.len(), 3, "Should discover 3 manifest files");

        let orchestrator = Orchestrator::new(
            registry,
            Arc::new(LocalFs::new(dir.path())),
            Arc::new(SystemRunner::new(dir.path())),
            HostRules::default(),
        );
        let report = orchestrator.run(&candidates, &RunOptions::default()).await;

        assert!(report.errors.is_empty());
        let ecosystems: Vec<&str> = report
            .extractions
            .iter()
            .map(|e| e.ecosystem.as_str())
            .collect();
        assert_eq!(ecosystems, vec!["cargo", "mix", "npm"]);

        let mix = &report.extractions[1].files[0];
        let names: Vec<&str> = mix.deps.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["jason", "acme:widget", "credo"]);

        let npm = &report.extractions[2].files[0];
        assert_eq!(npm.deps.len(), 2);
    }

    /// The ecosystem allow-list keeps other ecosystems out of the report
    #[tokio::test]
    async fn test_ecosystem_filter() {
        let dir = create_test_dir();
        write(&dir, "mix.exs", MIX_EXS);
        write(&dir, "package.json", PACKAGE_JSON);

        let registry = EcosystemRegistry::builtin();
        let candidates = discover_candidates(dir.path(), &registry);
        let orchestrator = Orchestrator::new(
            registry,
            Arc::new(LocalFs::new(dir.path())),
            Arc::new(SystemRunner::new(dir.path())),
            HostRules::default(),
        );
        let options = RunOptions {
            ecosystems: Some(vec!["npm".to_string()]),
            ..Default::default()
        };
        let report = orchestrator.run(&candidates, &options).await;
        assert_eq!(report.extractions.len(), 1);
        assert_eq!(report.extractions[0].ecosystem, "npm");
    }
}

/// Ecosystem driven entirely by portable shell commands, so updates can run
/// for real in the test environment
mod shell_ecosystem {
    use super::*;

    const ECOSYSTEM: &str = "shell";

    struct ShellCapability;

    impl ShellCapability {
        fn capability() -> EcosystemCapability {
            EcosystemCapability {
                extractor: ExtractorKind::PerFile(Box::new(ShellCapability)),
                updater: Box::new(ShellCapability),
            }
        }

        fn registry() -> EcosystemRegistry {
            let mut registry = EcosystemRegistry::new();
            registry.register(ECOSYSTEM, Self::capability());
            registry
        }
    }

    impl PackageFileExtractor for ShellCapability {
        fn extract(
            &self,
            content: &str,
            _path: &Path,
            _config: &ExtractConfig,
        ) -> Option<Vec<Dependency>> {
            let deps: Vec<Dependency> = content
                .lines()
                .filter_map(|line| {
                    let (name, req) = line.split_once(' ')?;
                    Some(Dependency::new(name).with_current_value(req))
                })
                .collect();
            if deps.is_empty() {
                None
            } else {
                Some(deps)
            }
        }
    }

    static SHELL_AUTH: std::sync::LazyLock<RegistryAuth> = std::sync::LazyLock::new(|| {
        RegistryAuth::new(
            r"https://repo\.example/orgs/(?P<organization>[a-z0-9_]+)/",
            "https://repo.example/orgs/{organization}/",
            ':',
        )
    });

    impl UpdaterCapability for ShellCapability {
        fn manifest_file_names(&self) -> &'static [&'static str] {
            &["deps.txt"]
        }

        fn lock_file_name(&self) -> &'static str {
            "deps.lock"
        }

        fn update_command(&self, quoted_deps: &[String]) -> String {
            format!(
                "cp deps.txt deps.lock && printf '%s\\n' {} >> deps.lock",
                quoted_deps.join(" ")
            )
        }

        fn maintenance_command(&self) -> String {
            "cp deps.txt deps.lock".to_string()
        }

        fn registry_auth(&self) -> Option<&RegistryAuth> {
            Some(&SHELL_AUTH)
        }

        fn auth_command(&self, credential: &relock::domain::OrganizationCredential) -> Option<String> {
            // Leaves an audit trail in the working directory instead of
            // talking to a real registry.
            Some(format!(
                "printf '%s\\n' '{}={}' >> auth.log",
                credential.organization, credential.token
            ))
        }
    }

    fn orchestrator(dir: &TempDir, host_rules: HostRules) -> Orchestrator {
        Orchestrator::new(
            ShellCapability::registry(),
            Arc::new(LocalFs::new(dir.path())),
            Arc::new(SystemRunner::new(dir.path())),
            host_rules,
        )
    }

    /// An update run rewrites the lock file and reports the new content
    #[tokio::test]
    async fn test_update_produces_addition() {
        let dir = create_test_dir();
        write(&dir, "deps.txt", "left 1.0\nright 2.0\n");
        write(&dir, "deps.lock", "stale\n");

        let request = UpdateArtifactRequest::new(
            "deps.txt",
            vec![Dependency::new("left")],
            "left 1.1\nright 2.0\n",
            UpdateConfig::new(),
        );
        let artifacts = orchestrator(&dir, HostRules::default())
            .update_all(vec![(ECOSYSTEM.to_string(), request)])
            .await;

        assert_eq!(artifacts.len(), 1);
        match &artifacts[0] {
            ArtifactResult::Addition(addition) => {
                assert_eq!(addition.path, Path::new("deps.lock"));
                assert_eq!(addition.contents, "left 1.1\nright 2.0\nleft\n");
            }
            other => panic!("expected addition, got {:?}", other),
        }
        // The manifest write landed on disk before the command ran.
        let manifest = fs::read_to_string(dir.path().join("deps.txt")).unwrap();
        assert_eq!(manifest, "left 1.1\nright 2.0\n");
    }

    /// Maintenance over a nested manifest whose lock sits beside it
    #[tokio::test]
    async fn test_maintenance_regenerates_sibling_lock() {
        let dir = create_test_dir();
        write(&dir, "svc/deps.txt", "tool 3.0\n");
        write(&dir, "svc/deps.lock", "old\n");

        let request = UpdateArtifactRequest::new(
            "svc/deps.txt",
            Vec::new(),
            "tool 3.0\n",
            UpdateConfig::new().with_maintenance(true),
        );
        let artifacts = orchestrator(&dir, HostRules::default())
            .update_all(vec![(ECOSYSTEM.to_string(), request)])
            .await;

        assert_eq!(artifacts.len(), 1);
        assert!(matches!(artifacts[0], ArtifactResult::Addition(_)));
        let lock = fs::read_to_string(dir.path().join("svc/deps.lock")).unwrap();
        assert_eq!(lock, "tool 3.0\n");
    }

    /// Maintenance refuses to regenerate a lock shared from an ancestor
    #[tokio::test]
    async fn test_maintenance_skips_umbrella_lock() {
        let dir = create_test_dir();
        write(&dir, "deps.lock", "shared\n");
        write(&dir, "apps/web/deps.txt", "tool 3.0\n");

        let request = UpdateArtifactRequest::new(
            "apps/web/deps.txt",
            Vec::new(),
            "tool 3.0\n",
            UpdateConfig::new().with_maintenance(true),
        );
        let artifacts = orchestrator(&dir, HostRules::default())
            .update_all(vec![(ECOSYSTEM.to_string(), request)])
            .await;

        assert!(artifacts.is_empty());
        let lock = fs::read_to_string(dir.path().join("deps.lock")).unwrap();
        assert_eq!(lock, "shared\n", "umbrella lock must stay untouched");
    }

    /// A failing command surfaces as an artifact error, not a crash
    #[tokio::test]
    async fn test_command_failure_is_artifact_error() {
        let dir = create_test_dir();
        write(&dir, "deps.txt", "tool 3.0\n");
        write(&dir, "deps.lock", "old\n");

        struct BrokenUpdater;
        impl UpdaterCapability for BrokenUpdater {
            fn manifest_file_names(&self) -> &'static [&'static str] {
                &["deps.txt"]
            }
            fn lock_file_name(&self) -> &'static str {
                "deps.lock"
            }
            fn update_command(&self, _quoted_deps: &[String]) -> String {
                "false".to_string()
            }
            fn maintenance_command(&self) -> String {
                "false".to_string()
            }
        }

        let mut registry = EcosystemRegistry::new();
        registry.register(
            ECOSYSTEM,
            EcosystemCapability {
                extractor: ExtractorKind::PerFile(Box::new(ShellCapability)),
                updater: Box::new(BrokenUpdater),
            },
        );
        let orchestrator = Orchestrator::new(
            registry,
            Arc::new(LocalFs::new(dir.path())),
            Arc::new(SystemRunner::new(dir.path())),
            HostRules::default(),
        );

        let request = UpdateArtifactRequest::new(
            "deps.txt",
            vec![Dependency::new("tool")],
            "tool 3.1\n",
            UpdateConfig::new(),
        );
        let artifacts = orchestrator
            .update_all(vec![(ECOSYSTEM.to_string(), request)])
            .await;

        assert_eq!(artifacts.len(), 1);
        assert!(artifacts[0].is_error());
    }

    /// Credentialed organizations produce auth pre-commands that really run
    #[tokio::test]
    async fn test_auth_pre_command_runs_before_update() {
        let dir = create_test_dir();
        write(&dir, "deps.txt", "acme:gadget 1.0\n");
        write(&dir, "deps.lock", "old\n");

        let host_rules = HostRules::new(vec![HostRule::new(
            "https://repo.example/orgs/acme/",
            Some("s3cret".to_string()),
        )]);
        let request = UpdateArtifactRequest::new(
            "deps.txt",
            vec![Dependency::new("acme:gadget")],
            "acme:gadget 1.1\n",
            UpdateConfig::new(),
        );
        let artifacts = orchestrator(&dir, host_rules)
            .update_all(vec![(ECOSYSTEM.to_string(), request)])
            .await;

        assert_eq!(artifacts.len(), 1);
        assert!(!artifacts[0].is_error());
        let audit = fs::read_to_string(dir.path().join("auth.log")).unwrap();
        assert_eq!(audit, "acme=s3cret\n");
    }

    /// End-to-end maintenance through Orchestrator::run
    #[tokio::test]
    async fn test_run_with_maintenance() {
        let dir = create_test_dir();
        write(&dir, "deps.txt", "tool 3.0\n");
        write(&dir, "deps.lock", "old\n");

        let orchestrator = orchestrator(&dir, HostRules::default());
        let candidates = vec![std::path::PathBuf::from("deps.txt")];
        let options = RunOptions {
            maintenance: true,
            ..Default::default()
        };
        let report = orchestrator.run(&candidates, &options).await;

        assert_eq!(report.total_deps(), 1);
        assert_eq!(report.artifacts.len(), 1);
        assert!(!report.has_artifact_errors());
        let lock = fs::read_to_string(dir.path().join("deps.lock")).unwrap();
        assert_eq!(lock, "tool 3.0\n");
    }
}
