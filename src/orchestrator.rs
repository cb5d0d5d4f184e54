//! Pipeline orchestrator
//!
//! This module provides:
//! - Semaphore-bounded concurrent extraction across ecosystems
//! - Concurrent artifact updates, serialized per resolved lock path so two
//!   invocations never race on one umbrella lock file
//! - The upstream retry policy for the transient execution signal
//! - Error collection with partial continuation: one ecosystem's or
//!   manifest's failure never blocks the others

use crate::artifacts::update_artifacts;
use crate::domain::{
    ArtifactResult, EcosystemConfig, ExtractConfig, HostRules, PackageFileResult,
    UpdateArtifactRequest, UpdateConfig,
};
use crate::ecosystems::EcosystemRegistry;
use crate::extract::{extract, FileMatcher, NameMatcher};
use crate::fsx::FileSystem;
use crate::exec::CommandRunner;
use crate::lockfile::resolve_lock;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Default concurrency limit for extraction passes and update groups
const DEFAULT_CONCURRENCY: usize = 8;

/// Retries granted to a transiently-failed update before it is recorded
/// as an artifact error
const TRANSIENT_RETRIES: usize = 2;

/// Extraction results for one ecosystem
#[derive(Debug, Clone, Serialize)]
pub struct EcosystemExtraction {
    pub ecosystem: String,
    pub files: Vec<PackageFileResult>,
}

/// Aggregate result of one pipeline run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Per-ecosystem extraction results, ecosystem order preserved
    pub extractions: Vec<EcosystemExtraction>,
    /// Artifact results across all manifests (errors and additions)
    pub artifacts: Vec<ArtifactResult>,
    /// Coordination errors (unknown ecosystems, unreadable manifests)
    pub errors: Vec<String>,
}

impl RunReport {
    /// Returns true when any artifact error was recorded
    pub fn has_artifact_errors(&self) -> bool {
        self.artifacts.iter().any(ArtifactResult::is_error)
    }

    /// Total extracted dependency count
    pub fn total_deps(&self) -> usize {
        self.extractions
            .iter()
            .flat_map(|e| &e.files)
            .map(|f| f.deps.len())
            .sum()
    }
}

/// Options for one pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Allow-list of ecosystem identifiers; `None` runs all registered
    pub ecosystems: Option<Vec<String>>,
    /// Regenerate lock files from scratch after extraction
    pub maintenance: bool,
    /// Update configuration applied to every artifact request
    pub update: UpdateConfig,
}

/// Drives the two pipeline stages concurrently
pub struct Orchestrator {
    registry: Arc<EcosystemRegistry>,
    matcher: Arc<dyn FileMatcher>,
    fs: Arc<dyn FileSystem>,
    runner: Arc<dyn CommandRunner>,
    host_rules: Arc<HostRules>,
    semaphore: Arc<Semaphore>,
}

impl Orchestrator {
    /// Creates an orchestrator with the default concurrency bound
    pub fn new(
        registry: EcosystemRegistry,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CommandRunner>,
        host_rules: HostRules,
    ) -> Self {
        Self::with_concurrency(registry, fs, runner, host_rules, DEFAULT_CONCURRENCY)
    }

    /// Creates an orchestrator with an explicit concurrency bound
    pub fn with_concurrency(
        registry: EcosystemRegistry,
        fs: Arc<dyn FileSystem>,
        runner: Arc<dyn CommandRunner>,
        host_rules: HostRules,
        concurrency: usize,
    ) -> Self {
        let matcher = Arc::new(NameMatcher::from_registry(&registry));
        Self {
            registry: Arc::new(registry),
            matcher,
            fs,
            runner,
            host_rules: Arc::new(host_rules),
            semaphore: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Runs one extraction pass per registered ecosystem over the candidate
    /// files, bounded by the semaphore.
    pub async fn extract_all(
        &self,
        candidates: &[PathBuf],
        options: &RunOptions,
    ) -> (Vec<EcosystemExtraction>, Vec<String>) {
        let shared_extract = ExtractConfig {
            enabled_ecosystems: options.ecosystems.clone(),
        };

        let mut handles = Vec::new();
        for ecosystem in self.registry.ecosystems() {
            let config = EcosystemConfig::new(ecosystem, candidates.to_vec())
                .with_extract(shared_extract.clone());
            let registry = self.registry.clone();
            let matcher = self.matcher.clone();
            let fs = self.fs.clone();
            let semaphore = self.semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();
                let ecosystem = config.ecosystem.clone();
                let outcome = extract(&config, &registry, matcher.as_ref(), fs.as_ref());
                (ecosystem, outcome)
            }));
        }

        let mut extractions = Vec::new();
        let mut errors = Vec::new();
        for handle in handles {
            match handle.await {
                Ok((ecosystem, Ok(files))) => {
                    if !files.is_empty() {
                        extractions.push(EcosystemExtraction { ecosystem, files });
                    }
                }
                Ok((_, Err(e))) => errors.push(e.to_string()),
                Err(e) => errors.push(format!("extraction task failed: {}", e)),
            }
        }
        extractions.sort_by(|a, b| a.ecosystem.cmp(&b.ecosystem));
        (extractions, errors)
    }

    /// Runs artifact updates for every request, serializing the ones whose
    /// lock files resolve to the same path.
    pub async fn update_all(
        &self,
        requests: Vec<(String, UpdateArtifactRequest)>,
    ) -> Vec<ArtifactResult> {
        // Group by resolved lock path: umbrella siblings share one lock
        // file and must never regenerate it concurrently.
        let mut groups: HashMap<PathBuf, Vec<(String, UpdateArtifactRequest)>> = HashMap::new();
        for (ecosystem, request) in requests {
            let key = self.lock_group_key(&ecosystem, &request);
            groups.entry(key).or_default().push((ecosystem, request));
        }

        let mut handles = Vec::new();
        for (lock_path, group) in groups {
            let registry = self.registry.clone();
            let fs = self.fs.clone();
            let runner = self.runner.clone();
            let host_rules = self.host_rules.clone();
            let semaphore = self.semaphore.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.unwrap();
                debug!(lock = %lock_path.display(), manifests = group.len(), "updating lock group");

                let mut results = Vec::new();
                for (ecosystem, request) in group {
                    let Some(capability) = registry.get(&ecosystem) else {
                        results.push(ArtifactResult::error(
                            request.manifest_path.clone(),
                            format!("no updater registered for ecosystem '{}'", ecosystem),
                        ));
                        continue;
                    };

                    if let Some(result) = run_with_retry(
                        &request,
                        &lock_path,
                        capability.updater.as_ref(),
                        fs.as_ref(),
                        runner.as_ref(),
                        &host_rules,
                    )
                    .await
                    {
                        results.push(result);
                    }
                }
                results
            }));
        }

        let mut artifacts = Vec::new();
        for handle in handles {
            match handle.await {
                Ok(results) => artifacts.extend(results),
                Err(e) => warn!(error = %e, "update task failed"),
            }
        }
        artifacts
    }

    /// Full run: extraction, then (in maintenance mode) lock regeneration
    /// for every extracted manifest.
    pub async fn run(&self, candidates: &[PathBuf], options: &RunOptions) -> RunReport {
        let (extractions, mut errors) = self.extract_all(candidates, options).await;

        let mut artifacts = Vec::new();
        if options.maintenance {
            let mut requests = Vec::new();
            for extraction in &extractions {
                for file in &extraction.files {
                    match self.fs.read_text(&file.path) {
                        Ok(Some(content)) => requests.push((
                            extraction.ecosystem.clone(),
                            UpdateArtifactRequest::new(
                                file.path.clone(),
                                Vec::new(),
                                content,
                                options.update.clone().with_maintenance(true),
                            ),
                        )),
                        Ok(None) => {
                            debug!(path = %file.path.display(), "manifest vanished before update")
                        }
                        Err(e) => errors.push(format!(
                            "failed to re-read manifest {}: {}",
                            file.path.display(),
                            e
                        )),
                    }
                }
            }
            artifacts = self.update_all(requests).await;
        }

        RunReport {
            extractions,
            artifacts,
            errors,
        }
    }

    /// Serialization key for one request: its resolved lock path, falling
    /// back to the sibling path when resolution itself fails.
    fn lock_group_key(&self, ecosystem: &str, request: &UpdateArtifactRequest) -> PathBuf {
        let Some(capability) = self.registry.get(ecosystem) else {
            return request.manifest_path.clone();
        };
        let lock_name = capability.updater.lock_file_name();
        match resolve_lock(self.fs.as_ref(), &request.manifest_path, lock_name) {
            Ok(lock) => lock.path,
            Err(e) => e.path().clone(),
        }
    }
}

/// Invokes the updater, granting the transient signal a bounded number of
/// retries before recording it as an artifact error.
async fn run_with_retry(
    request: &UpdateArtifactRequest,
    lock_path: &Path,
    updater: &dyn crate::ecosystems::UpdaterCapability,
    fs: &dyn FileSystem,
    runner: &dyn CommandRunner,
    host_rules: &HostRules,
) -> Option<ArtifactResult> {
    let mut attempt = 0;
    loop {
        match update_artifacts(request, updater, fs, runner, host_rules).await {
            Ok(result) => return result,
            Err(transient) if attempt < TRANSIENT_RETRIES => {
                attempt += 1;
                warn!(
                    manifest = %request.manifest_path.display(),
                    attempt,
                    error = %transient,
                    "transient failure, retrying"
                );
            }
            Err(transient) => {
                return Some(ArtifactResult::error(
                    lock_path.to_path_buf(),
                    format!("transient failure persisted after retries: {}", transient),
                ));
            }
        }
    }
}
