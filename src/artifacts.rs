//! Artifact Updater
//!
//! One invocation walks a fixed sequence: entry guard, lock resolution,
//! maintenance guards, manifest write, registry authentication, external
//! command execution, lock diff. Every local failure is captured as an
//! artifact error and returned; the only error ever propagated is the
//! distinguished transient infrastructure signal, so an upstream retry
//! policy can re-invoke the pipeline.

use crate::auth::build_auth_credentials;
use crate::domain::{ArtifactResult, HostRules, UpdateArtifactRequest};
use crate::ecosystems::UpdaterCapability;
use crate::error::{ExecError, TransientError};
use crate::exec::{shell_quote, CommandRunner, ExecOptions};
use crate::fsx::FileSystem;
use crate::lockfile::resolve_lock;
use std::path::Path;
use tracing::{debug, warn};

/// Runs one artifact update invocation.
///
/// Returns `Ok(None)` for every configuration no-op (nothing to regenerate,
/// maintenance conflicts, fresh project without a lock file, unchanged lock
/// after regeneration), `Ok(Some(..))` for exactly one error or addition,
/// and `Err` only for the transient signal.
pub async fn update_artifacts(
    request: &UpdateArtifactRequest,
    updater: &dyn UpdaterCapability,
    fs: &dyn FileSystem,
    runner: &dyn CommandRunner,
    host_rules: &HostRules,
) -> Result<Option<ArtifactResult>, TransientError> {
    let maintenance = request.config.maintenance;

    // Nothing to regenerate.
    if request.updated_deps.is_empty() && !maintenance {
        debug!(manifest = %request.manifest_path.display(), "no updated deps, skipping");
        return Ok(None);
    }

    let lock = match resolve_lock(fs, &request.manifest_path, updater.lock_file_name()) {
        Ok(lock) => lock,
        Err(e) => {
            return Ok(Some(ArtifactResult::error(e.path().clone(), e.to_string())));
        }
    };

    if maintenance {
        if lock.umbrella {
            // Full regeneration would rewrite a lock file shared by sibling
            // projects outside this manifest's directory.
            warn!(
                manifest = %request.manifest_path.display(),
                lock = %lock.path.display(),
                "lock maintenance skipped for umbrella lock file"
            );
            return Ok(None);
        }
        if lock.content.is_none() {
            debug!(
                manifest = %request.manifest_path.display(),
                "no lock file to maintain"
            );
            return Ok(None);
        }
    }

    if maintenance {
        if let Err(e) = fs.delete(&lock.path) {
            return Ok(Some(ArtifactResult::error(
                lock.path.clone(),
                format!("failed to delete lock file before regeneration: {}", e),
            )));
        }
    }
    if let Err(e) = fs.write_text(&request.manifest_path, &request.new_manifest_content) {
        return Ok(Some(ArtifactResult::error(
            lock.path.clone(),
            format!(
                "failed to write manifest {}: {}",
                request.manifest_path.display(),
                e
            ),
        )));
    }

    // A manifest-only change with no lock file to regenerate.
    let Some(existing_lock_content) = lock.content else {
        return Ok(None);
    };

    let pre_commands: Vec<String> = match updater.registry_auth() {
        Some(registry) => build_auth_credentials(host_rules, &request.updated_deps, registry)
            .iter()
            .filter_map(|credential| updater.auth_command(credential))
            .collect(),
        None => Vec::new(),
    };

    let command = if maintenance {
        updater.maintenance_command()
    } else {
        let quoted: Vec<String> = request
            .updated_deps
            .iter()
            .map(|dep| shell_quote(&dep.name))
            .collect();
        updater.update_command(&quoted)
    };

    let options = ExecOptions {
        extra_env: updater.extra_env(&request.config),
        working_dir: request
            .manifest_path
            .parent()
            .map(Path::to_path_buf),
        tool_constraints: updater.tool_constraints(&request.config),
        pre_commands,
    };

    match runner.exec(&command, &options).await {
        Ok(_) => {}
        Err(ExecError::Transient(transient)) => {
            if maintenance {
                // The lock file was deleted before execution; put it back so
                // a retried invocation sees the same state as this one did,
                // instead of hitting the "nothing to maintain" guard.
                if let Err(e) = fs.write_text(&lock.path, &existing_lock_content) {
                    return Ok(Some(ArtifactResult::error(
                        lock.path.clone(),
                        format!("failed to restore lock file after transient failure: {}", e),
                    )));
                }
            }
            return Err(transient);
        }
        Err(e) => {
            return Ok(Some(ArtifactResult::error(lock.path.clone(), e.to_string())));
        }
    }

    match fs.read_text(&lock.path) {
        Ok(Some(new_content)) if new_content == existing_lock_content => Ok(None),
        Ok(Some(new_content)) => Ok(Some(ArtifactResult::addition(lock.path, new_content))),
        Ok(None) => Ok(Some(ArtifactResult::error(
            lock.path.clone(),
            format!("'{}' produced no lock file", command),
        ))),
        Err(e) => Ok(Some(ArtifactResult::error(
            lock.path.clone(),
            format!("lock file unreadable after '{}': {}", command, e),
        ))),
    }
}
