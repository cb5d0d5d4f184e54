//! External command execution collaborator
//!
//! This module provides:
//! - The CommandRunner trait the artifact updater invokes through
//! - ExecOptions carrying env overrides, pre-commands and tool constraints
//! - SystemRunner, which shells out through `sh -c`
//! - Shell quoting for dependency identifiers

use crate::domain::ToolConstraint;
use crate::error::ExecError;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::trace;

/// Options for one external command invocation
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    /// Extra environment variables (e.g. a private cache directory)
    pub extra_env: Vec<(String, String)>,
    /// Working directory, relative paths resolved by the runner's scope
    pub working_dir: Option<PathBuf>,
    /// Version constraints for toolchains the command depends on
    pub tool_constraints: Vec<ToolConstraint>,
    /// Commands run before the main command (registry authentication)
    pub pre_commands: Vec<String>,
}

/// Captured output of a successful invocation
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes external commands on behalf of the artifact updater
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` with the given options.
    ///
    /// Implementations signal retryable infrastructure failures with
    /// `ExecError::Transient`; everything else is classified by the caller.
    async fn exec(&self, command: &str, options: &ExecOptions) -> Result<ExecOutput, ExecError>;
}

/// Runner that executes commands through the system shell
#[derive(Debug, Default)]
pub struct SystemRunner {
    /// Base directory that relative working dirs are resolved against
    root: PathBuf,
}

impl SystemRunner {
    /// Creates a runner rooted at the repository directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Joins pre-commands and the main command into one shell line
    fn shell_line(command: &str, options: &ExecOptions) -> String {
        if options.pre_commands.is_empty() {
            return command.to_string();
        }
        let mut parts = options.pre_commands.clone();
        parts.push(command.to_string());
        parts.join(" && ")
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn exec(&self, command: &str, options: &ExecOptions) -> Result<ExecOutput, ExecError> {
        let line = Self::shell_line(command, options);
        let cwd = match &options.working_dir {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        };

        // Tool constraints are advisory here; a containerized runner would
        // install matching toolchains before executing.
        for constraint in &options.tool_constraints {
            trace!(tool = %constraint.tool, constraint = %constraint.constraint, "tool constraint");
        }

        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(&line).current_dir(&cwd);
        for (key, value) in &options.extra_env {
            cmd.env(key, value);
        }

        let output = cmd
            .output()
            .await
            .map_err(|e| ExecError::spawn(line.clone(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if output.status.success() {
            Ok(ExecOutput { stdout, stderr })
        } else {
            Err(ExecError::failed(
                line,
                output.status.code().unwrap_or(-1),
                stderr,
            ))
        }
    }
}

/// Quotes a string for safe use as a single shell word.
///
/// Wraps in single quotes, escaping embedded single quotes the POSIX way.
pub fn shell_quote(s: &str) -> String {
    if !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '@' | ':'))
    {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', r"'\''"))
}
