//! relock - lock file maintenance CLI
//!
//! Scans a repository for package manifests, extracts their dependencies and
//! (with --maintenance) regenerates the corresponding lock files through the
//! ecosystem's own tooling:
//! - Elixir (mix.exs / mix.lock)
//! - Rust (Cargo.toml / Cargo.lock)
//! - Node.js (package.json / package-lock.json)

use clap::Parser;
use relock::cli::CliArgs;
use relock::discovery::discover_candidates;
use relock::domain::{HostRules, UpdateConfig};
use relock::ecosystems::EcosystemRegistry;
use relock::exec::SystemRunner;
use relock::fsx::LocalFs;
use relock::orchestrator::{Orchestrator, RunOptions};
use relock::output::create_formatter;
use relock::progress::Spinner;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Environment variable holding host rules as JSON
const HOST_RULES_ENV: &str = "RELOCK_HOST_RULES";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RELOCK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse();
    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if !args.path.is_dir() {
        anyhow::bail!("not a directory: {}", args.path.display());
    }

    let registry = EcosystemRegistry::builtin();
    let candidates = discover_candidates(&args.path, &registry);

    let fs = Arc::new(LocalFs::new(&args.path));
    let runner = Arc::new(SystemRunner::new(&args.path));
    let orchestrator = Orchestrator::new(registry, fs, runner, host_rules_from_env()?);

    let mut update = UpdateConfig::new();
    if let Some(dir) = &args.cache_dir {
        update = update.with_cache_dir(dir);
    }
    let options = RunOptions {
        ecosystems: args.ecosystem_filter(),
        maintenance: args.maintenance,
        update,
    };

    let spinner = Spinner::start(
        !args.quiet && !args.json,
        if args.maintenance {
            "updating lock files..."
        } else {
            "extracting dependencies..."
        },
    );
    let report = orchestrator.run(&candidates, &options).await;
    spinner.clear();

    let formatter = create_formatter(args.json, args.quiet);
    let mut stdout = io::stdout().lock();
    formatter.format(&report, &mut stdout)?;
    stdout.flush()?;

    if report.has_artifact_errors() || !report.errors.is_empty() {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Read host rules from the environment, if configured
fn host_rules_from_env() -> anyhow::Result<HostRules> {
    match std::env::var(HOST_RULES_ENV) {
        Ok(json) => serde_json::from_str(&json)
            .map_err(|e| anyhow::anyhow!("invalid {} value: {}", HOST_RULES_ENV, e)),
        Err(_) => Ok(HostRules::default()),
    }
}
