//! CLI argument parsing module for relock

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Lock file maintenance across package ecosystems
#[derive(Parser, Debug, Clone)]
#[command(
    name = "relock",
    version,
    about = "Extracts dependencies and regenerates lock files across package ecosystems"
)]
pub struct CliArgs {
    /// Target repository directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Restrict the run to an ecosystem (can be specified multiple times)
    #[arg(short, long, action = ArgAction::Append)]
    pub ecosystem: Vec<String>,

    /// Regenerate lock files from scratch instead of only listing dependencies
    #[arg(short, long)]
    pub maintenance: bool,

    /// Private cache directory handed to the external tools
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable quiet mode - errors and summary only
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// The ecosystem allow-list, `None` when no filter was given
    pub fn ecosystem_filter(&self) -> Option<Vec<String>> {
        if self.ecosystem.is_empty() {
            None
        } else {
            Some(self.ecosystem.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_args() {
        let args = CliArgs::parse_from(["relock"]);
        assert_eq!(args.path, PathBuf::from("."));
        assert!(args.ecosystem.is_empty());
        assert!(!args.maintenance);
        assert!(args.cache_dir.is_none());
        assert!(!args.json);
        assert!(!args.quiet);
    }

    #[test]
    fn test_path_argument() {
        let args = CliArgs::parse_from(["relock", "/some/repo"]);
        assert_eq!(args.path, PathBuf::from("/some/repo"));
    }

    #[test]
    fn test_ecosystem_repeatable() {
        let args = CliArgs::parse_from(["relock", "-e", "mix", "--ecosystem", "npm"]);
        assert_eq!(args.ecosystem, vec!["mix", "npm"]);
        assert_eq!(
            args.ecosystem_filter(),
            Some(vec!["mix".to_string(), "npm".to_string()])
        );
    }

    #[test]
    fn test_no_filter_is_none() {
        let args = CliArgs::parse_from(["relock"]);
        assert!(args.ecosystem_filter().is_none());
    }

    #[test]
    fn test_maintenance_flags() {
        assert!(CliArgs::parse_from(["relock", "-m"]).maintenance);
        assert!(CliArgs::parse_from(["relock", "--maintenance"]).maintenance);
    }

    #[test]
    fn test_output_flags() {
        let args = CliArgs::parse_from(["relock", "--json", "-q"]);
        assert!(args.json);
        assert!(args.quiet);
    }
}
