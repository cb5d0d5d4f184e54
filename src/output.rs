//! Output formatting for pipeline results
//!
//! This module provides:
//! - Text output for human-readable display with colors
//! - JSON output for machine processing
//! - Per-ecosystem dependency listings and artifact outcome display

use crate::domain::ArtifactResult;
use crate::orchestrator::RunReport;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for machine processing
    Json,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Errors and summary only
    Quiet,
    /// Normal output
    #[default]
    Normal,
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the pipeline report
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on CLI flags
pub fn create_formatter(json: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    let verbosity = if quiet {
        Verbosity::Quiet
    } else {
        Verbosity::Normal
    };
    match json {
        true => Box::new(JsonFormatter::new(verbosity)),
        false => Box::new(TextFormatter::new(verbosity)),
    }
}

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn paint(&self, text: &str, painter: fn(&str) -> colored::ColoredString) -> String {
        if self.color {
            painter(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Format a single dependency line
    fn format_dep_line(&self, name: &str, current: Option<&str>, dep_type: Option<&str>) -> String {
        let mut line = format!("  {}", name);
        if let Some(value) = current {
            line.push_str(&format!(" {}", self.paint(value, |s| s.cyan())));
        }
        if let Some(kind) = dep_type {
            if kind != "prod" {
                line.push_str(&format!(" {}", self.paint(&format!("({})", kind), |s| s.dimmed())));
            }
        }
        line
    }

    /// Format a single artifact outcome line
    fn format_artifact_line(&self, artifact: &ArtifactResult) -> String {
        match artifact {
            ArtifactResult::Addition(addition) => format!(
                "  {} {}",
                self.paint("updated", |s| s.green()),
                addition.path.display()
            ),
            ArtifactResult::Error(error) => format!(
                "  {} {}: {}",
                self.paint("failed", |s| s.red().bold()),
                error.lock_file.display(),
                error.message
            ),
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet {
            for extraction in &report.extractions {
                writeln!(
                    writer,
                    "{}",
                    self.paint(&extraction.ecosystem, |s| s.bold())
                )?;
                for file in &extraction.files {
                    writeln!(writer, "{}", file.path.display())?;
                    for dep in &file.deps {
                        let display = dep.display_name.as_deref().unwrap_or(&dep.name);
                        writeln!(
                            writer,
                            "{}",
                            self.format_dep_line(
                                display,
                                dep.current_value.as_deref(),
                                dep.dep_type.as_deref(),
                            )
                        )?;
                    }
                }
                writeln!(writer)?;
            }
        }

        if !report.artifacts.is_empty() {
            writeln!(writer, "{}", self.paint("lock files", |s| s.bold()))?;
            for artifact in &report.artifacts {
                if self.verbosity == Verbosity::Quiet && !artifact.is_error() {
                    continue;
                }
                writeln!(writer, "{}", self.format_artifact_line(artifact))?;
            }
            writeln!(writer)?;
        }

        for error in &report.errors {
            writeln!(writer, "{} {}", self.paint("error:", |s| s.red().bold()), error)?;
        }

        let failures = report
            .artifacts
            .iter()
            .filter(|a| a.is_error())
            .count();
        let summary = format!(
            "{} dependencies across {} package files, {} lock updates, {} failures",
            report.total_deps(),
            report.extractions.iter().map(|e| e.files.len()).sum::<usize>(),
            report.artifacts.len() - failures,
            failures
        );
        writeln!(writer, "{}", self.paint(&summary, |s| s.dimmed()))?;
        Ok(())
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full report
#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: JsonSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    extractions: Option<&'a [crate::orchestrator::EcosystemExtraction]>,
    artifacts: &'a [ArtifactResult],
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    errors: &'a [String],
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    dependencies: usize,
    package_files: usize,
    lock_updates: usize,
    failures: usize,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &RunReport, writer: &mut dyn Write) -> std::io::Result<()> {
        let failures = report.artifacts.iter().filter(|a| a.is_error()).count();
        let output = JsonOutput {
            summary: JsonSummary {
                dependencies: report.total_deps(),
                package_files: report.extractions.iter().map(|e| e.files.len()).sum(),
                lock_updates: report.artifacts.len() - failures,
                failures,
            },
            extractions: match self.verbosity {
                Verbosity::Quiet => None,
                Verbosity::Normal => Some(&report.extractions),
            },
            artifacts: &report.artifacts,
            errors: &report.errors,
        };
        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)?;
        Ok(())
    }
}
