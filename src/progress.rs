//! Terminal spinner shown while the pipeline runs
//!
//! The CLI only has indeterminate phases (the orchestrator owns the
//! per-manifest fan-out internally), so a single steady-tick spinner is the
//! whole surface here.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner handle; a disabled spinner is fully inert
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Starts a spinner unless disabled (quiet or machine-readable output)
    pub fn start(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid template"),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar: Some(bar) }
    }

    /// Stops the spinner and clears its line
    pub fn clear(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_is_inert() {
        let spinner = Spinner::start(false, "extracting");
        assert!(spinner.bar.is_none());
        spinner.clear();
    }

    #[test]
    fn test_enabled_spinner_holds_bar_until_clear() {
        let spinner = Spinner::start(true, "updating lock files");
        assert!(spinner.bar.is_some());
        spinner.clear();
    }
}
