//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use console::Term;
use owo_colors::OwoColorize as _;
use wuwrap_common::{AvailableUpdate, UpdateHistoryRecord};

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;
pub use styles::Styles;

use crate::application::services::{BatchReport, ReceiveOutcome};
use crate::domain::config::WuwrapConfig;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }
}

/// Dispatches rendering to the human or JSON renderer.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Called when history output moves on to a new machine.
    pub fn history_machine(&self, machine: &str) {
        if let Self::Human(r) = self {
            r.render_history_header(machine);
        }
    }

    pub fn history_record(&self, machine: &str, record: &UpdateHistoryRecord) {
        match self {
            Self::Human(r) => r.render_history_record(record),
            Self::Json(r) => r.render_history_record(machine, record),
        }
    }

    pub fn available(&self, machine: &str, updates: &[AvailableUpdate]) {
        match self {
            Self::Human(r) => r.render_available(machine, updates),
            Self::Json(r) => r.render_available(machine, updates),
        }
    }

    pub fn receive(&self, machine: &str, outcome: &ReceiveOutcome) {
        match self {
            Self::Human(r) => r.render_receive(machine, outcome),
            Self::Json(r) => r.render_receive(machine, outcome),
        }
    }

    /// History run epilogue: machines without history, then failures.
    pub fn history_report(&self, report: &BatchReport) {
        if let Self::Human(r) = self {
            r.render_empty_history(report);
        }
        self.batch_report(report, "history records");
    }

    /// Failures plus, for humans, a closing summary.
    pub fn batch_report(&self, report: &BatchReport, noun: &str) {
        match self {
            Self::Human(r) => {
                r.render_failures(report);
                r.render_summary(report, noun);
            }
            Self::Json(r) => r.render_failures(report),
        }
    }

    pub fn version(&self, version: &str) {
        match self {
            Self::Human(_) => println!("wuwrap {version}"),
            Self::Json(r) => r.render_version(version),
        }
    }

    /// Render the configuration and where it was loaded from.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn config(&self, config: &WuwrapConfig, path: &std::path::Path) -> anyhow::Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, path),
        }
    }
}
