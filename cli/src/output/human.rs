//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;
use wuwrap_common::{AvailableUpdate, InstallationResult, UpdateHistoryRecord};

use crate::application::services::{BatchReport, ReceiveOutcome};
use crate::domain::config::{VALID_CONFIG_KEYS, WuwrapConfig};
use crate::output::OutputContext;

/// Renders results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Machine heading followed by the history column titles.
    pub fn render_history_header(&self, machine: &str) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(machine);
        println!(
            "  {}",
            format!(
                "{:<23}  {:<11}  {:<19}  {:<10}  {}",
                "Date", "Operation", "Status", "KB", "Name"
            )
            .style(self.ctx.styles.dim)
        );
    }

    /// One history row. Rows are data, so `quiet` does not hide them.
    pub fn render_history_record(&self, record: &UpdateHistoryRecord) {
        let status = format!("{:<19}", record.status());
        println!(
            "  {:<23}  {:<11}  {}  {:<10}  {}",
            record.date(),
            record.operation(),
            status.style(self.ctx.styles.for_status(record.status())),
            record.kb(),
            record.name(),
        );
    }

    pub fn render_available(&self, machine: &str, updates: &[AvailableUpdate]) {
        if !self.ctx.quiet {
            println!();
            self.ctx.header(machine);
        }
        if updates.is_empty() {
            self.ctx.info("No matching updates available");
            return;
        }
        for update in updates {
            let kb = update
                .kb_article_ids
                .first()
                .map(|id| format!("KB{id}"))
                .unwrap_or_default();
            let cached = if update.is_downloaded { "  [downloaded]" } else { "" };
            println!("  {kb:<10}  {}{}", update.title, cached.style(self.ctx.styles.dim));
        }
    }

    pub fn render_receive(&self, machine: &str, outcome: &ReceiveOutcome) {
        match outcome {
            ReceiveOutcome::NoMatch => {}
            ReceiveOutcome::Planned(selected) => {
                self.ctx.info(&format!("Dry run: would fetch on {machine}:"));
                for update in selected {
                    println!("    {}", update.title);
                }
            }
            ReceiveOutcome::Completed { result, .. } => self.render_installation(result),
        }
    }

    fn render_installation(&self, result: &InstallationResult) {
        for update in &result.updates {
            let status = format!("{:<19}", update.status());
            println!(
                "    {}  {}",
                status.style(self.ctx.styles.for_status(update.status())),
                update.title
            );
        }
    }

    /// Machines that answered but have never recorded an update.
    pub fn render_empty_history(&self, report: &BatchReport) {
        for outcome in &report.outcomes {
            if outcome.error.is_none() && outcome.items == 0 {
                self.ctx
                    .info(&format!("No update history on {}", outcome.machine));
            }
        }
    }

    /// Failed machines go to stderr and are never suppressed.
    pub fn render_failures(&self, report: &BatchReport) {
        for outcome in report.failures() {
            if let Some(err) = &outcome.error {
                self.ctx.error(&err.to_string());
            }
        }
    }

    /// Closing line of a multi-machine run.
    pub fn render_summary(&self, report: &BatchReport, noun: &str) {
        if self.ctx.quiet || report.outcomes.len() < 2 {
            return;
        }
        let failed = report.failures().count();
        println!();
        let msg = format!(
            "{} {noun} from {} machine(s), {failed} failed",
            report.total_items(),
            report.outcomes.len() - failed,
        );
        if failed == 0 {
            self.ctx.success(&msg);
        } else {
            self.ctx.warn(&msg);
        }
    }

    /// Render the current wuwrap configuration.
    pub fn render_config(&self, config: &WuwrapConfig, path: &std::path::Path) {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for key in VALID_CONFIG_KEYS {
            let value = config.get(key).unwrap_or_default();
            println!("  {:<24} {value}", format!("{key}:"));
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        println!(
            "    {:<18} {}",
            "WUWRAP_CONFIG:",
            std::env::var("WUWRAP_CONFIG").unwrap_or_else(|_| "(not set)".to_string())
        );
        println!(
            "    {:<18} {}",
            "RUST_LOG:",
            std::env::var("RUST_LOG").unwrap_or_else(|_| "(not set)".to_string())
        );
        println!();
    }
}
