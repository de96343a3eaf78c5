//! JSON output.
//!
//! Streaming commands print one compact JSON object per line so callers can
//! consume results as they arrive. Every object carries `computer_name`.

use anyhow::{Context, Result};
use serde::Serialize;
use wuwrap_common::{AvailableUpdate, UpdateHistoryRecord};

use crate::application::services::{BatchReport, ReceiveOutcome};
use crate::domain::config::WuwrapConfig;

/// Format a JSON error object as a single line.
///
/// ```json
/// {"error":true,"message":"...","code":"..."}
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string(&obj).context("JSON serialization failed")
}

#[derive(Serialize)]
struct MachineRow<'a, T: Serialize> {
    computer_name: &'a str,
    #[serde(flatten)]
    inner: &'a T,
}

/// Renders results as newline-delimited JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    fn emit(value: &impl Serialize) {
        match serde_json::to_string(value) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "JSON serialization failed"),
        }
    }

    pub fn render_history_record(&self, machine: &str, record: &UpdateHistoryRecord) {
        Self::emit(&MachineRow {
            computer_name: machine,
            inner: record,
        });
    }

    pub fn render_available(&self, machine: &str, updates: &[AvailableUpdate]) {
        for update in updates {
            Self::emit(&MachineRow {
                computer_name: machine,
                inner: update,
            });
        }
    }

    pub fn render_receive(&self, machine: &str, outcome: &ReceiveOutcome) {
        let value = match outcome {
            ReceiveOutcome::NoMatch => serde_json::json!({
                "computer_name": machine,
                "selected": [],
                "result": null,
            }),
            ReceiveOutcome::Planned(selected) => serde_json::json!({
                "computer_name": machine,
                "dry_run": true,
                "selected": selected,
                "result": null,
            }),
            ReceiveOutcome::Completed { selected, result } => serde_json::json!({
                "computer_name": machine,
                "selected": selected,
                "status": result.status(),
                "result": result,
            }),
        };
        Self::emit(&value);
    }

    /// One error object per failed machine.
    pub fn render_failures(&self, report: &BatchReport) {
        for outcome in report.failures() {
            if let Some(err) = &outcome.error {
                Self::emit(&serde_json::json!({
                    "error": true,
                    "message": err.to_string(),
                    "code": err.code(),
                    "computer_name": outcome.machine,
                }));
            }
        }
    }

    pub fn render_version(&self, version: &str) {
        Self::emit(&serde_json::json!({ "version": version }));
    }

    /// Render the configuration and its file path.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &WuwrapConfig, path: &std::path::Path) -> Result<()> {
        let obj = serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&obj).context("JSON serialization failed")?
        );
        Ok(())
    }
}
