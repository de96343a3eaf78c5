//! `wuwrap history` — stream the update history of one or more machines.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use wuwrap_common::UpdateHistoryRecord;

use crate::app::AppContext;
use crate::application::services::history;
use crate::commands::{TargetArgs, exit_code};

/// Arguments for the history command.
#[derive(Args, Debug, Clone, Default)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Update to look for in the history (accepted, not applied yet)
    #[arg(short = 'f', long = "find-update", value_name = "NAME")]
    pub find_update: Option<String>,
}

/// Run the history command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded. Per-machine
/// failures are rendered and turn the exit code into `FAILURE`.
pub async fn run(app: &AppContext, args: &HistoryArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let agent = app.update_agent(&config);
    let renderer = app.renderer();

    let mut current: Option<usize> = None;
    let mut emit = |index: usize, machine: &str, record: UpdateHistoryRecord| {
        if current != Some(index) {
            renderer.history_machine(machine);
            current = Some(index);
        }
        renderer.history_record(machine, &record);
    };

    let report = history::query_history_batch(
        &agent,
        &app.host,
        &args.targets.names(),
        args.find_update.as_deref(),
        &mut emit,
    )
    .await;

    renderer.history_report(&report);
    Ok(exit_code(&report))
}
