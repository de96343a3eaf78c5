//! `wuwrap receive` — download and install available updates.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use wuwrap_common::FetchMode;

use crate::app::AppContext;
use crate::application::services::receive::{self, ReceiveOutcome, ReceiveRequest};
use crate::commands::{TargetArgs, exit_code};
use crate::output::TerminalReporter;

/// Arguments for the receive command.
#[derive(Args, Debug, Clone, Default)]
pub struct ReceiveArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Title fragment or KB id of the update(s) to fetch; omit for all available
    #[arg(short = 'u', long = "update-name", value_name = "NAME")]
    pub update_name: Option<String>,

    /// Download into the update cache without installing
    #[arg(long)]
    pub download_only: bool,

    /// Show what would be fetched and stop
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the receive command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded. Per-machine
/// failures, and installs that did not succeed, set the exit code to
/// `FAILURE`.
pub async fn run(app: &AppContext, args: &ReceiveArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let agent = app.update_agent(&config);
    let renderer = app.renderer();
    let reporter = TerminalReporter::new(&app.output);

    let request = ReceiveRequest {
        update_name: args.update_name.as_deref().unwrap_or(""),
        criteria: &config.search.criteria,
        mode: if args.download_only {
            FetchMode::DownloadOnly
        } else {
            FetchMode::Install
        },
        dry_run: args.dry_run,
    };

    let mut unsuccessful = false;
    let mut emit = |machine: &str, outcome: &ReceiveOutcome| {
        if let ReceiveOutcome::Completed { result, .. } = outcome {
            unsuccessful |= !result.is_success();
        }
        renderer.receive(machine, outcome);
    };

    let report = receive::receive_batch(
        &agent,
        &app.host,
        &args.targets.names(),
        &request,
        &reporter,
        &mut emit,
    )
    .await;
    drop(reporter);

    renderer.batch_report(&report, "update(s) selected");
    if unsuccessful {
        return Ok(ExitCode::FAILURE);
    }
    Ok(exit_code(&report))
}
