//! `wuwrap search` — list available updates without fetching them.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use wuwrap_common::AvailableUpdate;

use crate::app::AppContext;
use crate::application::services::receive;
use crate::commands::{TargetArgs, exit_code};

/// Arguments for the search command.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    #[command(flatten)]
    pub targets: TargetArgs,

    /// Title fragment or KB id to filter by; omit to list everything
    #[arg(short = 'u', long = "update-name", value_name = "NAME")]
    pub update_name: Option<String>,
}

/// Run the search command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded.
pub async fn run(app: &AppContext, args: &SearchArgs) -> Result<ExitCode> {
    let config = app.load_config()?;
    let agent = app.update_agent(&config);
    let renderer = app.renderer();

    let mut emit = |machine: &str, updates: &[AvailableUpdate]| renderer.available(machine, updates);
    let report = receive::search_batch(
        &agent,
        &app.host,
        &args.targets.names(),
        &config.search.criteria,
        args.update_name.as_deref().unwrap_or(""),
        &mut emit,
    )
    .await;

    renderer.batch_report(&report, "available update(s)");
    Ok(exit_code(&report))
}
