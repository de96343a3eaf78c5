//! Command implementations

pub mod config;
pub mod history;
pub mod receive;
pub mod search;
pub mod version;

use std::process::ExitCode;

use clap::Args;

use crate::application::services::BatchReport;

/// Machines a command runs against.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Computer to run against; repeat for several. An empty name means this machine
    #[arg(short = 'c', long = "computer-name", value_name = "NAME")]
    pub computer_name: Vec<String>,

    /// Computer names, appended after any --computer-name values
    #[arg(value_name = "COMPUTER_NAME")]
    pub computers: Vec<String>,
}

impl TargetArgs {
    /// All requested names in command-line order; empty means this machine.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.computer_name
            .iter()
            .chain(&self.computers)
            .cloned()
            .collect()
    }
}

/// `SUCCESS` only when every machine succeeded.
#[must_use]
pub fn exit_code(report: &BatchReport) -> ExitCode {
    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
