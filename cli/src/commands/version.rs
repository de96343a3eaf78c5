//! Version command

use std::process::ExitCode;

use crate::app::AppContext;

/// Print the wuwrap version.
#[must_use]
pub fn run(app: &AppContext) -> ExitCode {
    app.renderer().version(env!("CARGO_PKG_VERSION"));
    ExitCode::SUCCESS
}
