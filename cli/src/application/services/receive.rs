//! Application service — search, download and install of available updates.
//!
//! Imports only from `crate::domain`, `crate::application::ports` and the
//! shared record types. All I/O is routed through injected port traits.

use tracing::Instrument as _;
use wuwrap_common::{AvailableUpdate, FetchMode, InstallationResult};

use crate::application::ports::{
    LocalHost, ProgressReporter, UpdateSession, UpdateSessionFactory,
};
use crate::application::services::batch::BatchReport;
use crate::domain::error::UpdateError;
use crate::domain::machine::{requested_targets, resolve_computer_name, validate_update_name};
use crate::domain::selection::select_updates;

/// Parameters shared by every machine of a `receive` run.
#[derive(Debug, Clone, Copy)]
pub struct ReceiveRequest<'a> {
    /// Title fragment or KB id; empty selects every available update.
    pub update_name: &'a str,
    /// Agent search criteria.
    pub criteria: &'a str,
    pub mode: FetchMode,
    /// Report the selection without downloading anything.
    pub dry_run: bool,
}

/// Result of `receive` on one machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// Nothing available matched the update name.
    NoMatch,
    /// Dry run: these updates would be fetched.
    Planned(Vec<AvailableUpdate>),
    /// The agent ran the download/install.
    Completed {
        selected: Vec<AvailableUpdate>,
        result: InstallationResult,
    },
}

impl ReceiveOutcome {
    /// Number of updates selected on the machine.
    #[must_use]
    pub fn selected_count(&self) -> usize {
        match self {
            Self::NoMatch => 0,
            Self::Planned(selected) | Self::Completed { selected, .. } => selected.len(),
        }
    }
}

/// Available updates on `machine` named by `update_name`.
///
/// # Errors
///
/// `SessionCreation` if no session could be opened, or `Query` if the
/// search failed.
pub async fn search_available<F: UpdateSessionFactory>(
    factory: &F,
    machine: &str,
    criteria: &str,
    update_name: &str,
) -> Result<Vec<AvailableUpdate>, UpdateError> {
    let session = factory.open_session(machine).await?;
    let found = session.search_updates(criteria).await?;
    tracing::debug!(available = found.len(), "search complete");
    Ok(select_updates(&found, update_name)
        .into_iter()
        .cloned()
        .collect())
}

/// Select and fetch updates on one machine.
///
/// # Errors
///
/// `SessionCreation`, `Query` (search), `Fetch` (download/install) or
/// `NotImplemented` when the backend cannot fetch.
pub async fn receive_updates<F, R>(
    factory: &F,
    machine: &str,
    request: &ReceiveRequest<'_>,
    reporter: &R,
) -> Result<ReceiveOutcome, UpdateError>
where
    F: UpdateSessionFactory,
    R: ProgressReporter,
{
    reporter.step(&format!("Searching for updates on {machine}"));
    let session = factory.open_session(machine).await?;
    let found = session.search_updates(request.criteria).await?;
    let selected: Vec<AvailableUpdate> = select_updates(&found, request.update_name)
        .into_iter()
        .cloned()
        .collect();

    if selected.is_empty() {
        reporter.success(&format!("No matching updates on {machine}"));
        return Ok(ReceiveOutcome::NoMatch);
    }
    reporter.success(&format!(
        "{} matching update(s) on {machine}",
        selected.len()
    ));

    if request.dry_run {
        return Ok(ReceiveOutcome::Planned(selected));
    }

    let verb = match request.mode {
        FetchMode::Install => "Downloading and installing",
        FetchMode::DownloadOnly => "Downloading",
    };
    reporter.step(&format!("{verb} {} update(s)", selected.len()));

    let ids: Vec<String> = selected.iter().map(|u| u.id.clone()).collect();
    let result = session.fetch_updates(&ids, request.mode).await?;

    let summary = format!("{machine}: {}", result.status());
    if result.is_success() {
        reporter.success(&summary);
    } else {
        reporter.warn(&summary);
    }
    if result.reboot_required {
        reporter.warn(&format!("{machine} requires a reboot to finish installing"));
    }

    Ok(ReceiveOutcome::Completed { selected, result })
}

/// Run `receive` on every requested machine, one after another.
pub async fn receive_batch<F, H, R, E>(
    factory: &F,
    host: &H,
    computer_names: &[String],
    request: &ReceiveRequest<'_>,
    reporter: &R,
    emit: &mut E,
) -> BatchReport
where
    F: UpdateSessionFactory,
    H: LocalHost,
    R: ProgressReporter,
    E: FnMut(&str, &ReceiveOutcome),
{
    let mut report = BatchReport::default();
    if let Err(e) = validate_update_name(request.update_name) {
        for raw in requested_targets(computer_names) {
            report.failed(raw, 0, e.clone());
        }
        return report;
    }

    let local = host.machine_name();
    for raw in requested_targets(computer_names) {
        let machine = match resolve_computer_name(&raw, &local) {
            Ok(m) => m,
            Err(e) => {
                report.failed(raw, 0, e);
                continue;
            }
        };

        let span = tracing::info_span!("receive", machine = %machine);
        match receive_updates(factory, &machine, request, reporter)
            .instrument(span)
            .await
        {
            Ok(outcome) => {
                emit(&machine, &outcome);
                report.succeeded(machine, outcome.selected_count());
            }
            Err(e) => {
                tracing::warn!(machine = %machine, error = %e, "receive failed");
                report.failed(machine, 0, e);
            }
        }
    }
    report
}

/// List matching available updates on every requested machine.
pub async fn search_batch<F, H, E>(
    factory: &F,
    host: &H,
    computer_names: &[String],
    criteria: &str,
    update_name: &str,
    emit: &mut E,
) -> BatchReport
where
    F: UpdateSessionFactory,
    H: LocalHost,
    E: FnMut(&str, &[AvailableUpdate]),
{
    let mut report = BatchReport::default();
    if let Err(e) = validate_update_name(update_name) {
        for raw in requested_targets(computer_names) {
            report.failed(raw, 0, e.clone());
        }
        return report;
    }

    let local = host.machine_name();
    for raw in requested_targets(computer_names) {
        let machine = match resolve_computer_name(&raw, &local) {
            Ok(m) => m,
            Err(e) => {
                report.failed(raw, 0, e);
                continue;
            }
        };

        let span = tracing::info_span!("search", machine = %machine);
        match search_available(factory, &machine, criteria, update_name)
            .instrument(span)
            .await
        {
            Ok(updates) => {
                emit(&machine, &updates);
                report.succeeded(machine, updates.len());
            }
            Err(e) => {
                tracing::warn!(machine = %machine, error = %e, "search failed");
                report.failed(machine, 0, e);
            }
        }
    }
    report
}
