//! Application service — update history use-case.
//!
//! Imports only from `crate::domain`, `crate::application::ports` and the
//! shared record types. All I/O is routed through injected port traits.

use tracing::Instrument as _;
use wuwrap_common::{UpdateHistoryRecord, normalize};

use crate::application::ports::{LocalHost, UpdateSession, UpdateSessionFactory};
use crate::application::services::batch::BatchReport;
use crate::domain::error::UpdateError;
use crate::domain::machine::{requested_targets, resolve_computer_name};

/// Stream the full update history of one machine into `emit`.
///
/// Records are emitted in agent order as they are normalized. Returns the
/// number of records emitted.
///
/// # Errors
///
/// `SessionCreation` if no session could be opened (nothing emitted), or
/// `Query` if the count or history call failed afterwards.
pub async fn query_history<F, E>(factory: &F, machine: &str, emit: &mut E) -> Result<usize, UpdateError>
where
    F: UpdateSessionFactory,
    E: FnMut(&str, UpdateHistoryRecord),
{
    let session = factory.open_session(machine).await?;
    let count = session.history_count().await?;
    tracing::debug!(count, "history entries reported");
    if count == 0 {
        return Ok(0);
    }

    let entries = session.query_history(0, count).await?;
    let mut emitted = 0;
    for entry in &entries {
        emit(session.machine(), normalize(entry));
        emitted += 1;
    }
    Ok(emitted)
}

/// Query the history of every requested machine, one after another.
///
/// No names means the local machine; an empty name is replaced with the
/// local machine name. `find_update` is accepted but not applied yet.
///
/// `emit` receives the position of the target in the batch, so a machine
/// named twice yields two separate groups.
pub async fn query_history_batch<F, H, E>(
    factory: &F,
    host: &H,
    computer_names: &[String],
    find_update: Option<&str>,
    emit: &mut E,
) -> BatchReport
where
    F: UpdateSessionFactory,
    H: LocalHost,
    E: FnMut(usize, &str, UpdateHistoryRecord),
{
    if let Some(filter) = find_update.filter(|f| !f.is_empty()) {
        tracing::warn!(find_update = %filter, "FindUpdate is accepted but does not filter history yet");
    }

    let local = host.machine_name();
    let mut report = BatchReport::default();

    for (index, raw) in requested_targets(computer_names).into_iter().enumerate() {
        let machine = match resolve_computer_name(&raw, &local) {
            Ok(m) => m,
            Err(e) => {
                report.failed(raw, 0, e);
                continue;
            }
        };

        let mut emitted = 0usize;
        let mut counting = |m: &str, record: UpdateHistoryRecord| {
            emitted += 1;
            emit(index, m, record);
        };
        let span = tracing::info_span!("history", machine = %machine);
        let result = query_history(factory, &machine, &mut counting)
            .instrument(span)
            .await;

        match result {
            Ok(n) => {
                tracing::info!(machine = %machine, records = n, "history query complete");
                report.succeeded(machine, n);
            }
            Err(e) => {
                tracing::warn!(machine = %machine, error = %e, "history query failed");
                report.failed(machine, emitted, e);
            }
        }
    }
    report
}
