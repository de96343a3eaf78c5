//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and the shared record types —
//! never from `crate::infra`, `crate::commands`, or `crate::output`.

use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use wuwrap_common::{AvailableUpdate, FetchMode, InstallationResult, RawHistoryEntry};

use crate::domain::config::WuwrapConfig;
use crate::domain::error::UpdateError;

// ── Update Agent Ports ────────────────────────────────────────────────────────

/// Opens update sessions scoped to one machine.
#[allow(async_fn_in_trait)]
pub trait UpdateSessionFactory {
    type Session: UpdateSession;

    /// Open a session on `machine` (already resolved, never empty).
    ///
    /// # Errors
    ///
    /// Returns `UpdateError::SessionCreation` when the agent on `machine`
    /// cannot be reached or activated.
    async fn open_session(&self, machine: &str) -> Result<Self::Session, UpdateError>;
}

/// An open update session. Dropping it releases the session.
#[allow(async_fn_in_trait)]
pub trait UpdateSession {
    /// Machine this session is scoped to.
    fn machine(&self) -> &str;

    /// Total number of entries in the machine's update history.
    async fn history_count(&self) -> Result<u32, UpdateError>;

    /// History entries `start .. start + count`, in agent order.
    async fn query_history(
        &self,
        start: u32,
        count: u32,
    ) -> Result<Vec<RawHistoryEntry>, UpdateError>;

    /// Updates matching the agent search `criteria`.
    async fn search_updates(&self, criteria: &str) -> Result<Vec<AvailableUpdate>, UpdateError>;

    /// Download (and optionally install) the updates with the given ids.
    ///
    /// Backends that only read history keep this default.
    async fn fetch_updates(
        &self,
        ids: &[String],
        mode: FetchMode,
    ) -> Result<InstallationResult, UpdateError> {
        let _ = (ids, mode);
        Err(UpdateError::NotImplemented {
            operation: "Update download/install",
        })
    }
}

/// Identity of the host wuwrap runs on.
pub trait LocalHost {
    /// Name used when no computer name is given.
    fn machine_name(&self) -> String;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Returned (inside `anyhow::Error`) when a process exceeds its timeout.
#[derive(Debug, Error)]
#[error("{program} timed out after {secs}s")]
pub struct CommandTimeout {
    pub program: String,
    pub secs: u64,
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Every caller states its own deadline.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned, or a
    /// [`CommandTimeout`] if it exceeds `timeout`. On timeout, the child
    /// process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, falling back to defaults when absent.
    fn load(&self) -> Result<WuwrapConfig>;
    /// Persist the configuration.
    fn save(&self, config: &WuwrapConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
