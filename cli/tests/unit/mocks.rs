//! Shared mock infrastructure for unit tests.
//!
//! Provides a scripted [`UpdateSessionFactory`], a fixed [`LocalHost`] and a
//! recording [`ProgressReporter`] so each test file doesn't have to re-define
//! the same boilerplate.

#![allow(dead_code, clippy::expect_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use wuwrap_cli::application::ports::{
    LocalHost, ProgressReporter, UpdateSession, UpdateSessionFactory,
};
use wuwrap_cli::domain::error::UpdateError;
use wuwrap_common::{AvailableUpdate, FetchMode, InstallationResult, RawHistoryEntry};

// ── Mock: local host ─────────────────────────────────────────────────────────

pub struct FixedHost(pub &'static str);

impl LocalHost for FixedHost {
    fn machine_name(&self) -> String {
        self.0.to_string()
    }
}

// ── Mock: progress reporter ──────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock").clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.lock().expect("lock").push(format!("warn: {message}"));
    }
}

// ── Mock: scripted update agent ──────────────────────────────────────────────

/// What one fake machine answers.
#[derive(Debug, Clone, Default)]
pub struct MachineScript {
    pub history: Vec<RawHistoryEntry>,
    pub count_error: Option<String>,
    pub query_error: Option<String>,
    pub available: Vec<AvailableUpdate>,
    pub search_error: Option<String>,
    pub fetch: Option<InstallationResult>,
}

impl MachineScript {
    pub fn with_history(history: Vec<RawHistoryEntry>) -> Self {
        Self {
            history,
            ..Self::default()
        }
    }

    pub fn with_available(available: Vec<AvailableUpdate>) -> Self {
        Self {
            available,
            ..Self::default()
        }
    }
}

/// Calls the fake agent received, in order.
#[derive(Debug, Default)]
pub struct AgentLog {
    pub opened: Vec<String>,
    pub history_queries: Vec<(String, u32, u32)>,
    pub fetches: Vec<(String, Vec<String>, FetchMode)>,
}

/// Machines missing from the script are unreachable.
#[derive(Default)]
pub struct FakeAgent {
    machines: HashMap<String, MachineScript>,
    log: Arc<Mutex<AgentLog>>,
}

impl FakeAgent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn machine(mut self, name: &str, script: MachineScript) -> Self {
        self.machines.insert(name.to_string(), script);
        self
    }

    pub fn opened(&self) -> Vec<String> {
        self.log.lock().expect("lock").opened.clone()
    }

    pub fn history_queries(&self) -> Vec<(String, u32, u32)> {
        self.log.lock().expect("lock").history_queries.clone()
    }

    pub fn fetches(&self) -> Vec<(String, Vec<String>, FetchMode)> {
        self.log.lock().expect("lock").fetches.clone()
    }
}

impl UpdateSessionFactory for FakeAgent {
    type Session = FakeSession;

    async fn open_session(&self, machine: &str) -> Result<FakeSession, UpdateError> {
        self.log.lock().expect("lock").opened.push(machine.to_string());
        let script = self
            .machines
            .get(machine)
            .cloned()
            .ok_or_else(|| UpdateError::SessionCreation {
                machine: machine.to_string(),
                cause: "The RPC server is unavailable.".to_string(),
            })?;
        Ok(FakeSession {
            machine: machine.to_string(),
            script,
            log: Arc::clone(&self.log),
        })
    }
}

pub struct FakeSession {
    machine: String,
    script: MachineScript,
    log: Arc<Mutex<AgentLog>>,
}

impl FakeSession {
    fn query_error(&self, cause: &str) -> UpdateError {
        UpdateError::Query {
            machine: self.machine.clone(),
            cause: cause.to_string(),
        }
    }
}

impl UpdateSession for FakeSession {
    fn machine(&self) -> &str {
        &self.machine
    }

    async fn history_count(&self) -> Result<u32, UpdateError> {
        if let Some(cause) = &self.script.count_error {
            return Err(self.query_error(cause));
        }
        Ok(u32::try_from(self.script.history.len()).expect("small history"))
    }

    async fn query_history(&self, start: u32, count: u32) -> Result<Vec<RawHistoryEntry>, UpdateError> {
        self.log
            .lock()
            .expect("lock")
            .history_queries
            .push((self.machine.clone(), start, count));
        if let Some(cause) = &self.script.query_error {
            return Err(self.query_error(cause));
        }
        Ok(self
            .script
            .history
            .iter()
            .skip(start as usize)
            .take(count as usize)
            .cloned()
            .collect())
    }

    async fn search_updates(&self, _criteria: &str) -> Result<Vec<AvailableUpdate>, UpdateError> {
        if let Some(cause) = &self.script.search_error {
            return Err(self.query_error(cause));
        }
        Ok(self.script.available.clone())
    }

    async fn fetch_updates(&self, ids: &[String], mode: FetchMode) -> Result<InstallationResult, UpdateError> {
        self.log
            .lock()
            .expect("lock")
            .fetches
            .push((self.machine.clone(), ids.to_vec(), mode));
        self.script.fetch.clone().ok_or_else(|| UpdateError::Fetch {
            machine: self.machine.clone(),
            cause: "0x80240022".to_string(),
        })
    }
}

// ── Mock: history-only backend ───────────────────────────────────────────────

/// Backend that can read history but keeps the default `fetch_updates`.
pub struct HistoryOnlyAgent {
    pub available: Vec<AvailableUpdate>,
}

pub struct HistoryOnlySession {
    machine: String,
    available: Vec<AvailableUpdate>,
}

impl UpdateSessionFactory for HistoryOnlyAgent {
    type Session = HistoryOnlySession;

    async fn open_session(&self, machine: &str) -> Result<HistoryOnlySession, UpdateError> {
        Ok(HistoryOnlySession {
            machine: machine.to_string(),
            available: self.available.clone(),
        })
    }
}

impl UpdateSession for HistoryOnlySession {
    fn machine(&self) -> &str {
        &self.machine
    }

    async fn history_count(&self) -> Result<u32, UpdateError> {
        Ok(0)
    }

    async fn query_history(&self, _: u32, _: u32) -> Result<Vec<RawHistoryEntry>, UpdateError> {
        Ok(Vec::new())
    }

    async fn search_updates(&self, _: &str) -> Result<Vec<AvailableUpdate>, UpdateError> {
        Ok(self.available.clone())
    }
}
