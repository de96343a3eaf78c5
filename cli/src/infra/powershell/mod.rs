//! Windows Update Agent adapter driven through PowerShell.
//!
//! Implements the `UpdateSessionFactory` / `UpdateSession` ports by running
//! the scripts from [`scripts`] with the configured PowerShell host. Process
//! execution goes through the `CommandRunner` port so the adapter can be
//! tested without PowerShell.

pub mod scripts;

use std::process::Output;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use wuwrap_common::{AvailableUpdate, FetchMode, InstallationResult, RawHistoryEntry};

use crate::application::ports::{
    CommandRunner, CommandTimeout, UpdateSession, UpdateSessionFactory,
};
use crate::domain::config::WuwrapConfig;
use crate::domain::error::UpdateError;

/// Which error a failed script maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Session,
    Query,
    Fetch,
}

impl Stage {
    fn error(self, machine: &str, cause: String) -> UpdateError {
        let machine = machine.to_string();
        match self {
            Self::Session => UpdateError::SessionCreation { machine, cause },
            Self::Query => UpdateError::Query { machine, cause },
            Self::Fetch => UpdateError::Fetch { machine, cause },
        }
    }
}

/// PowerShell invocation settings shared by every session.
#[derive(Debug, Clone)]
pub struct PowerShellSettings {
    pub program: String,
    pub query_timeout: Duration,
    pub install_timeout: Duration,
}

impl From<&WuwrapConfig> for PowerShellSettings {
    fn from(config: &WuwrapConfig) -> Self {
        Self {
            program: config.powershell.program.clone(),
            query_timeout: Duration::from_secs(config.timeouts.query_secs),
            install_timeout: Duration::from_secs(config.timeouts.install_secs),
        }
    }
}

/// Production `UpdateSessionFactory`.
pub struct PowerShellUpdateAgent<R> {
    runner: Arc<R>,
    settings: Arc<PowerShellSettings>,
    criteria: Arc<str>,
}

impl<R: CommandRunner> PowerShellUpdateAgent<R> {
    /// `criteria` is the search used to re-locate updates when fetching.
    #[must_use]
    pub fn new(runner: R, settings: PowerShellSettings, criteria: &str) -> Self {
        Self {
            runner: Arc::new(runner),
            settings: Arc::new(settings),
            criteria: Arc::from(criteria),
        }
    }
}

impl<R: CommandRunner> UpdateSessionFactory for PowerShellUpdateAgent<R> {
    type Session = PowerShellSession<R>;

    async fn open_session(&self, machine: &str) -> Result<Self::Session, UpdateError> {
        let session = PowerShellSession {
            runner: Arc::clone(&self.runner),
            settings: Arc::clone(&self.settings),
            criteria: Arc::clone(&self.criteria),
            machine: machine.to_string(),
        };
        session
            .run_script(
                "open session",
                Stage::Session,
                &scripts::session_check(machine),
                self.settings.query_timeout,
            )
            .await?;
        tracing::debug!(machine, "update session opened");
        Ok(session)
    }
}

/// A session on one machine. Each call activates the agent anew.
pub struct PowerShellSession<R> {
    runner: Arc<R>,
    settings: Arc<PowerShellSettings>,
    criteria: Arc<str>,
    machine: String,
}

impl<R: CommandRunner> PowerShellSession<R> {
    async fn run_script(
        &self,
        operation: &'static str,
        stage: Stage,
        script: &str,
        timeout: Duration,
    ) -> Result<Vec<u8>, UpdateError> {
        let encoded = scripts::encode_command(script);
        let args = [
            "-NoProfile",
            "-NonInteractive",
            "-ExecutionPolicy",
            "Bypass",
            "-EncodedCommand",
            encoded.as_str(),
        ];
        tracing::debug!(machine = %self.machine, operation, program = %self.settings.program, "running update agent script");

        let output = match self
            .runner
            .run_with_timeout(&self.settings.program, &args, timeout)
            .await
        {
            Ok(output) => output,
            Err(e) => {
                if let Some(t) = e.downcast_ref::<CommandTimeout>() {
                    return Err(UpdateError::Timeout {
                        machine: self.machine.clone(),
                        operation,
                        secs: t.secs,
                    });
                }
                tracing::warn!(machine = %self.machine, operation, error = %e, "update agent script did not run");
                return Err(stage.error(&self.machine, format!("{e:#}")));
            }
        };

        check_exit(&self.machine, stage, &output)?;
        Ok(output.stdout)
    }

    fn parse_json<T: DeserializeOwned>(&self, stage: Stage, stdout: &[u8]) -> Result<T, UpdateError> {
        serde_json::from_slice(trim_ascii(stdout))
            .map_err(|e| stage.error(&self.machine, format!("unexpected update agent output: {e}")))
    }
}

impl<R: CommandRunner> UpdateSession for PowerShellSession<R> {
    fn machine(&self) -> &str {
        &self.machine
    }

    async fn history_count(&self) -> Result<u32, UpdateError> {
        let stdout = self
            .run_script(
                "history count",
                Stage::Query,
                &scripts::history_count(&self.machine),
                self.settings.query_timeout,
            )
            .await?;
        let text = String::from_utf8_lossy(&stdout);
        text.trim().parse::<u32>().map_err(|_| {
            Stage::Query.error(
                &self.machine,
                format!("unexpected history count: {:?}", text.trim()),
            )
        })
    }

    async fn query_history(
        &self,
        start: u32,
        count: u32,
    ) -> Result<Vec<RawHistoryEntry>, UpdateError> {
        let stdout = self
            .run_script(
                "history query",
                Stage::Query,
                &scripts::query_history(&self.machine, start, count),
                self.settings.query_timeout,
            )
            .await?;
        self.parse_json(Stage::Query, &stdout)
    }

    async fn search_updates(&self, criteria: &str) -> Result<Vec<AvailableUpdate>, UpdateError> {
        let stdout = self
            .run_script(
                "update search",
                Stage::Query,
                &scripts::search(&self.machine, criteria),
                self.settings.query_timeout,
            )
            .await?;
        self.parse_json(Stage::Query, &stdout)
    }

    async fn fetch_updates(
        &self,
        ids: &[String],
        mode: FetchMode,
    ) -> Result<InstallationResult, UpdateError> {
        let stdout = self
            .run_script(
                "update fetch",
                Stage::Fetch,
                &scripts::fetch(&self.machine, &self.criteria, ids, mode),
                self.settings.install_timeout,
            )
            .await?;
        self.parse_json(Stage::Fetch, &stdout)
    }
}

/// Map a script's exit status onto the error taxonomy.
fn check_exit(machine: &str, stage: Stage, output: &Output) -> Result<(), UpdateError> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    let cause = match stderr.trim() {
        "" => match output.status.code() {
            Some(code) => format!("exit status {code}"),
            None => "terminated by signal".to_string(),
        },
        msg => msg.to_string(),
    };
    tracing::warn!(machine, cause = %cause, "update agent script failed");
    match output.status.code() {
        Some(scripts::EXIT_SESSION) => Err(Stage::Session.error(machine, cause)),
        _ => Err(stage.error(machine, cause)),
    }
}

/// PowerShell may prepend a BOM or trailing newlines.
fn trim_ascii(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    bytes.trim_ascii()
}
