//! Available updates and download/installation outcomes.

use serde::{Deserialize, Serialize};

use crate::codes::{OperationResultCode, status_name};

/// An update offered by the agent's search, not yet installed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AvailableUpdate {
    /// Agent `UpdateID` (a GUID string).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Bare article numbers as the agent reports them, e.g. `"5035845"`.
    #[serde(default)]
    pub kb_article_ids: Vec<String>,
    #[serde(default)]
    pub is_downloaded: bool,
}

/// What to do with the selected updates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Download, then install.
    #[default]
    Install,
    /// Download into the agent cache and stop.
    DownloadOnly,
}

/// Per-update outcome inside an [`InstallationResult`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateInstallResult {
    pub id: String,
    pub title: String,
    pub result_code: i32,
    #[serde(default)]
    pub hresult: i32,
}

impl UpdateInstallResult {
    #[must_use]
    pub fn status(&self) -> &'static str {
        status_name(self.result_code)
    }
}

/// Aggregate outcome of a download or install run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct InstallationResult {
    pub mode: FetchMode,
    pub result_code: i32,
    #[serde(default)]
    pub reboot_required: bool,
    #[serde(default)]
    pub hresult: i32,
    #[serde(default)]
    pub updates: Vec<UpdateInstallResult>,
}

impl InstallationResult {
    /// Result for a run where nothing matched; no agent call was made.
    #[must_use]
    pub fn empty(mode: FetchMode) -> Self {
        Self {
            mode,
            result_code: OperationResultCode::NotStarted as i32,
            reboot_required: false,
            hresult: 0,
            updates: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> &'static str {
        status_name(self.result_code)
    }

    /// `Succeeded` or `SucceededWithErrors`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        OperationResultCode::from_code(self.result_code).is_some_and(OperationResultCode::is_success)
    }
}
