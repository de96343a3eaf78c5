//! Domain types and validators for wuwrap configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "powershell.program",
    "timeouts.query_secs",
    "timeouts.install_secs",
    "search.criteria",
];

/// Search criteria for updates that are offered but not yet installed.
pub const DEFAULT_SEARCH_CRITERIA: &str = "IsInstalled=0 and IsHidden=0";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.wuwrap/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WuwrapConfig {
    pub powershell: PowerShellConfig,
    pub timeouts: TimeoutConfig,
    pub search: SearchConfig,
}

/// PowerShell host used to reach the update agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PowerShellConfig {
    /// Executable name or path.
    pub program: String,
}

impl Default for PowerShellConfig {
    fn default() -> Self {
        let program = if cfg!(windows) { "powershell.exe" } else { "pwsh" };
        Self {
            program: program.to_string(),
        }
    }
}

/// Per-call timeouts, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Session, history and search calls.
    pub query_secs: u64,
    /// Download and install calls.
    pub install_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            query_secs: 120,
            install_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SearchConfig {
    /// Agent search criteria for `receive` and `search`.
    pub criteria: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            criteria: DEFAULT_SEARCH_CRITERIA.to_string(),
        }
    }
}

impl WuwrapConfig {
    /// Current value of a dotted key, as displayed by `config show`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "powershell.program" => Some(self.powershell.program.clone()),
            "timeouts.query_secs" => Some(self.timeouts.query_secs.to_string()),
            "timeouts.install_secs" => Some(self.timeouts.install_secs.to_string()),
            "search.criteria" => Some(self.search.criteria.clone()),
            _ => None,
        }
    }

    /// Apply a validated key/value pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        match key {
            "powershell.program" => self.powershell.program = value.to_string(),
            "timeouts.query_secs" => self.timeouts.query_secs = parse_secs(key, value)?,
            "timeouts.install_secs" => self.timeouts.install_secs = parse_secs(key, value)?,
            "search.criteria" => self.search.criteria = value.to_string(),
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key {
        "timeouts.query_secs" | "timeouts.install_secs" => {
            parse_secs(key, value)?;
        }
        _ if value.trim().is_empty() => {
            return Err(invalid(key, value, "a non-empty string"));
        }
        _ => {}
    }
    Ok(())
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(invalid(key, value, "a positive number of seconds")),
    }
}

fn invalid(key: &str, value: &str, expected: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .into()
}

// ── Unit tests ───────────────────────────────────────────────────────────────
