//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Update errors ─────────────────────────────────────────────────────────────

/// Errors raised while talking to the update agent of one machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpdateError {
    #[error("Invalid value for {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Cannot open an update session on '{machine}': {cause}")]
    SessionCreation { machine: String, cause: String },

    #[error("Update history query failed on '{machine}': {cause}")]
    Query { machine: String, cause: String },

    #[error("Update retrieval failed on '{machine}': {cause}")]
    Fetch { machine: String, cause: String },

    #[error("{operation} is not implemented by this update backend")]
    NotImplemented { operation: &'static str },

    #[error("{operation} on '{machine}' timed out after {secs}s")]
    Timeout {
        machine: String,
        operation: &'static str,
        secs: u64,
    },
}

impl UpdateError {
    /// Stable identifier used in JSON error objects.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::SessionCreation { .. } => "SESSION_CREATION",
            Self::Query { .. } => "QUERY",
            Self::Fetch { .. } => "FETCH",
            Self::NotImplemented { .. } => "NOT_IMPLEMENTED",
            Self::Timeout { .. } => "TIMEOUT",
        }
    }

    /// Machine the error is scoped to, when there is one.
    #[must_use]
    pub fn machine(&self) -> Option<&str> {
        match self {
            Self::SessionCreation { machine, .. }
            | Self::Query { machine, .. }
            | Self::Fetch { machine, .. }
            | Self::Timeout { machine, .. } => Some(machine),
            Self::InvalidParameter { .. } | Self::NotImplemented { .. } => None,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
