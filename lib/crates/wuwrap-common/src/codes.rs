use serde::{Deserialize, Serialize};

/// Fallback display name for operation codes outside [`OperationCode`].
pub const UNKNOWN_OPERATION: &str = "N/A";

/// Fallback display name for result codes outside [`OperationResultCode`].
pub const UNKNOWN_STATUS: &str = "No Status";

/// Kind of operation recorded in an update history entry.
///
/// The Windows Update Agent numbers these from 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[repr(i32)]
pub enum OperationCode {
    Installed = 1,
    Uninstalled = 2,
}

impl OperationCode {
    /// Map a raw agent code onto the closed enumeration.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Installed),
            2 => Some(Self::Uninstalled),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Installed => "Installed",
            Self::Uninstalled => "Uninstalled",
        }
    }
}

impl std::fmt::Display for OperationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an update operation, numbered from 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[repr(i32)]
pub enum OperationResultCode {
    NotStarted = 0,
    InProgress = 1,
    Succeeded = 2,
    SucceededWithErrors = 3,
    Failed = 4,
    Aborted = 5,
}

impl OperationResultCode {
    /// Map a raw agent code onto the closed enumeration.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::NotStarted),
            1 => Some(Self::InProgress),
            2 => Some(Self::Succeeded),
            3 => Some(Self::SucceededWithErrors),
            4 => Some(Self::Failed),
            5 => Some(Self::Aborted),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::InProgress => "InProgress",
            Self::Succeeded => "Succeeded",
            Self::SucceededWithErrors => "SucceededWithErrors",
            Self::Failed => "Failed",
            Self::Aborted => "Aborted",
        }
    }

    /// `true` for `Succeeded` and `SucceededWithErrors`.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Succeeded | Self::SucceededWithErrors)
    }
}

impl std::fmt::Display for OperationResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display name for a raw operation code, `"N/A"` when unmapped.
#[must_use]
pub fn operation_name(code: i32) -> &'static str {
    OperationCode::from_code(code).map_or(UNKNOWN_OPERATION, OperationCode::as_str)
}

/// Display name for a raw result code, `"No Status"` when unmapped.
#[must_use]
pub fn status_name(code: i32) -> &'static str {
    OperationResultCode::from_code(code).map_or(UNKNOWN_STATUS, OperationResultCode::as_str)
}
