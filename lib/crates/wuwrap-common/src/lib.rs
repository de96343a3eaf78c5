pub mod codes;
pub mod history;
pub mod install;

pub use codes::{OperationCode, OperationResultCode, operation_name, status_name};
pub use history::{RawHistoryEntry, UpdateHistoryRecord, extract_kb, format_date, normalize};
pub use install::{AvailableUpdate, FetchMode, InstallationResult, UpdateInstallResult};
