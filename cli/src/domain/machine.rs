//! Machine-name resolution for update sessions.
//!
//! Pure functions only. The local machine name is passed in by the caller.

use crate::domain::error::UpdateError;

/// Resolve a user-supplied computer name.
///
/// An empty name means the local machine; anything else passes through
/// unchanged.
///
/// # Errors
///
/// Returns `UpdateError::InvalidParameter` if the name contains control
/// characters, which no update agent accepts as a host name.
pub fn resolve_computer_name(raw: &str, local: &str) -> Result<String, UpdateError> {
    if raw.is_empty() {
        return Ok(local.to_string());
    }
    validate_text("ComputerName", raw)?;
    Ok(raw.to_string())
}

/// Validate an update-name filter.
///
/// # Errors
///
/// Returns `UpdateError::InvalidParameter` if the value contains control
/// characters.
pub fn validate_update_name(raw: &str) -> Result<(), UpdateError> {
    validate_text("UpdateName", raw)
}

/// Expand the requested targets: no names at all means the local machine.
#[must_use]
pub fn requested_targets(names: &[String]) -> Vec<String> {
    if names.is_empty() {
        vec![String::new()]
    } else {
        names.to_vec()
    }
}

fn validate_text(name: &'static str, value: &str) -> Result<(), UpdateError> {
    if let Some(c) = value.chars().find(|c| c.is_control()) {
        return Err(UpdateError::InvalidParameter {
            name,
            reason: format!("contains control character {c:?}"),
        });
    }
    Ok(())
}
