//! Update history entries and their normalization into display records.
//!
//! Everything here is pure: no I/O, no shared state. [`normalize`] is total
//! and deterministic, so the same raw entry always yields the same record.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codes::{operation_name, status_name};

/// KB article pattern matched against update titles.
///
/// `K`, an optional `B`, then digits. This also matches `K123`; kept as-is
/// for output compatibility with earlier releases.
pub static KB_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"KB?\d+").expect("valid regex")
});

/// Locale-independent timestamp layout used for the `date` field.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// One history entry as reported by the update agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawHistoryEntry {
    pub title: String,
    pub operation: i32,
    pub result: i32,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub date: DateTime<Utc>,
}

/// COM hands back `null` for entries without a description.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Display-ready history record.
///
/// Built once by [`normalize`]; fields are read through accessors only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateHistoryRecord {
    name: String,
    operation_code: i32,
    status_code: i32,
    description: String,
    kb: String,
    date: String,
}

impl UpdateHistoryRecord {
    /// Update title as reported by the agent.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn operation_code(&self) -> i32 {
        self.operation_code
    }

    #[must_use]
    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// KB identifier extracted from the title, empty when absent.
    #[must_use]
    pub fn kb(&self) -> &str {
        &self.kb
    }

    /// Formatted timestamp of the historical event.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// `"Installed"`, `"Uninstalled"` or `"N/A"`.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        operation_name(self.operation_code)
    }

    /// Result name from `OperationResultCode`, or `"No Status"`.
    #[must_use]
    pub fn status(&self) -> &'static str {
        status_name(self.status_code)
    }
}

impl Serialize for UpdateHistoryRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut st = serializer.serialize_struct("UpdateHistoryRecord", 8)?;
        st.serialize_field("name", &self.name)?;
        st.serialize_field("operation", self.operation())?;
        st.serialize_field("operation_code", &self.operation_code)?;
        st.serialize_field("status", self.status())?;
        st.serialize_field("status_code", &self.status_code)?;
        st.serialize_field("description", &self.description)?;
        st.serialize_field("kb", &self.kb)?;
        st.serialize_field("date", &self.date)?;
        st.end()
    }
}

/// First KB-style identifier in `title`, or an empty string.
#[must_use]
pub fn extract_kb(title: &str) -> String {
    KB_RE
        .find(title)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Normalize one raw history entry into a display record.
#[must_use]
pub fn normalize(entry: &RawHistoryEntry) -> UpdateHistoryRecord {
    UpdateHistoryRecord {
        name: entry.title.clone(),
        operation_code: entry.operation,
        status_code: entry.result,
        description: entry.description.clone(),
        kb: extract_kb(&entry.title),
        date: format_date(&entry.date),
    }
}
