//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod machine;
pub mod selection;

pub use config::{WuwrapConfig, validate_config_key, validate_config_value};
pub use error::{ConfigError, UpdateError};
pub use machine::{requested_targets, resolve_computer_name, validate_update_name};
pub use selection::{matches_update, select_updates};
