//! Application services — one module per use-case.

pub mod batch;
pub mod config_service;
pub mod history;
pub mod receive;

pub use batch::{BatchReport, MachineOutcome};
pub use receive::{ReceiveOutcome, ReceiveRequest};
