//! Per-machine outcomes of a multi-machine run.

use crate::domain::error::UpdateError;

/// What happened on one requested machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineOutcome {
    /// Resolved machine name, or the raw argument if it failed to resolve.
    pub machine: String,
    /// Records or updates delivered for this machine.
    pub items: usize,
    pub error: Option<UpdateError>,
}

/// Outcomes in input order. A failure never stops later machines.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub outcomes: Vec<MachineOutcome>,
}

impl BatchReport {
    pub(crate) fn succeeded(&mut self, machine: String, items: usize) {
        self.outcomes.push(MachineOutcome {
            machine,
            items,
            error: None,
        });
    }

    pub(crate) fn failed(&mut self, machine: String, items: usize, error: UpdateError) {
        self.outcomes.push(MachineOutcome {
            machine,
            items,
            error: Some(error),
        });
    }

    /// Outcomes that carry an error.
    pub fn failures(&self) -> impl Iterator<Item = &MachineOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some())
    }

    /// `true` when every machine succeeded.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Total items delivered across machines, failed ones included.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.outcomes.iter().map(|o| o.items).sum()
    }
}
