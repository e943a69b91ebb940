//! Sending domain reads.

use mailforge_shared::{DeliverabilitySnapshot, Domain};

use crate::repository::Repository;

impl Repository {
    pub fn domains(&self) -> Vec<Domain> {
        self.cache().domains.clone()
    }

    /// Deliverability summary for the settings dashboard.  The simulation
    /// has no real sending pipeline, so the figures are fixed.
    pub fn deliverability(&self) -> DeliverabilitySnapshot {
        DeliverabilitySnapshot {
            reputation: 94.0,
            inbox_placement: 98.5,
        }
    }
}
