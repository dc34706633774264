//! Batch statistics tracking.
//!
//! Thread-safe counters for the outcome of each domain in a batch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::CheckOutcome;

/// Thread-safe per-outcome counters.
///
/// All outcomes are initialized to zero on creation, so the map never needs
/// to grow after construction and can be shared behind an `Arc`.
pub struct CheckStats {
    outcomes: HashMap<CheckOutcome, AtomicUsize>,
}

impl CheckStats {
    /// Creates statistics with every counter at zero.
    pub fn new() -> Self {
        let outcomes = CheckOutcome::iter()
            .map(|outcome| (outcome, AtomicUsize::new(0)))
            .collect();
        CheckStats { outcomes }
    }

    /// Increment the counter for an outcome.
    pub fn record(&self, outcome: CheckOutcome) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to record outcome {:?} which is not in the map. \
                 This indicates a bug in CheckStats initialization.",
                outcome
            );
        }
    }

    /// Get the count for an outcome.
    pub fn count(&self, outcome: CheckOutcome) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Domains that reached a verdict.
    pub fn total_verdicts(&self) -> usize {
        self.count(CheckOutcome::Vulnerable) + self.count(CheckOutcome::NotVulnerable)
    }

    /// Domains that ended without a verdict.
    pub fn total_failures(&self) -> usize {
        self.count(CheckOutcome::InvalidInput) + self.count(CheckOutcome::DeadlineExceeded)
    }
}

impl Default for CheckStats {
    fn default() -> Self {
        Self::new()
    }
}
