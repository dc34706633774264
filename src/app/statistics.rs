//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{CheckOutcome, CheckStats};

/// Prints per-outcome counts and a one-line summary to the log.
pub fn print_check_statistics(stats: &CheckStats, elapsed_seconds: f64) {
    let verdicts = stats.total_verdicts();
    let failures = stats.total_failures();

    info!("Outcome Counts ({} total):", verdicts + failures);
    for outcome in CheckOutcome::iter() {
        let count = stats.count(outcome);
        if count > 0 {
            info!("   {}: {}", outcome.label(), count);
        }
    }

    info!(
        "Checked {} domain{} ({} vulnerable, {} failed) in {:.1}s",
        verdicts + failures,
        if verdicts + failures == 1 { "" } else { "s" },
        stats.count(CheckOutcome::Vulnerable),
        failures,
        elapsed_seconds
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_check_statistics_empty() {
        let stats = CheckStats::new();
        // Should not panic with nothing recorded
        print_check_statistics(&stats, 0.0);
    }

    #[test]
    fn test_print_check_statistics_mixed() {
        let stats = CheckStats::new();
        stats.record(CheckOutcome::Vulnerable);
        stats.record(CheckOutcome::NotVulnerable);
        stats.record(CheckOutcome::InvalidInput);
        print_check_statistics(&stats, 1.5);
    }
}
