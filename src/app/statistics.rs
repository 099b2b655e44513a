//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{FailureKind, ProcessingStats};

/// Prints per-category import failure counts to the log.
///
/// Nothing is printed when no file failed.
pub fn print_failure_statistics(stats: &ProcessingStats) {
    let total = stats.total_failures();
    if total == 0 {
        return;
    }

    info!("Failure Counts ({} total):", total);
    for kind in FailureKind::iter() {
        let count = stats.get_failure_count(kind);
        if count > 0 {
            info!("   {}: {}", kind.as_str(), count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_failure_statistics_no_failures() {
        let stats = ProcessingStats::new();
        // Should not panic when there are no failures
        print_failure_statistics(&stats);
    }

    #[test]
    fn test_print_failure_statistics_with_failures() {
        let stats = ProcessingStats::new();
        stats.increment_failure(FailureKind::InvalidJson);
        stats.increment_failure(FailureKind::InvalidJson);
        stats.increment_failure(FailureKind::Storage);
        print_failure_statistics(&stats);
        assert_eq!(stats.total_failures(), 3);
    }
}
