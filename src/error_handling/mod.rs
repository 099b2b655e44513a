//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions for each operation stage
//! - Failure categorization and statistics for directory imports
//! - Retry strategy for connection establishment
//!
//! Per-file and per-batch errors are converted into outcome values where they
//! occur; only validation and connection errors fail a whole operation before
//! any unit of work starts.

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{get_retry_strategy, is_transient_sqlite_error};
pub use stats::ProcessingStats;
pub use types::{
    DatabaseError, ExportError, FailureKind, InitializationError, LoadError, ValidationError,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for kind in FailureKind::iter() {
            assert_eq!(stats.get_failure_count(kind), 0);
        }
    }

    #[test]
    fn test_processing_stats_increment() {
        let stats = ProcessingStats::new();
        stats.increment_failure(FailureKind::InvalidJson);
        stats.increment_failure(FailureKind::InvalidJson);
        stats.increment_failure(FailureKind::Storage);
        assert_eq!(stats.get_failure_count(FailureKind::InvalidJson), 2);
        assert_eq!(stats.get_failure_count(FailureKind::Storage), 1);
        assert_eq!(stats.total_failures(), 3);
    }

    #[test]
    fn test_failure_kind_from_load_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = LoadError::InvalidJson(parse_err);
        assert_eq!(FailureKind::from(&err), FailureKind::InvalidJson);

        let err = LoadError::UnsupportedShape("number".to_string());
        assert_eq!(FailureKind::from(&err), FailureKind::UnsupportedShape);

        let err = LoadError::IntegerOutOfRange {
            column: "big".to_string(),
            value: i128::from(u64::MAX),
        };
        assert_eq!(FailureKind::from(&err), FailureKind::IntegerOutOfRange);

        let err = LoadError::Storage(sqlx::Error::RowNotFound);
        assert_eq!(FailureKind::from(&err), FailureKind::Storage);
    }

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::ZeroBatchSize.to_string(),
            "Batch size must be at least 1"
        );
        let err = ValidationError::MissingDirectory(std::path::PathBuf::from("/nope"));
        assert_eq!(err.to_string(), "Directory does not exist: /nope");
    }
}
