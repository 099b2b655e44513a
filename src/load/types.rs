//! Load outcomes and import summary.

use crate::error_handling::FailureKind;

/// Result of loading one record sequence into a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The table was replaced and all rows committed.
    Created {
        /// Target table
        table: String,
        /// Inferred column names in schema order (without `id`)
        columns: Vec<String>,
        /// Number of rows inserted
        rows: usize,
    },
    /// Nothing to load; no table was touched.
    Skipped {
        /// Why the unit was skipped
        reason: String,
    },
}

/// Result of importing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Table replaced and committed.
    Success(String),
    /// Empty document; counted apart from both successes and failures.
    Skipped(String),
    /// Read, parse or storage failure; the transaction was rolled back.
    Failure {
        /// Status line describing the failure
        message: String,
        /// Failure category
        kind: FailureKind,
    },
}

impl FileOutcome {
    /// The status line carried by any outcome.
    pub fn message(&self) -> &str {
        match self {
            FileOutcome::Success(m) | FileOutcome::Skipped(m) => m,
            FileOutcome::Failure { message, .. } => message,
        }
    }
}

/// Totals of a directory import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Files matched by the extension filter
    pub total: usize,
    /// Files loaded and committed
    pub successful: usize,
    /// Files that failed
    pub failed: usize,
    /// Empty files
    pub skipped: usize,
    /// Names of loaded files
    pub success_files: Vec<String>,
    /// Names of failed files
    pub failed_files: Vec<String>,
    /// Names of skipped files
    pub skipped_files: Vec<String>,
}
