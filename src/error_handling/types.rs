//! Error type definitions.
//!
//! This module defines all error types used throughout the application, plus
//! the failure categories tallied during a directory import.

use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for establishing the storage connection.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// The connection was not established within the configured timeout.
    #[error("Timed out after {0:?} connecting to database")]
    ConnectTimeout(std::time::Duration),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),
}

/// Invalid operation parameters, detected before any connection is made.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// No database path was given.
    #[error("Database path is required")]
    EmptyDatabasePath,

    /// Connection timeout of zero.
    #[error("Connection timeout must be greater than zero")]
    ZeroConnectTimeout,

    /// Batch size of zero.
    #[error("Batch size must be at least 1")]
    ZeroBatchSize,

    /// Blank export file prefix.
    #[error("File prefix is required")]
    EmptyPrefix,

    /// Blank file extension.
    #[error("File extension is required")]
    EmptyExtension,

    /// Input or output directory does not exist.
    #[error("Directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Blank table or column name.
    #[error("Table and column names must not be empty")]
    InvalidIdentifier,
}

/// Failure to load one file into its table.
///
/// Every variant is recoverable at directory granularity: the importer
/// records the file as failed and moves on.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Unable to read {}: {source}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The file is not well-formed JSON.
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Well-formed JSON that is neither an object nor an array of objects.
    #[error("Unsupported document shape: {0}")]
    UnsupportedShape(String),

    /// An integer field does not fit the signed 64-bit storage integer.
    #[error("Integer {value} in column {column} is outside the 64-bit signed range")]
    IntegerOutOfRange {
        /// Column holding the value
        column: String,
        /// The offending value
        value: i128,
    },

    /// DDL or DML failed; the transaction was rolled back.
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Failure of a grouped or flat export.
///
/// Any of these aborts the export; batch files already written stay on disk.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Reading from storage failed.
    #[error("Storage read failed: {0}")]
    Storage(#[from] sqlx::Error),

    /// Writing an output file failed.
    #[error("Unable to write {}: {source}", path.display())]
    Io {
        /// File being written
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// Serializing a document failed.
    #[error("Serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Writing a CSV record failed.
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// The export table spans more than one community identifier.
    #[error("Export table mixes community identifiers ({first} and {second}); export one community at a time")]
    MixedCommunity {
        /// First identifier found
        first: String,
        /// Second identifier found
        second: String,
    },
}

/// Categories of per-file import failures.
///
/// Tallied across a directory import and reported with the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    /// File could not be read
    UnreadableFile,
    /// Malformed JSON
    InvalidJson,
    /// JSON that is not an object or array of objects
    UnsupportedShape,
    /// Integer too large for storage
    IntegerOutOfRange,
    /// DDL/DML failure, rolled back
    Storage,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureKind {
    /// Human-readable label.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::UnreadableFile => "Unreadable file",
            FailureKind::InvalidJson => "Invalid JSON",
            FailureKind::UnsupportedShape => "Unsupported document shape",
            FailureKind::IntegerOutOfRange => "Integer out of range",
            FailureKind::Storage => "Storage error",
        }
    }
}

impl From<&LoadError> for FailureKind {
    fn from(err: &LoadError) -> Self {
        match err {
            LoadError::Read { .. } => FailureKind::UnreadableFile,
            LoadError::InvalidJson(_) => FailureKind::InvalidJson,
            LoadError::UnsupportedShape(_) => FailureKind::UnsupportedShape,
            LoadError::IntegerOutOfRange { .. } => FailureKind::IntegerOutOfRange,
            LoadError::Storage(_) => FailureKind::Storage,
        }
    }
}
