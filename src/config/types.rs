//! Configuration types.
//!
//! Plain structs that describe one operation. They can be built
//! programmatically or converted from the CLI arguments in `cli`.
//! Every options struct has a `validate()` that is checked before any
//! connection is attempted.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    CONNECT_TIMEOUT, DB_PATH, DEFAULT_BATCH_SIZE, DEFAULT_EXTENSION, DEFAULT_FILE_PREFIX,
};
use crate::error_handling::ValidationError;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// How to reach the relational store.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// SQLite database file; created if missing
    pub db_path: PathBuf,
    /// Upper bound on connection establishment, retries included
    pub connect_timeout: Duration,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_PATH),
            connect_timeout: CONNECT_TIMEOUT,
        }
    }
}

impl ConnectionConfig {
    /// Checks the connection parameters.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.db_path.as_os_str().is_empty() {
            return Err(ValidationError::EmptyDatabasePath);
        }
        if self.connect_timeout.is_zero() {
            return Err(ValidationError::ZeroConnectTimeout);
        }
        Ok(())
    }
}

/// Options for importing a directory of JSON files.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Directory scanned (non-recursively) for input files
    pub directory: PathBuf,
    /// File extension filter, without the dot
    pub extension: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ImportOptions {
    /// Checks that the input directory exists and the filter is usable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.extension.trim().is_empty() {
            return Err(ValidationError::EmptyExtension);
        }
        if !self.directory.is_dir() {
            return Err(ValidationError::MissingDirectory(self.directory.clone()));
        }
        Ok(())
    }
}

/// Column names of the table that grouped exports read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportLayout {
    /// Source table
    pub table: String,
    /// Grouping key column (one nested `Entity` per distinct value)
    pub key_column: String,
    /// Column holding the dataset-wide community identifier
    pub community_column: String,
    /// Column mapped to `system`
    pub system_column: String,
    /// Column mapped to `type`
    pub type_column: String,
    /// Column mapped to `applicationId`
    pub application_column: String,
    /// Column mapped to the optional `correlationId`
    pub correlation_column: String,
    /// Secondary sort column within one group
    pub order_column: String,
}

impl Default for ExportLayout {
    fn default() -> Self {
        Self {
            table: "PostScript_AllianceMerge".to_string(),
            key_column: "EntityID".to_string(),
            community_column: "CommunityID".to_string(),
            system_column: "ApplicationID".to_string(),
            type_column: "EntityType".to_string(),
            application_column: "TargetID".to_string(),
            correlation_column: "SourceIDValue".to_string(),
            order_column: "ApplicationID".to_string(),
        }
    }
}

impl ExportLayout {
    /// Rejects empty table or column names.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let names = [
            &self.table,
            &self.key_column,
            &self.community_column,
            &self.system_column,
            &self.type_column,
            &self.application_column,
            &self.correlation_column,
            &self.order_column,
        ];
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(ValidationError::InvalidIdentifier);
        }
        Ok(())
    }
}

/// Options for the grouped, batched JSON export.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory the batch files are written into
    pub output_dir: PathBuf,
    /// File name prefix; batch `n` is written to `{prefix}{n}.{extension}`
    pub prefix: String,
    /// Extension of batch files, without the dot
    pub extension: String,
    /// Maximum number of groups per batch
    pub batch_size: usize,
    /// Source table and column mapping
    pub layout: ExportLayout,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            layout: ExportLayout::default(),
        }
    }
}

impl ExportOptions {
    /// Checks batch size, naming, output directory and layout.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.batch_size == 0 {
            return Err(ValidationError::ZeroBatchSize);
        }
        if self.prefix.trim().is_empty() {
            return Err(ValidationError::EmptyPrefix);
        }
        if self.extension.trim().is_empty() {
            return Err(ValidationError::EmptyExtension);
        }
        if !self.output_dir.is_dir() {
            return Err(ValidationError::MissingDirectory(self.output_dir.clone()));
        }
        self.layout.validate()
    }
}

/// Options for the fixed-column export (JSON array plus CSV companion).
#[derive(Debug, Clone)]
pub struct FlatExportOptions {
    /// Directory the two files are written into
    pub output_dir: PathBuf,
    /// Base name: `{prefix}.json` and `{prefix}.csv`
    pub prefix: String,
    /// Source table
    pub table: String,
}

impl Default for FlatExportOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            table: ExportLayout::default().table,
        }
    }
}

impl FlatExportOptions {
    /// Checks naming and output directory.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.prefix.trim().is_empty() {
            return Err(ValidationError::EmptyPrefix);
        }
        if self.table.trim().is_empty() {
            return Err(ValidationError::InvalidIdentifier);
        }
        if !self.output_dir.is_dir() {
            return Err(ValidationError::MissingDirectory(self.output_dir.clone()));
        }
        Ok(())
    }
}

/// Options for dumping a loaded table back to a JSON array.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Table to read
    pub table: String,
    /// Destination file
    pub output: PathBuf,
}

impl DumpOptions {
    /// Rejects an empty table name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.table.trim().is_empty() {
            return Err(ValidationError::InvalidIdentifier);
        }
        Ok(())
    }
}
