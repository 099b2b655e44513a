//! json_table_bridge library: JSON files to SQLite tables and back
//!
//! Importing scans a directory for JSON files, infers one column type per
//! field across all records of a file, and replaces the table named after the
//! file inside a single transaction. Exporting reads a grouped table back and
//! writes it as numbered batch documents, as a flat JSON array with a CSV
//! companion, or as a raw dump that can be imported again.
//!
//! # Example
//!
//! ```no_run
//! use json_table_bridge::{spawn_import, ConnectionConfig, ImportOptions, OperationEvent};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let options = ImportOptions {
//!     directory: std::path::PathBuf::from("./data"),
//!     ..Default::default()
//! };
//!
//! let handle = spawn_import(ConnectionConfig::default(), options)?;
//! let summary = handle
//!     .join_with(|event| {
//!         if let OperationEvent::Status(line) = event {
//!             println!("{line}");
//!         }
//!     })
//!     .await?;
//! println!("{} of {} files imported", summary.successful, summary.total);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod app;
pub mod config;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod load;
pub mod schema;
pub mod storage;

// Re-export public API
pub use app::{
    spawn_dump, spawn_export, spawn_flat_export, spawn_import, EventSink, LogSink,
    OperationEvent, OperationHandle,
};
pub use config::{
    ConnectionConfig, DumpOptions, ExportLayout, ExportOptions, FlatExportOptions, ImportOptions,
    LogFormat, LogLevel,
};
pub use error_handling::{DatabaseError, ExportError, LoadError, ValidationError};
pub use export::{ExportDriver, ExportSummary, FlatExportSummary};
pub use load::{BulkLoader, FileOutcome, ImportSummary, LoadOutcome};
pub use schema::{build_schema, infer_column_type, FieldValue, Record, Schema, TypeTag};
