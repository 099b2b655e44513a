//! JSON file → table loading.
//!
//! - [`BulkLoader`]: one transaction per file (drop, create, bulk insert)
//! - [`import_directory`]: drives the loader over a directory and summarizes

mod directory;
mod loader;
mod types;

pub use directory::{import_directory, list_input_files};
pub use loader::{normalize_document, table_name_for, BulkLoader};
pub use types::{FileOutcome, ImportSummary, LoadOutcome};
