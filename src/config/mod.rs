//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, defaults)
//! - Per-operation option types with validation
//! - Log level and format enums shared with the CLI
//! - The `clap` command-line definition

mod cli;
mod constants;
mod types;

pub use cli::{Cli, Command, DumpArgs, ExportArgs, FlatExportArgs, ImportArgs};
// Re-export all constants
pub use constants::*;
pub use types::{
    ConnectionConfig, DumpOptions, ExportLayout, ExportOptions, FlatExportOptions, ImportOptions,
    LogFormat, LogLevel,
};
