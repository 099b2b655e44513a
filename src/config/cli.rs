//! Command-line interface.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use super::constants::{DB_PATH, DB_PATH_ENV, DEFAULT_BATCH_SIZE, DEFAULT_EXTENSION, DEFAULT_FILE_PREFIX};
use super::types::{
    ConnectionConfig, DumpOptions, ExportLayout, ExportOptions, FlatExportOptions, ImportOptions,
    LogFormat, LogLevel,
};

/// Loads directories of JSON files into SQLite tables and exports them back
/// as grouped, batched JSON documents.
#[derive(Debug, Parser)]
#[command(name = "json_table_bridge", version, about)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = DB_PATH_ENV, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Upper bound on connecting to the database, in seconds
    #[arg(long, global = true, default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Log level: error, warn, info, debug, or trace
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain or json
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Operation to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Connection settings from the global flags.
    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            db_path: self.db_path.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
        }
    }
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import every JSON file of a directory into a table named after the file
    Import(ImportArgs),
    /// Export grouped rows as numbered batch files
    Export(ExportArgs),
    /// Export the merge table as one JSON array plus a CSV file
    #[command(name = "export-flat")]
    ExportFlat(FlatExportArgs),
    /// Write a whole table to a JSON array file
    Dump(DumpArgs),
}

/// Arguments of `import`.
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Directory holding the input files
    pub directory: PathBuf,

    /// Extension of input files
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,
}

impl From<ImportArgs> for ImportOptions {
    fn from(args: ImportArgs) -> Self {
        ImportOptions {
            directory: args.directory,
            extension: args.extension,
        }
    }
}

/// Arguments of `export`.
#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Directory the batch files are written into
    pub output_dir: PathBuf,

    /// File name prefix; batch n is written to `{prefix}{n}.{extension}`
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    pub prefix: String,

    /// Maximum number of entities per file
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,

    /// Extension of batch files
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Source table
    #[arg(long)]
    pub table: Option<String>,

    /// Grouping key column
    #[arg(long)]
    pub key_column: Option<String>,

    /// Community identifier column
    #[arg(long)]
    pub community_column: Option<String>,

    /// Column mapped to `system`
    #[arg(long)]
    pub system_column: Option<String>,

    /// Column mapped to `type`
    #[arg(long)]
    pub type_column: Option<String>,

    /// Column mapped to `applicationId`
    #[arg(long)]
    pub application_column: Option<String>,

    /// Column mapped to `correlationId`
    #[arg(long)]
    pub correlation_column: Option<String>,

    /// Sort column within one entity
    #[arg(long)]
    pub order_column: Option<String>,
}

impl From<ExportArgs> for ExportOptions {
    fn from(args: ExportArgs) -> Self {
        let defaults = ExportLayout::default();
        let layout = ExportLayout {
            table: args.table.unwrap_or(defaults.table),
            key_column: args.key_column.unwrap_or(defaults.key_column),
            community_column: args.community_column.unwrap_or(defaults.community_column),
            system_column: args.system_column.unwrap_or(defaults.system_column),
            type_column: args.type_column.unwrap_or(defaults.type_column),
            application_column: args.application_column.unwrap_or(defaults.application_column),
            correlation_column: args.correlation_column.unwrap_or(defaults.correlation_column),
            order_column: args.order_column.unwrap_or(defaults.order_column),
        };
        ExportOptions {
            output_dir: args.output_dir,
            prefix: args.prefix,
            extension: args.extension,
            batch_size: args.batch_size,
            layout,
        }
    }
}

/// Arguments of `export-flat`.
#[derive(Debug, Args)]
pub struct FlatExportArgs {
    /// Directory the two files are written into
    pub output_dir: PathBuf,

    /// Base file name of the JSON and CSV files
    #[arg(long, default_value = DEFAULT_FILE_PREFIX)]
    pub prefix: String,

    /// Source table
    #[arg(long)]
    pub table: Option<String>,
}

impl From<FlatExportArgs> for FlatExportOptions {
    fn from(args: FlatExportArgs) -> Self {
        let defaults = FlatExportOptions::default();
        FlatExportOptions {
            output_dir: args.output_dir,
            prefix: args.prefix,
            table: args.table.unwrap_or(defaults.table),
        }
    }
}

/// Arguments of `dump`.
#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Table to dump
    pub table: String,

    /// Destination file
    #[arg(long, short)]
    pub output: PathBuf,
}

impl From<DumpArgs> for DumpOptions {
    fn from(args: DumpArgs) -> Self {
        DumpOptions {
            table: args.table,
            output: args.output,
        }
    }
}
