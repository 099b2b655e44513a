//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `json_table_bridge` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Forwarding operation events to the log
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use json_table_bridge::app::log_progress;
use json_table_bridge::config::{Cli, Command};
use json_table_bridge::initialization::init_logger_with;
use json_table_bridge::{
    spawn_dump, spawn_export, spawn_flat_export, spawn_import, OperationEvent, OperationHandle,
    ValidationError,
};

/// Exit code when an operation fails after it started.
const EXIT_OPERATION_FAILED: i32 = 1;
/// Exit code when options are rejected before anything runs.
const EXIT_INVALID_OPTIONS: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory, if any, supplies JSON_BRIDGE_DB_PATH
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    let connection = cli.connection_config();
    let outcome = match cli.command {
        Command::Import(args) => match spawn_import(connection, args.into()) {
            Ok(handle) => drive(handle).await.map(|summary| {
                println!(
                    "Imported {} of {} file(s) ({} failed, {} skipped)",
                    summary.successful, summary.total, summary.failed, summary.skipped
                );
            }),
            Err(e) => invalid(e),
        },
        Command::Export(args) => match spawn_export(connection, args.into()) {
            Ok(handle) => drive(handle).await.map(|summary| {
                println!(
                    "Exported {} entities in {} file(s)",
                    summary.entity_count, summary.file_count
                );
            }),
            Err(e) => invalid(e),
        },
        Command::ExportFlat(args) => match spawn_flat_export(connection, args.into()) {
            Ok(handle) => drive(handle).await.map(|summary| {
                println!(
                    "Exported {} rows to {} and {}",
                    summary.rows,
                    summary.json_path.display(),
                    summary.csv_path.display()
                );
            }),
            Err(e) => invalid(e),
        },
        Command::Dump(args) => match spawn_dump(connection, args.into()) {
            Ok(handle) => drive(handle).await.map(|rows| {
                println!("Dumped {} rows", rows);
            }),
            Err(e) => invalid(e),
        },
    };

    if let Err(e) = outcome {
        eprintln!("json_table_bridge error: {:#}", e);
        process::exit(EXIT_OPERATION_FAILED);
    }
    Ok(())
}

/// Logs every event of a running operation and returns its result.
async fn drive<T>(handle: OperationHandle<T>) -> Result<T> {
    let start = Instant::now();
    handle
        .join_with(|event| match event {
            OperationEvent::Status(line) => info!("{}", line),
            OperationEvent::Progress { current, total } => log_progress(start, current, total),
        })
        .await
}

fn invalid(e: ValidationError) -> Result<()> {
    eprintln!("json_table_bridge: invalid options: {}", e);
    process::exit(EXIT_INVALID_OPTIONS);
}
