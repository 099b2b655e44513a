//! Database connection management.
//!
//! Every operation owns exactly one SQLite connection:
//! - WAL mode enabled
//! - busy timeout for lock contention
//! - automatic database file creation
//! - bounded establishment time with retry on transient lock errors

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, error, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::{ConnectOptions, SqliteConnection};
use tokio_retry::RetryIf;

use crate::config::{ConnectionConfig, BUSY_TIMEOUT};
use crate::error_handling::{get_retry_strategy, is_transient_sqlite_error, DatabaseError};

fn ensure_database_file(db_path: &Path) -> Result<(), DatabaseError> {
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(db_path)
    {
        Ok(_) => info!("Database file {} created.", db_path.display()),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Database file {} already exists.", db_path.display())
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(DatabaseError::FileCreationError(e.to_string()));
        }
    }
    Ok(())
}

/// Opens the single connection used by one import or export.
///
/// Creates the database file if it doesn't exist. Attempts that fail with
/// `SQLITE_BUSY`/`SQLITE_LOCKED` are retried with exponential backoff; the
/// whole establishment, retries included, is bounded by
/// `config.connect_timeout`.
///
/// # Errors
///
/// - `DatabaseError::FileCreationError` if the file cannot be created
/// - `DatabaseError::ConnectTimeout` if the timeout elapses
/// - `DatabaseError::SqlError` for any other connection failure
pub async fn open_connection(config: &ConnectionConfig) -> Result<SqliteConnection, DatabaseError> {
    ensure_database_file(&config.db_path)?;

    let options = SqliteConnectOptions::new()
        .filename(&config.db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);

    let attempt = RetryIf::spawn(
        get_retry_strategy(),
        || {
            let options = options.clone();
            async move { options.connect().await }
        },
        is_transient_sqlite_error,
    );

    match tokio::time::timeout(config.connect_timeout, attempt).await {
        Ok(Ok(conn)) => {
            info!("Database connection established");
            Ok(conn)
        }
        Ok(Err(e)) => {
            error!("Failed to connect to database: {e}");
            Err(DatabaseError::SqlError(e))
        }
        Err(_) => {
            error!(
                "Timed out after {:?} connecting to {}",
                config.connect_timeout,
                config.db_path.display()
            );
            Err(DatabaseError::ConnectTimeout(config.connect_timeout))
        }
    }
}
