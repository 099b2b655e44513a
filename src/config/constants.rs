//! Configuration constants.
//!
//! Defaults and hard limits shared by the import and export paths.

use std::time::Duration;

/// Default SQLite database file
pub const DB_PATH: &str = "./json_table_bridge.db";

/// Environment variable that overrides the database path
pub const DB_PATH_ENV: &str = "JSON_BRIDGE_DB_PATH";

/// Time allowed for establishing the storage connection
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long SQLite waits on a locked database before returning `SQLITE_BUSY`
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// File extension of importable documents and of exported batches
pub const DEFAULT_EXTENSION: &str = "json";

/// Number of groups written to each export batch
pub const DEFAULT_BATCH_SIZE: usize = 2500;

/// Default prefix for exported batch files (`Export1.json`, `Export2.json`, ...)
pub const DEFAULT_FILE_PREFIX: &str = "Export";

// Type inference thresholds
/// Longest string (in characters) that still fits a `VARCHAR(255)` column
pub const VARCHAR_MAX_CHARS: usize = 255;
/// Integer magnitude at which a column is promoted from `INT` to `BIGINT`
pub const INT_RANGE_LIMIT: u128 = 1 << 31;

/// Name of the identity column prepended to every created table
pub const ID_COLUMN: &str = "id";

/// SQLite's default upper bound on bound parameters per statement
/// (`SQLITE_MAX_VARIABLE_NUMBER` since 3.32)
pub const MAX_BIND_PARAMS: usize = 32766;

// Connection retry strategy
/// Initial delay in milliseconds before retrying a busy connection attempt
pub const RETRY_INITIAL_DELAY_MS: u64 = 100;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 2;
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_ATTEMPTS: usize = 3;

/// Indentation of exported JSON documents
pub const JSON_INDENT: &[u8] = b" ";

/// UTF-8 byte order mark written at the start of CSV exports
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
