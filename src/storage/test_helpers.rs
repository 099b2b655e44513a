//! Shared test helpers for storage-backed unit tests.

#[cfg(test)]
use sqlx::{Connection, SqliteConnection};

/// Opens an in-memory database connection for fast test execution.
#[cfg(test)]
pub async fn create_test_connection() -> SqliteConnection {
    SqliteConnection::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory test database")
}
