//! Error categorization and connection retry strategy.

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

/// Creates the retry strategy for connection establishment.
///
/// # Returns
///
/// A retry strategy iterator ready for use with `tokio_retry::RetryIf`.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(crate::config::RETRY_MAX_ATTEMPTS)
}

/// Returns `true` for errors worth retrying while connecting.
///
/// Only lock contention qualifies (`SQLITE_BUSY` / `SQLITE_LOCKED`, codes 5
/// and 6, including extended codes). Everything else, such as a missing
/// directory or a corrupt file, fails immediately.
pub fn is_transient_sqlite_error(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db_err) => db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .map(|code| matches!(code & 0xff, 5 | 6))
            .unwrap_or(false),
        sqlx::Error::PoolTimedOut => true,
        _ => false,
    }
}
