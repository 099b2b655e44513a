//! Process-wide initialization.
//!
//! Only logging is global; every operation opens its own storage connection.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
