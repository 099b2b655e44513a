//! Application layer.
//!
//! This module provides the event plumbing between operations and their
//! front-end, the task-spawning workers, and progress and statistics logging.

mod events;
pub mod logging;
pub mod statistics;
pub mod worker;

// Re-export public API
#[cfg(test)]
pub(crate) use events::RecordingSink;
pub use events::{EventSink, LogSink, OperationEvent};
pub use logging::log_progress;
pub use statistics::print_failure_statistics;
pub use worker::{
    run_import, spawn_dump, spawn_export, spawn_flat_export, spawn_import, OperationHandle,
};
