//! Status and progress reporting.
//!
//! Core operations never touch a front-end directly. They report through an
//! [`EventSink`], which is either a plain logger or the sending half of a
//! channel read by whoever spawned the operation.

use log::info;
use tokio::sync::mpsc::UnboundedSender;

/// One observable step of a running operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationEvent {
    /// Human-readable status line
    Status(String),
    /// `current` of `total` units (files or batches) are done
    Progress {
        /// Completed units
        current: usize,
        /// Units in the operation
        total: usize,
    },
}

/// Receiver of status lines and progress fractions.
///
/// Purely observational: implementations must not block and cannot apply
/// backpressure.
pub trait EventSink: Send + Sync {
    /// Reports a status line.
    fn status(&self, message: &str);

    /// Reports that `current` of `total` units are complete.
    fn progress(&self, current: usize, total: usize);
}

/// Sink that writes every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn status(&self, message: &str) {
        info!("{}", message);
    }

    fn progress(&self, current: usize, total: usize) {
        log::debug!("Progress: {}/{}", current, total);
    }
}

/// Forwards events to a channel; a closed receiver is ignored.
impl EventSink for UnboundedSender<OperationEvent> {
    fn status(&self, message: &str) {
        let _ = self.send(OperationEvent::Status(message.to_string()));
    }

    fn progress(&self, current: usize, total: usize) {
        let _ = self.send(OperationEvent::Progress { current, total });
    }
}

/// Sink that stores events in memory; used by tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingSink {
    events: std::sync::Mutex<Vec<OperationEvent>>,
}

#[cfg(test)]
impl RecordingSink {
    pub(crate) fn events(&self) -> Vec<OperationEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub(crate) fn statuses(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                OperationEvent::Status(s) => Some(s),
                OperationEvent::Progress { .. } => None,
            })
            .collect()
    }
}

#[cfg(test)]
impl EventSink for RecordingSink {
    fn status(&self, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(OperationEvent::Status(message.to_string()));
        }
    }

    fn progress(&self, current: usize, total: usize) {
        if let Ok(mut events) = self.events.lock() {
            events.push(OperationEvent::Progress { current, total });
        }
    }
}
