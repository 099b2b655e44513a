//! Progress logging utilities.

use log::info;
use std::time::Instant;

/// Logs how many units of an operation are done and the rate since `start_time`.
///
/// # Arguments
///
/// * `start_time` - When the operation started
/// * `current` - Completed units (files or batches)
/// * `total` - Units in the operation
pub fn log_progress(start_time: Instant, current: usize, total: usize) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        current as f64 / elapsed_secs
    } else {
        0.0
    };
    let percent = if total > 0 {
        current as f64 * 100.0 / total as f64
    } else {
        100.0
    };
    info!(
        "Progress: {}/{} ({:.0}%) in {:.2} seconds (~{:.2} units/sec)",
        current, total, percent, elapsed_secs, rate
    );
}
