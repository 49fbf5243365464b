//! Metrics hooks.
//!
//! # Metrics
//! - `rotalog_records_total` (counter): records the file sink accepted, by level
//! - `rotalog_sink_errors_total` (counter): failed sink writes, by sink
//! - `rotalog_rotations_total` (counter): file rotations
//! - `rotalog_level_changes_total` (counter): accepted level changes
//!
//! # Design Decisions
//! - Emitted through the `metrics` facade; the host process installs a
//!   recorder (and exporter) if it wants them, otherwise they are no-ops
//! - Suppressed records are not counted to keep the rejected path free

use crate::level::Severity;

/// Sink label for the rotating file.
pub const FILE_SINK: &str = "file";
/// Sink label for the console duplicate.
pub const CONSOLE_SINK: &str = "console";

/// Record that a line passed the gate and the file sink accepted it.
pub fn record_emitted(level: Severity) {
    metrics::counter!("rotalog_records_total", "level" => level.as_str()).increment(1);
}

/// Record a failed write on one sink.
pub fn record_sink_error(sink: &'static str) {
    metrics::counter!("rotalog_sink_errors_total", "sink" => sink).increment(1);
}

/// Record a completed file rotation.
pub fn record_rotation() {
    metrics::counter!("rotalog_rotations_total").increment(1);
}

/// Record a level change made through the control endpoint.
pub fn record_level_change(to: Severity) {
    metrics::counter!("rotalog_level_changes_total", "to" => to.as_str()).increment(1);
}
