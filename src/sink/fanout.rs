//! Fan-out of one line to the file and, optionally, the console.

use std::io;
use std::sync::Arc;

use crate::observability::metrics;
use crate::sink::LogSink;

/// Delivers each line to the file sink and an optional console mirror.
///
/// The console is always attempted, even when the file write failed. Only
/// file errors are returned; console errors are counted and reported through
/// `tracing`.
pub struct FanoutSink {
    file: Arc<dyn LogSink>,
    console: Option<Arc<dyn LogSink>>,
}

impl FanoutSink {
    pub fn new(file: Arc<dyn LogSink>, console: Option<Arc<dyn LogSink>>) -> Self {
        Self { file, console }
    }

    /// Whether lines are mirrored to the console.
    pub fn has_console(&self) -> bool {
        self.console.is_some()
    }
}

impl LogSink for FanoutSink {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        let written = self.file.write_line(line);
        if written.is_err() {
            metrics::record_sink_error(metrics::FILE_SINK);
        }

        if let Some(console) = &self.console {
            if let Err(e) = console.write_line(line) {
                metrics::record_sink_error(metrics::CONSOLE_SINK);
                tracing::warn!(error = %e, "Console sink write failed");
            }
        }

        written
    }

    fn sync(&self) -> io::Result<()> {
        let synced = self.file.sync();
        if let Some(console) = &self.console {
            if let Err(e) = console.sync() {
                tracing::warn!(error = %e, "Console sink flush failed");
            }
        }
        synced
    }
}
