//! Logging facade.
//!
//! # Responsibilities
//! - Per-level emit operations (one key/value pair, or any attribute mapping)
//! - Consult the level gate before any encoding or sink work
//! - Exit the process after a fatal record is written
//! - Flush sinks on demand for orderly shutdown
//!
//! # Design Decisions
//! - `Logger` is an explicit, cloneable handle rather than global state
//! - Sink failures are returned to the caller; the other sink is still written

use std::io::{self, Write};
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::config::LogConfig;
use crate::encoder;
use crate::level::{LevelGate, Severity};
use crate::observability::metrics;
use crate::sink::{ConsoleSink, FanoutSink, LogSink, RotatingFile, RotationPolicy};

/// Exit status used after a fatal record.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Errors returned by emit and sync operations.
#[derive(Debug, Error)]
pub enum LogError {
    /// The file sink could not be written or flushed.
    #[error("log sink failed: {0}")]
    Sink(#[from] io::Error),
}

struct Inner {
    gate: Arc<LevelGate>,
    sink: Arc<dyn LogSink>,
    exit_on_fatal: bool,
}

/// Handle for emitting structured records.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Create a logger writing through `sink`, filtered by `gate`.
    pub fn new(gate: Arc<LevelGate>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            inner: Arc::new(Inner {
                gate,
                sink,
                exit_on_fatal: true,
            }),
        }
    }

    /// Build the rotating file (and stdout mirror if enabled) described by
    /// `config`.
    pub fn from_config(config: &LogConfig) -> io::Result<Self> {
        Self::from_config_with_console(config, io::stdout())
    }

    /// Like [`Logger::from_config`], mirroring to `console` instead of stdout
    /// when `console_output` is enabled.
    pub fn from_config_with_console<W>(config: &LogConfig, console: W) -> io::Result<Self>
    where
        W: Write + Send + 'static,
    {
        let policy = RotationPolicy::from_config(config);
        let file: Arc<dyn LogSink> = Arc::new(RotatingFile::open(policy)?);
        let console: Option<Arc<dyn LogSink>> = if config.console_output {
            Some(Arc::new(ConsoleSink::new(console)))
        } else {
            None
        };

        let gate = Arc::new(LevelGate::new(config.log_level));
        Ok(Self::new(gate, Arc::new(FanoutSink::new(file, console))))
    }

    /// Disable (or re-enable) the process exit after fatal records.
    ///
    /// Fatal records are still written. Meant for embedding and tests.
    pub fn with_fatal_exit(self, exit_on_fatal: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                gate: self.inner.gate.clone(),
                sink: self.inner.sink.clone(),
                exit_on_fatal,
            }),
        }
    }

    /// The level gate shared with the control endpoint.
    pub fn gate(&self) -> Arc<LevelGate> {
        self.inner.gate.clone()
    }

    /// Whether a record at `level` would currently be written.
    pub fn enabled(&self, level: Severity) -> bool {
        self.inner.gate.should_emit(level)
    }

    /// Emit a record with an arbitrary set of string attributes.
    ///
    /// Records below the gate return `Ok(())` without encoding. A fatal
    /// record terminates the process after it is written, unless disabled
    /// with [`Logger::with_fatal_exit`].
    pub fn log<I, K, V>(&self, level: Severity, message: &str, fields: I) -> Result<(), LogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        if !self.enabled(level) {
            return Ok(());
        }

        let line = encoder::encode(&Utc::now(), level, message, fields);
        let written = self.inner.sink.write_line(&line);
        if written.is_ok() {
            metrics::record_emitted(level);
        }

        if level == Severity::Fatal && self.inner.exit_on_fatal {
            // Best effort: the process is going away either way.
            let _ = self.inner.sink.sync();
            std::process::exit(FATAL_EXIT_CODE);
        }

        written.map_err(LogError::from)
    }

    /// Flush every sink to durable storage.
    pub fn sync(&self) -> Result<(), LogError> {
        self.inner.sink.sync().map_err(LogError::from)
    }

    pub fn debug(&self, message: &str, key: &str, value: &str) -> Result<(), LogError> {
        self.log(Severity::Debug, message, [(key, value)])
    }

    pub fn debug_with_fields<I, K, V>(&self, message: &str, fields: I) -> Result<(), LogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.log(Severity::Debug, message, fields)
    }

    pub fn info(&self, message: &str, key: &str, value: &str) -> Result<(), LogError> {
        self.log(Severity::Info, message, [(key, value)])
    }

    pub fn info_with_fields<I, K, V>(&self, message: &str, fields: I) -> Result<(), LogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.log(Severity::Info, message, fields)
    }

    pub fn warn(&self, message: &str, key: &str, value: &str) -> Result<(), LogError> {
        self.log(Severity::Warn, message, [(key, value)])
    }

    pub fn warn_with_fields<I, K, V>(&self, message: &str, fields: I) -> Result<(), LogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.log(Severity::Warn, message, fields)
    }

    pub fn error(&self, message: &str, key: &str, value: &str) -> Result<(), LogError> {
        self.log(Severity::Error, message, [(key, value)])
    }

    pub fn error_with_fields<I, K, V>(&self, message: &str, fields: I) -> Result<(), LogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.log(Severity::Error, message, fields)
    }

    /// Emit a fatal record, then exit the process (see [`Logger::log`]).
    pub fn fatal(&self, message: &str, key: &str, value: &str) -> Result<(), LogError> {
        self.log(Severity::Fatal, message, [(key, value)])
    }

    /// Emit a fatal record with attributes, then exit the process.
    pub fn fatal_with_fields<I, K, V>(&self, message: &str, fields: I) -> Result<(), LogError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.log(Severity::Fatal, message, fields)
    }
}
