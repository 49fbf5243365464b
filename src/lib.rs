//! Structured JSON logging with a runtime-adjustable level.
//!
//! Records pass a shared [`LevelGate`], are encoded as one JSON object per
//! line, and are written to a size/age rotated file with an optional console
//! mirror. A small HTTP endpoint (`/loglevel`) reads and changes the gate
//! while the process runs.

pub mod admin;
pub mod config;
pub mod encoder;
pub mod level;
pub mod lifecycle;
pub mod logger;
pub mod observability;
pub mod sink;

pub use config::LogConfig;
pub use level::{LevelGate, Severity};
pub use lifecycle::{start, BindPolicy, LoggingService};
pub use logger::{LogError, Logger};
