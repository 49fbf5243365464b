//! Severity levels and the shared level gate.
//!
//! # Data Flow
//! ```text
//! config (logLevel)        → LevelGate::new
//! admin  (PUT /loglevel)   → LevelGate::set_level
//! logger (every emit call) → LevelGate::should_emit
//! ```
//!
//! # Design Decisions
//! - One `AtomicU8` cell, no lock on the hot path
//! - Names are parsed case-insensitively and rendered lowercase

pub mod gate;
pub mod severity;

pub use gate::LevelGate;
pub use severity::{ParseSeverityError, Severity};
