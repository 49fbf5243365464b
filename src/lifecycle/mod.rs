//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     LogConfig → Logger (gate + rotating file + console) → bind endpoint
//!     → spawn endpoint → LoggingService handed to the application
//!
//! Shutdown:
//!     Ctrl+C (signals.rs) → stop endpoint → sync logger → exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: logger first, so endpoint failures can be logged
//! - Bind failure is returned; `BindPolicy` decides if it aborts startup

pub mod signals;
pub mod startup;

pub use startup::{start, BindPolicy, LoggingService, StartupError};
