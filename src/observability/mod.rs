//! Observability of the logging facility itself.
//!
//! # Data Flow
//! ```text
//! logger / sink / admin
//!     → metrics.rs (counters through the `metrics` facade)
//!     → `tracing` events for internal diagnostics (bind, rotation, prune,
//!       console failures), rendered by the host's subscriber
//! ```
//!
//! # Design Decisions
//! - Internal diagnostics never go through the logger they describe
//! - Metrics are cheap (atomic increments, no-ops without a recorder)

pub mod metrics;
