//! Runtime-mutable minimum level.

use std::sync::atomic::{AtomicU8, Ordering};

use super::Severity;

/// Shared minimum-severity threshold.
///
/// Read on every emit and written rarely by the level-control endpoint.
/// Stored as a single `AtomicU8`, so a reader always observes one of the
/// five levels.
#[derive(Debug)]
pub struct LevelGate {
    level: AtomicU8,
}

impl LevelGate {
    /// Create a gate starting at `level`.
    pub fn new(level: Severity) -> Self {
        Self {
            level: AtomicU8::new(level as u8),
        }
    }

    /// Current threshold.
    pub fn current_level(&self) -> Severity {
        Severity::from(self.level.load(Ordering::Acquire))
    }

    /// Replace the threshold, returning the previous one. Last writer wins.
    pub fn set_level(&self, level: Severity) -> Severity {
        Severity::from(self.level.swap(level as u8, Ordering::AcqRel))
    }

    /// Whether a record at `candidate` passes the gate.
    #[inline]
    pub fn should_emit(&self, candidate: Severity) -> bool {
        candidate >= self.current_level()
    }
}

impl Default for LevelGate {
    fn default() -> Self {
        Self::new(Severity::default())
    }
}
