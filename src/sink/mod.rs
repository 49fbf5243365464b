//! Output sinks.
//!
//! # Data Flow
//! ```text
//! encoded line
//!     → fanout.rs (file always, console if enabled)
//!         → rotating.rs (size/age rotation, backup pruning)
//!         → console.rs  (verbatim copy to stdout)
//! ```
//!
//! # Design Decisions
//! - Sinks are synchronous; emitters block only for the sink's critical section
//! - File and console are independent fault domains

pub mod console;
pub mod fanout;
pub mod rotating;

use std::io;

pub use console::ConsoleSink;
pub use fanout::FanoutSink;
pub use rotating::{RotatingFile, RotationPolicy};

/// A destination for finished, newline-terminated records.
pub trait LogSink: Send + Sync {
    /// Append one encoded line.
    fn write_line(&self, line: &[u8]) -> io::Result<()>;

    /// Force buffered output to durable storage.
    fn sync(&self) -> io::Result<()>;
}
