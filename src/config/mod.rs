//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! log.json (optional)
//!     → loader.rs (read & deserialize, absent keys take defaults)
//!     → validation.rs (semantic checks)
//!     → LogConfig (validated, immutable)
//!
//! Missing file, bad JSON or failed validation:
//!     → LogConfig::default()
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; only the level gate changes later
//! - A present key is honoured, including numeric zero
//! - `null` and empty strings count as absent

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, resolve_config, ConfigError};
pub use schema::LogConfig;
pub use validation::{validate_config, ValidationError};
