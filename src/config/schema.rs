//! Configuration schema definitions.
//!
//! All keys are optional; JSON names are camelCase (`logFile`, `logPort`,
//! `logLevel`, `consoleOutput`, `maxSize`, `maxBackups`, `maxAge`).

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::level::Severity;

/// Config file read at startup when no other path is given.
pub const DEFAULT_CONFIG_FILE: &str = "log.json";
pub const DEFAULT_LOG_FILE: &str = "app.log";
pub const DEFAULT_LOG_PORT: &str = ":8888";
pub const DEFAULT_LOG_LEVEL: Severity = Severity::Debug;
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;
pub const DEFAULT_MAX_BACKUPS: u32 = 3;
pub const DEFAULT_MAX_AGE_DAYS: u32 = 30;
pub const DEFAULT_CONSOLE_OUTPUT: bool = true;

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogConfig {
    /// Active log file path.
    #[serde(deserialize_with = "log_file")]
    pub log_file: PathBuf,

    /// Control endpoint address, `":<port>"` or `"<host>:<port>"`.
    #[serde(deserialize_with = "log_port")]
    pub log_port: String,

    /// Initial minimum level.
    #[serde(deserialize_with = "log_level")]
    pub log_level: Severity,

    /// Mirror every line to stdout.
    #[serde(deserialize_with = "console_output")]
    pub console_output: bool,

    /// Rotate once the file would exceed this many megabytes.
    #[serde(deserialize_with = "max_size")]
    pub max_size: u64,

    /// Rotated files to keep.
    #[serde(deserialize_with = "max_backups")]
    pub max_backups: u32,

    /// Days before the active file rotates and backups are deleted.
    #[serde(deserialize_with = "max_age")]
    pub max_age: u32,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            log_port: DEFAULT_LOG_PORT.to_string(),
            log_level: DEFAULT_LOG_LEVEL,
            console_output: DEFAULT_CONSOLE_OUTPUT,
            max_size: DEFAULT_MAX_SIZE_MB,
            max_backups: DEFAULT_MAX_BACKUPS,
            max_age: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

impl LogConfig {
    /// Socket address for the control endpoint; `":8888"` listens on all
    /// interfaces.
    pub fn bind_address(&self) -> String {
        if self.log_port.starts_with(':') {
            format!("0.0.0.0{}", self.log_port)
        } else {
            self.log_port.clone()
        }
    }
}

impl fmt::Display for LogConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "logFile: {}", self.log_file.display())?;
        writeln!(f, "logLevel: {}", self.log_level)?;
        writeln!(f, "logPort: {}", self.log_port)?;
        writeln!(f, "maxSize(MB): {}", self.max_size)?;
        writeln!(f, "maxBackups: {}", self.max_backups)?;
        writeln!(f, "maxAge(Days): {}", self.max_age)?;
        write!(f, "consoleOutput: {}", self.console_output)
    }
}

/// Turn `9000`, `"9000"` or `":9000"` into `":9000"`; full addresses pass
/// through unchanged.
pub fn normalize_port(raw: &str) -> String {
    let raw = raw.trim();
    if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!(":{raw}")
    } else {
        raw.to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn log_file<'de, D: Deserializer<'de>>(d: D) -> Result<PathBuf, D::Error> {
    Ok(non_empty(Option::deserialize(d)?)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)))
}

fn log_port<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let port = match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => non_empty(Some(s)).map(|s| normalize_port(&s)),
        Some(Value::Number(n)) => Some(normalize_port(&n.to_string())),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "logPort must be a string or number, got {other}"
            )))
        }
    };
    Ok(port.unwrap_or_else(|| DEFAULT_LOG_PORT.to_string()))
}

fn log_level<'de, D: Deserializer<'de>>(d: D) -> Result<Severity, D::Error> {
    // Non-string values are treated like unrecognized names.
    let name = match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => return Ok(DEFAULT_LOG_LEVEL),
        Some(Value::String(s)) => match non_empty(Some(s)) {
            Some(s) => s,
            None => return Ok(DEFAULT_LOG_LEVEL),
        },
        Some(other) => other.to_string(),
    };
    Ok(name.parse().unwrap_or_else(|_| {
        tracing::warn!(
            level = %name,
            default = %DEFAULT_LOG_LEVEL,
            "Unrecognized logLevel in config, using default"
        );
        DEFAULT_LOG_LEVEL
    }))
}

fn console_output<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Option::deserialize(d)?.unwrap_or(DEFAULT_CONSOLE_OUTPUT))
}

fn max_size<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    Ok(Option::deserialize(d)?.unwrap_or(DEFAULT_MAX_SIZE_MB))
}

fn max_backups<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::deserialize(d)?.unwrap_or(DEFAULT_MAX_BACKUPS))
}

fn max_age<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(Option::deserialize(d)?.unwrap_or(DEFAULT_MAX_AGE_DAYS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.log_file, PathBuf::from("app.log"));
        assert_eq!(config.log_port, ":8888");
        assert_eq!(config.log_level, Severity::Debug);
        assert_eq!(config.max_size, 100);
        assert_eq!(config.max_backups, 3);
        assert_eq!(config.max_age, 30);
        assert!(config.console_output);
    }

    #[test]
    fn test_normalize_port() {
        assert_eq!(normalize_port("9000"), ":9000");
        assert_eq!(normalize_port(":9000"), ":9000");
        assert_eq!(normalize_port(" 9000 "), ":9000");
        assert_eq!(normalize_port("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[test]
    fn test_bind_address() {
        let mut config = LogConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:8888");
        config.log_port = "127.0.0.1:9100".into();
        assert_eq!(config.bind_address(), "127.0.0.1:9100");
    }

    #[test]
    fn test_display_lists_every_setting() {
        let rendered = LogConfig::default().to_string();
        for expected in [
            "logFile: app.log",
            "logLevel: debug",
            "logPort: :8888",
            "maxSize(MB): 100",
            "maxBackups: 3",
            "maxAge(Days): 30",
            "consoleOutput: true",
        ] {
            assert!(rendered.contains(expected), "missing {expected:?} in {rendered}");
        }
    }
}
