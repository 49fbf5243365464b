//! JSON line encoding for log records.
//!
//! # Responsibilities
//! - Render one record as one JSON object terminated by `\n`
//! - Format timestamps as sortable ISO-8601 (UTC, millisecond precision)
//!
//! # Design Decisions
//! - Field order is `level`, `ts`, `msg`, then attributes in caller order
//! - Attributes colliding with a reserved or earlier key overwrite its value
//!   (last write wins) and keep the earlier position

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::level::Severity;

/// Reserved key holding the severity name.
pub const LEVEL_KEY: &str = "level";
/// Reserved key holding the timestamp.
pub const TIME_KEY: &str = "ts";
/// Reserved key holding the message.
pub const MESSAGE_KEY: &str = "msg";

/// Format a timestamp the way records carry it.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Encode a record into a single newline-terminated JSON line.
pub fn encode<I, K, V>(
    ts: &DateTime<Utc>,
    level: Severity,
    message: &str,
    attributes: I,
) -> Vec<u8>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut record = Map::new();
    record.insert(LEVEL_KEY.to_string(), Value::from(level.as_str()));
    record.insert(TIME_KEY.to_string(), Value::from(format_timestamp(ts)));
    record.insert(MESSAGE_KEY.to_string(), Value::from(message));

    for (key, value) in attributes {
        record.insert(key.as_ref().to_string(), Value::from(value.as_ref()));
    }

    // A Map of strings always serializes.
    let mut line = Value::Object(record).to_string().into_bytes();
    line.push(b'\n');
    line
}
