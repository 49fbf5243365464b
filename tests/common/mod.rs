//! Shared utilities for integration tests.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use rotalog::config::LogConfig;
use serde_json::Value;
use tempfile::TempDir;

/// In-memory stand-in for stdout.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> Vec<u8> {
        self.0.lock().unwrap().clone()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A console that always fails.
#[allow(dead_code)]
pub struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "console closed"))
    }
}

/// Config writing `app.log` inside `dir`, console off, control endpoint on an
/// ephemeral loopback port.
#[allow(dead_code)]
pub fn test_config(dir: &TempDir) -> LogConfig {
    LogConfig {
        log_file: dir.path().join("app.log"),
        log_port: "127.0.0.1:0".to_string(),
        console_output: false,
        ..LogConfig::default()
    }
}

/// Parse every line of a log file as JSON.
#[allow(dead_code)]
pub fn read_records(path: &Path) -> Vec<Value> {
    parse_lines(&fs::read(path).unwrap())
}

/// Parse newline-delimited JSON.
#[allow(dead_code)]
pub fn parse_lines(bytes: &[u8]) -> Vec<Value> {
    bytes
        .split(|b| *b == b'\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_slice(line)
                .unwrap_or_else(|e| panic!("corrupt line {:?}: {e}", String::from_utf8_lossy(line)))
        })
        .collect()
}
