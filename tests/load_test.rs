//! Concurrent emitters must never interleave partial lines.

use std::collections::HashSet;
use std::thread;

use rotalog::Logger;
use tempfile::TempDir;

mod common;

use common::{read_records, test_config, SharedBuf};

#[test]
fn test_concurrent_emitters_write_whole_lines() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.console_output = true;
    let console = SharedBuf::default();
    let logger = Logger::from_config_with_console(&config, console.clone()).unwrap();

    let threads = 16;
    let per_thread = 500;
    let filler = "y".repeat(300);

    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = logger.clone();
            let filler = filler.clone();
            thread::spawn(move || {
                for n in 0..per_thread {
                    logger
                        .info_with_fields(
                            "concurrent",
                            [
                                ("thread", t.to_string()),
                                ("n", n.to_string()),
                                ("filler", filler.clone()),
                            ],
                        )
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    logger.sync().unwrap();

    let records = read_records(&config.log_file);
    assert_eq!(records.len(), threads * per_thread);

    let unique: HashSet<(String, String)> = records
        .iter()
        .map(|r| {
            assert_eq!(r["filler"].as_str().unwrap().len(), 300);
            (
                r["thread"].as_str().unwrap().to_string(),
                r["n"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(unique.len(), threads * per_thread);

    assert_eq!(common::parse_lines(&console.contents()).len(), threads * per_thread);
}

#[test]
fn test_concurrent_emitters_across_rotations() {
    let dir = TempDir::new().unwrap();
    let mut config = test_config(&dir);
    config.max_size = 1;
    config.max_backups = 50;
    let logger = Logger::from_config(&config).unwrap();

    let payload = "z".repeat(2000);
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = logger.clone();
            let payload = payload.clone();
            thread::spawn(move || {
                for n in 0..250 {
                    logger
                        .warn_with_fields(
                            "rotating",
                            [("t", t.to_string()), ("n", n.to_string()), ("p", payload.clone())],
                        )
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.sync().unwrap();

    let mut total = read_records(&config.log_file).len();
    for entry in std::fs::read_dir(dir.path()).unwrap() {
        let path = entry.unwrap().path();
        if path != config.log_file {
            total += read_records(&path).len();
        }
    }
    assert_eq!(total, 8 * 250);
}
