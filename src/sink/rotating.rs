//! Size and age rotated log file.
//!
//! # Responsibilities
//! - Append encoded lines to the active file
//! - Rotate when the next write would exceed `max_size` or the file is
//!   older than `max_age`
//! - Prune backups beyond `max_backups` (oldest first) or older than `max_age`
//!
//! # Design Decisions
//! - Size check, rotation and write happen under one mutex
//! - Backups are named `<stem>-<YYYY-MM-DDTHH-MM-SS.mmm>.<ext>` next to the
//!   active file and are discovered from the directory, so backups left by
//!   an earlier run are pruned as well
//! - A failed write drops the handle; the next write reopens the file

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::config::LogConfig;
use crate::observability::metrics;
use crate::sink::LogSink;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// Rotation thresholds for a [`RotatingFile`].
#[derive(Debug, Clone)]
pub struct RotationPolicy {
    /// Path of the active log file.
    pub path: PathBuf,
    /// Rotate before a write would push the file past this many bytes.
    pub max_size_bytes: u64,
    /// Number of rotated files to keep.
    pub max_backups: usize,
    /// Rotate the active file, and delete backups, older than this.
    pub max_age: TimeDelta,
}

impl RotationPolicy {
    /// Build the policy described by a resolved configuration.
    pub fn from_config(config: &LogConfig) -> Self {
        Self {
            path: config.log_file.clone(),
            max_size_bytes: config.max_size.saturating_mul(BYTES_PER_MEGABYTE),
            max_backups: config.max_backups as usize,
            max_age: TimeDelta::days(i64::from(config.max_age)),
        }
    }
}

struct RotationState {
    file: Option<BufWriter<File>>,
    size: u64,
    opened_at: DateTime<Utc>,
}

/// Log file that rolls over by size and age.
pub struct RotatingFile {
    policy: RotationPolicy,
    state: Mutex<RotationState>,
}

impl RotatingFile {
    /// Open (or create) the active file described by `policy`.
    pub fn open(policy: RotationPolicy) -> io::Result<Self> {
        let state = open_active(&policy.path, Utc::now())?;
        Ok(Self {
            policy,
            state: Mutex::new(state),
        })
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.policy.path
    }

    /// Bytes written to the active file so far.
    pub fn size(&self) -> u64 {
        self.lock().size
    }

    /// Paths of retained backups, oldest first.
    pub fn backups(&self) -> io::Result<Vec<PathBuf>> {
        Ok(list_backups(&self.policy.path)?
            .into_iter()
            .map(|(_, path)| path)
            .collect())
    }

    /// Append `line` as if the current time were `now`.
    pub(crate) fn write_at(&self, line: &[u8], now: DateTime<Utc>) -> io::Result<()> {
        let mut state = self.lock();

        if state.file.is_none() {
            *state = open_active(&self.policy.path, now)?;
        }

        if self.should_rotate(&state, line.len() as u64, now) {
            self.rotate(&mut state, now)?;
        }

        let Some(file) = state.file.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::NotFound, "log file is not open"));
        };

        match file.write_all(line).and_then(|()| file.flush()) {
            Ok(()) => {
                state.size += line.len() as u64;
                Ok(())
            }
            Err(e) => {
                state.file = None;
                Err(e)
            }
        }
    }

    fn should_rotate(&self, state: &RotationState, incoming: u64, now: DateTime<Utc>) -> bool {
        let too_big = state.size > 0 && state.size + incoming > self.policy.max_size_bytes;
        let too_old = now.signed_duration_since(state.opened_at) > self.policy.max_age;
        too_big || too_old
    }

    fn rotate(&self, state: &mut RotationState, now: DateTime<Utc>) -> io::Result<()> {
        if let Some(mut file) = state.file.take() {
            file.flush()?;
        }

        let backup = next_backup_path(&self.policy.path, now);
        match fs::rename(&self.policy.path, &backup) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }

        *state = open_active(&self.policy.path, now)?;
        // A fresh file is never immediately too old.
        state.opened_at = now;

        metrics::record_rotation();
        tracing::debug!(
            path = %self.policy.path.display(),
            backup = %backup.display(),
            "Rotated log file"
        );

        if let Err(e) = self.prune(now) {
            tracing::warn!(
                path = %self.policy.path.display(),
                error = %e,
                "Failed to prune log backups"
            );
        }
        Ok(())
    }

    /// Delete backups older than `max_age`, then the oldest beyond
    /// `max_backups`. Returns how many files were removed.
    fn prune(&self, now: DateTime<Utc>) -> io::Result<usize> {
        let backups = list_backups(&self.policy.path)?;
        let (expired, mut kept): (Vec<_>, Vec<_>) = backups
            .into_iter()
            .partition(|(stamp, _)| now.signed_duration_since(*stamp) > self.policy.max_age);

        let excess = kept.len().saturating_sub(self.policy.max_backups);
        let doomed = expired.into_iter().chain(kept.drain(..excess));

        let mut removed = 0;
        for (_, path) in doomed {
            fs::remove_file(&path)?;
            removed += 1;
        }
        Ok(removed)
    }

    fn lock(&self) -> MutexGuard<'_, RotationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for RotatingFile {
    fn write_line(&self, line: &[u8]) -> io::Result<()> {
        self.write_at(line, Utc::now())
    }

    fn sync(&self) -> io::Result<()> {
        let mut state = self.lock();
        if let Some(file) = state.file.as_mut() {
            file.flush()?;
            file.get_ref().sync_all()?;
        }
        Ok(())
    }
}

fn open_active(path: &Path, now: DateTime<Utc>) -> io::Result<RotationState> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let meta = file.metadata()?;
    let opened_at = meta
        .created()
        .or_else(|_| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or(now);

    Ok(RotationState {
        file: Some(BufWriter::new(file)),
        size: meta.len(),
        opened_at,
    })
}

/// Split `app.log` into (`app`, Some(`log`)).
fn name_parts(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    (stem, ext)
}

fn backup_path(path: &Path, stamp: DateTime<Utc>) -> PathBuf {
    let (stem, ext) = name_parts(path);
    let time = stamp.format(BACKUP_TIME_FORMAT);
    let name = match ext {
        Some(ext) => format!("{stem}-{time}.{ext}"),
        None => format!("{stem}-{time}"),
    };
    path.with_file_name(name)
}

/// Backup stamps must stay strictly increasing, even for several rotations
/// inside one millisecond, so that name order is rotation order.
fn next_backup_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
    let newest = list_backups(path)
        .ok()
        .and_then(|backups| backups.last().map(|(stamp, _)| *stamp));
    let mut stamp = match newest {
        Some(newest) if newest >= now => newest + TimeDelta::milliseconds(1),
        _ => now,
    };
    loop {
        let candidate = backup_path(path, stamp);
        if !candidate.exists() {
            return candidate;
        }
        stamp += TimeDelta::milliseconds(1);
    }
}

fn parse_backup_name(file_name: &str, stem: &str, ext: Option<&str>) -> Option<DateTime<Utc>> {
    let rest = file_name.strip_prefix(stem)?.strip_prefix('-')?;
    let stamp = match ext {
        Some(ext) => rest.strip_suffix(ext)?.strip_suffix('.')?,
        None => rest,
    };
    NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Backups belonging to `path`, oldest first.
fn list_backups(path: &Path) -> io::Result<Vec<(DateTime<Utc>, PathBuf)>> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let (stem, ext) = name_parts(path);

    let mut backups = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(stamp) = parse_backup_name(name, &stem, ext.as_deref()) {
            backups.push((stamp, entry.path()));
        }
    }
    backups.sort();
    Ok(backups)
}
