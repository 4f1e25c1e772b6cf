//! Rotating file sink
//!
//! Records are appended to the active file. Once the bytes written since the
//! last rotation reach the size limit, the active file is renamed to a
//! timestamped backup next to it and a fresh file is opened at the original
//! path:
//!
//! ```text
//! app.log  ->  app-2025-01-08T10-30-45.123.log  (->  .log.gz when compressed)
//! ```
//!
//! Compression and backup eviction run on a per-sink maintenance thread, so
//! the write path only pays for the rename.

use super::resolver::ensure_parent_dir;
use crate::core::config::RotationConfig;
use crate::core::{LoggerError, Result, Sink};
use chrono::{DateTime, NaiveDateTime, Utc};
use crossbeam_channel::{unbounded, Sender};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

const BYTES_PER_MB: u64 = 1024 * 1024;
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Timestamp embedded in backup names; no `:` so names stay portable
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

const COMPRESSED_SUFFIX: &str = ".gz";

/// When to rotate and which backups to keep
///
/// # Examples
///
/// ```
/// use dynamic_logger::sinks::RotationPolicy;
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(50 * 1024 * 1024)
///     .with_max_backups(7)
///     .with_max_age(Some(Duration::from_secs(30 * 24 * 3600)))
///     .with_compression(true);
/// assert_eq!(policy.max_backups, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Bytes written since the last rotation that trigger the next one
    pub max_bytes: u64,
    /// Maximum number of backups to keep; 0 keeps all
    pub max_backups: usize,
    /// Backups older than this are deleted; `None` disables age eviction
    pub max_age: Option<Duration>,
    /// Whether to gzip rotated files
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from_config(&RotationConfig::default())
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy described by the logger configuration
    #[must_use]
    pub fn from_config(config: &RotationConfig) -> Self {
        Self {
            max_bytes: config.max_size_mb.saturating_mul(BYTES_PER_MB),
            max_backups: config.max_backups as usize,
            max_age: (config.max_age_days > 0)
                .then(|| Duration::from_secs(u64::from(config.max_age_days) * SECONDS_PER_DAY)),
            compress: config.compress,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, max_age: Option<Duration>) -> Self {
        self.max_age = max_age;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

/// How backups of one active file are named
#[derive(Debug, Clone)]
struct BackupNaming {
    dir: PathBuf,
    prefix: String,
    extension: String,
}

impl BackupNaming {
    fn for_path(path: &Path) -> Self {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app");
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();

        Self {
            dir,
            prefix: format!("{}-", stem),
            extension,
        }
    }

    fn path_for(&self, stamp: &DateTime<Utc>) -> PathBuf {
        self.dir.join(format!(
            "{}{}{}",
            self.prefix,
            stamp.format(BACKUP_TIME_FORMAT),
            self.extension
        ))
    }

    /// Parse the backup timestamp out of a file name in `dir`
    fn parse(&self, file_name: &str) -> Option<DateTime<Utc>> {
        let name = file_name
            .strip_suffix(COMPRESSED_SUFFIX)
            .unwrap_or(file_name);
        let stamp = name
            .strip_prefix(&self.prefix)?
            .strip_suffix(self.extension.as_str())?;
        NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

/// A backup found on disk; a plain and a compressed copy share one timestamp
#[derive(Debug)]
struct Backup {
    stamp: DateTime<Utc>,
    paths: Vec<PathBuf>,
}

enum MaintenanceTask {
    Compress(PathBuf),
    Evict,
    Barrier(Sender<()>),
}

struct FileState {
    writer: Option<BufWriter<File>>,
    /// Bytes written since the last rotation (or the size found on open)
    size: u64,
    /// Millisecond timestamp of the newest backup created by this sink
    last_backup_millis: i64,
}

/// File sink with size-based rotation and backup retention
///
/// A single internal lock serializes writes, the size check and the rename,
/// so concurrent writers never rotate twice or split a record across files.
///
/// # Examples
///
/// ```no_run
/// use dynamic_logger::sinks::{RotatingFileSink, RotationPolicy};
/// use dynamic_logger::Sink;
///
/// let policy = RotationPolicy::new().with_max_size(10 * 1024 * 1024).with_max_backups(5);
/// let sink = RotatingFileSink::open("/var/log/app/app.log", policy).unwrap();
/// sink.write(b"hello\n").unwrap();
/// sink.sync().unwrap();
/// ```
pub struct RotatingFileSink {
    path: PathBuf,
    display_name: String,
    naming: BackupNaming,
    policy: RotationPolicy,
    state: Mutex<FileState>,
    maintenance: Option<Sender<MaintenanceTask>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl RotatingFileSink {
    /// Open (or create) the active file, creating missing parent directories
    ///
    /// # Errors
    ///
    /// Returns a rotation-setup error if the directory cannot be prepared or
    /// the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path)?;

        let (file, size) = Self::open_active(&path)?;
        let naming = BackupNaming::for_path(&path);

        let (sender, receiver) = unbounded::<MaintenanceTask>();
        let worker_naming = naming.clone();
        let worker_policy = policy.clone();
        let worker = thread::Builder::new()
            .name("log-maintenance".to_string())
            .spawn(move || {
                for task in receiver {
                    match task {
                        MaintenanceTask::Compress(backup) => {
                            if let Err(e) = compress_file(&backup) {
                                eprintln!(
                                    "[LOGGER WARNING] Keeping uncompressed backup {}: {}",
                                    backup.display(),
                                    e
                                );
                            }
                        }
                        MaintenanceTask::Evict => evict_backups(&worker_naming, &worker_policy),
                        MaintenanceTask::Barrier(done) => {
                            let _ = done.send(());
                        }
                    }
                }
            })
            .map_err(|e| {
                LoggerError::io_operation(
                    "spawning log maintenance thread",
                    path.display().to_string(),
                    e,
                )
            })?;

        let sink = Self {
            display_name: path.display().to_string(),
            path,
            naming,
            policy,
            state: Mutex::new(FileState {
                writer: Some(BufWriter::new(file)),
                size,
                last_backup_millis: i64::MIN,
            }),
            maintenance: Some(sender),
            worker: Some(worker),
        };

        // Age limits apply to backups left by earlier runs as well
        sink.schedule(MaintenanceTask::Evict);
        Ok(sink)
    }

    fn open_active(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::rotation_setup(
                    path.display().to_string(),
                    "cannot open log file",
                    Some(e),
                )
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::rotation_setup(
                    path.display().to_string(),
                    "cannot access file metadata",
                    Some(e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn schedule(&self, task: MaintenanceTask) {
        if let Some(ref sender) = self.maintenance {
            // Only fails once the worker has exited, i.e. during drop
            let _ = sender.send(task);
        }
    }

    /// Next backup timestamp: now, but strictly after the previous backup and
    /// never the name of a file that already exists
    fn next_backup_path(&self, state: &mut FileState) -> PathBuf {
        let mut millis = Utc::now()
            .timestamp_millis()
            .max(state.last_backup_millis.saturating_add(1));

        loop {
            let stamp = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(Utc::now);
            let candidate = self.naming.path_for(&stamp);
            let compressed = compressed_path(&candidate);
            if !candidate.exists() && !compressed.exists() {
                state.last_backup_millis = millis;
                return candidate;
            }
            millis += 1;
        }
    }

    /// Rename the active file to a backup and start a fresh one
    fn rotate(&self, state: &mut FileState) -> Result<()> {
        if let Some(mut writer) = state.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.display_name.clone(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        let backup = self.next_backup_path(state);
        let renamed = fs::rename(&self.path, &backup).map_err(|e| {
            LoggerError::file_rotation(
                self.display_name.clone(),
                format!("Failed to rename to {}: {}", backup.display(), e),
            )
        });

        // Whether or not the rename worked, keep an active file open
        let (file, size) = Self::open_active(&self.path)?;
        state.writer = Some(BufWriter::new(file));

        renamed?;
        state.size = size;

        if self.policy.compress {
            self.schedule(MaintenanceTask::Compress(backup));
        }
        self.schedule(MaintenanceTask::Evict);
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }

    /// Bytes written since the last rotation
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.state.lock().size
    }

    /// Backups currently on disk, newest first
    pub fn backups(&self) -> Vec<PathBuf> {
        list_backups(&self.naming)
            .into_iter()
            .flat_map(|b| b.paths)
            .collect()
    }
}

impl Sink for RotatingFileSink {
    fn write(&self, record: &[u8]) -> Result<()> {
        let mut state = self.state.lock();

        if state.writer.is_none() {
            let (file, size) = Self::open_active(&self.path)?;
            state.writer = Some(BufWriter::new(file));
            state.size = size;
        }

        if let Some(ref mut writer) = state.writer {
            writer.write_all(record).map_err(|e| {
                LoggerError::io_operation("writing log record", self.display_name.clone(), e)
            })?;
        }
        state.size += record.len() as u64;

        if state.size >= self.policy.max_bytes {
            if let Err(e) = self.rotate(&mut state) {
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );
                // Allow the file to grow rather than retry on every write
                state.size = 0;
            }
        }

        Ok(())
    }

    fn sync(&self) -> Result<()> {
        let mut state = self.state.lock();
        if let Some(ref mut writer) = state.writer {
            writer.flush().map_err(|e| {
                LoggerError::io_operation("flushing log file", self.display_name.clone(), e)
            })?;
            writer.get_ref().sync_all().map_err(|e| {
                LoggerError::io_operation("syncing log file", self.display_name.clone(), e)
            })?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.display_name
    }

    /// Block until compression and eviction queued so far have finished
    fn wait_for_maintenance(&self) {
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        self.schedule(MaintenanceTask::Barrier(done_tx));
        let _ = done_rx.recv();
    }
}

impl Drop for RotatingFileSink {
    /// Flushes the active file and detaches the maintenance worker; tasks
    /// already queued still run after drop returns
    fn drop(&mut self) {
        if let Some(mut writer) = self.state.get_mut().writer.take() {
            // Best effort flush - ignore errors during drop
            let _ = writer.flush();
        }

        drop(self.maintenance.take());
        drop(self.worker.take());
    }
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(COMPRESSED_SUFFIX);
    PathBuf::from(name)
}

fn list_backups(naming: &BackupNaming) -> Vec<Backup> {
    let entries = match fs::read_dir(&naming.dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut backups: Vec<Backup> = Vec::new();
    for entry in entries.filter_map(|e| e.ok()) {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(stamp) = naming.parse(name) else {
            continue;
        };
        match backups.iter_mut().find(|b| b.stamp == stamp) {
            Some(existing) => existing.paths.push(entry.path()),
            None => backups.push(Backup {
                stamp,
                paths: vec![entry.path()],
            }),
        }
    }

    backups.sort_by(|a, b| b.stamp.cmp(&a.stamp));
    backups
}

/// Delete backups beyond the count limit (oldest first) and past the age limit
fn evict_backups(naming: &BackupNaming, policy: &RotationPolicy) {
    let backups = list_backups(naming);
    let cutoff = policy
        .max_age
        .and_then(|age| chrono::Duration::from_std(age).ok())
        .map(|age| Utc::now() - age);

    for (index, backup) in backups.iter().enumerate() {
        let over_count = policy.max_backups > 0 && index >= policy.max_backups;
        let too_old = cutoff.is_some_and(|cutoff| backup.stamp < cutoff);
        if !(over_count || too_old) {
            continue;
        }
        for path in &backup.paths {
            if let Err(e) = fs::remove_file(path) {
                eprintln!(
                    "[LOGGER WARNING] Failed to remove old backup {}: {}",
                    path.display(),
                    e
                );
            }
        }
    }
}

/// Gzip `path` next to itself, removing the original only after the
/// compressed copy is complete
///
/// Uses streaming compression to avoid loading the whole file into memory.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::BufReader;

    let gz_path = compressed_path(path);
    let mut temp_name = gz_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(temp_name);

    let result = (|| -> Result<()> {
        let input = File::open(path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to open file for compression: {}", path.display()),
                e,
            )
        })?;
        let mut reader = BufReader::with_capacity(64 * 1024, input);

        let output = File::create(&temp_gz_path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to create {}", temp_gz_path.display()),
                e,
            )
        })?;
        let mut encoder = flate2::write::GzEncoder::new(
            BufWriter::with_capacity(64 * 1024, output),
            flate2::Compression::default(),
        );

        std::io::copy(&mut reader, &mut encoder).map_err(|e| {
            LoggerError::io_operation("compress log file", "Failed to compress data", e)
        })?;

        let mut buffered = encoder.finish().map_err(|e| {
            LoggerError::io_operation("compress log file", "Failed to finish compression", e)
        })?;
        buffered.flush()?;

        fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
            LoggerError::io_operation(
                "compress log file",
                format!("Failed to rename compressed file to {}", gz_path.display()),
                e,
            )
        })
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_gz_path);
        return result;
    }

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compression succeeded but failed to remove {}: {}",
            path.display(),
            e
        );
    }
    Ok(())
}
