//! Rotating file writer with size-based rotation and backup retention.
//!
//! The writer backs the fmt layer installed by [`super::init_tracing`]. When
//! the log grows past its size limit it is renamed with a timestamp suffix
//! and a fresh file is started, keeping a fixed number of backups.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Size-rotating log file.
///
/// The file is opened lazily on first write. Backups are named
/// `<file name>.<timestamp>` next to the log, and only the newest
/// `max_backups` are kept.
///
/// The writer is not internally synchronized; wrap it in a `Mutex` to share
/// it, which is also what `tracing_subscriber` expects of a writer.
///
/// # Example
///
/// ```rust
/// use std::io::Write;
/// use mediafeed::observability::FileWriter;
///
/// let dir = tempfile::tempdir()?;
/// let mut writer = FileWriter::new(dir.path().join("feed.log"));
/// writeln!(writer, "refresh dispatched")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct FileWriter {
    file_path: PathBuf,
    file: Option<File>,
    written: u64,
    max_bytes: u64,
    max_backups: usize,
}

impl FileWriter {
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            file: None,
            written: 0,
            max_bytes,
            max_backups,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn open(&mut self) -> io::Result<&mut File> {
        if self.file.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            self.written = file.metadata().map(|m| m.len()).unwrap_or(0);
            self.file = Some(file);
        }

        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file unavailable"))
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file = None;
        self.written = 0;

        if self.file_path.exists() {
            if let Some(backup) = self.next_backup_path() {
                fs::rename(&self.file_path, backup)?;
            }
        }

        self.cleanup_old_backups()
    }

    /// First unused `<name>.<timestamp>` path; rotations within the same
    /// millisecond get a `-N` suffix.
    fn next_backup_path(&self) -> Option<PathBuf> {
        let prefix = self.backup_prefix()?;
        let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S%3f").to_string();

        let base = self.file_path.with_file_name(format!("{prefix}{timestamp}"));
        if !base.exists() {
            return Some(base);
        }
        (1..)
            .map(|n| self.file_path.with_file_name(format!("{prefix}{timestamp}-{n}")))
            .find(|candidate| !candidate.exists())
    }

    fn backup_prefix(&self) -> Option<String> {
        self.file_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| format!("{name}."))
    }

    /// Removes backups beyond the retention limit, oldest first.
    ///
    /// Timestamp suffixes sort lexically in time order. Individual removal
    /// errors are ignored.
    fn cleanup_old_backups(&self) -> io::Result<()> {
        let Some(prefix) = self.backup_prefix() else {
            return Ok(());
        };
        let parent = match self.file_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        backups.sort_unstable_by(|a, b| b.cmp(a));

        for old in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old);
        }

        Ok(())
    }
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.file.is_none() {
            self.open()?;
        }
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.rotate()?;
        }

        let n = self.open()?.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
