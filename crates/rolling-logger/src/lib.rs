//! Rolling Logger
//!
//! File logger for desktop apps. Lines go to `<dir>/<app>.log`, which is
//! rotated to `<app>.log.1 .. <app>.log.N` once it grows past a size limit.
//! The most recent lines are also kept in memory for diagnostics views.
//!
//! `init_logger` installs a `tracing` subscriber; records emitted through the
//! `log` facade are forwarded to it as well.

use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

/// Lines kept in the in-memory buffer
pub const RECENT_CAPACITY: usize = 500;

/// When to rotate and how many old files to keep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub max_bytes: u64,
    pub max_files: usize,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 2 * 1024 * 1024,
            max_files: 3,
        }
    }
}

#[derive(Debug)]
pub enum LoggerError {
    Io(io::Error),
    AlreadyInitialized,
    NotInitialized,
}

impl std::fmt::Display for LoggerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggerError::Io(e) => write!(f, "log file error: {}", e),
            LoggerError::AlreadyInitialized => write!(f, "logger already initialized"),
            LoggerError::NotInitialized => write!(f, "logger not initialized"),
        }
    }
}

impl std::error::Error for LoggerError {}

impl From<io::Error> for LoggerError {
    fn from(e: io::Error) -> Self {
        LoggerError::Io(e)
    }
}

/// A size-rotated log file with a circular buffer of its last lines
pub struct RollingFile {
    dir: PathBuf,
    base_name: String,
    policy: RotationPolicy,
    file: File,
    written: u64,
    pending: Vec<u8>,
    recent: VecDeque<String>,
    capacity: usize,
}

impl RollingFile {
    /// Open `<dir>/<app_name>.log` for appending, creating `dir` if needed
    pub fn open(dir: &Path, app_name: &str, policy: RotationPolicy) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let base_name = format!("{}.log", app_name);
        let path = dir.join(&base_name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let written = file.metadata()?.len();

        Ok(Self {
            dir: dir.to_path_buf(),
            base_name,
            policy,
            file,
            written,
            pending: Vec::new(),
            recent: VecDeque::with_capacity(RECENT_CAPACITY),
            capacity: RECENT_CAPACITY,
        })
    }

    /// Path of the live log file
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.base_name)
    }

    fn rotated_path(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", self.base_name, index))
    }

    /// Append raw output, rotating before a write that would cross the limit
    pub fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()> {
        if self.written > 0 && self.written + buf.len() as u64 > self.policy.max_bytes {
            self.rotate()?;
        }
        self.file.write_all(buf)?;
        self.written += buf.len() as u64;
        self.remember(buf);
        Ok(())
    }

    /// Write one line (a newline is appended)
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');
        self.write_bytes(buf.as_bytes())
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;

        if self.policy.max_files == 0 {
            self.file = File::create(self.path())?;
            self.written = 0;
            return Ok(());
        }

        let oldest = self.rotated_path(self.policy.max_files);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.policy.max_files).rev() {
            let from = self.rotated_path(index);
            if from.exists() {
                fs::rename(&from, self.rotated_path(index + 1))?;
            }
        }
        fs::rename(self.path(), self.rotated_path(1))?;

        self.file = OpenOptions::new().create(true).append(true).open(self.path())?;
        self.written = 0;
        Ok(())
    }

    fn remember(&mut self, buf: &[u8]) {
        // Decode whole lines only; a character may span two writes
        self.pending.extend_from_slice(buf);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if self.recent.len() == self.capacity {
                self.recent.pop_front();
            }
            self.recent.push_back(String::from_utf8_lossy(&line).trim_end().to_string());
        }
    }

    /// The last lines written, oldest first
    pub fn recent(&self) -> Vec<String> {
        self.recent.iter().cloned().collect()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

type SharedFile = Arc<Mutex<RollingFile>>;

static LOGGER: OnceLock<SharedFile> = OnceLock::new();

/// `io::Write` handle given to the tracing subscriber
struct SharedWriter(SharedFile);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))?;
        file.flush()
    }
}

/// Local wall-clock timestamps
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Install the global subscriber writing to `<log_dir>/<app_name>.log`
pub fn init_logger(log_dir: PathBuf, app_name: &str, policy: RotationPolicy) -> Result<(), LoggerError> {
    if LOGGER.get().is_some() {
        return Err(LoggerError::AlreadyInitialized);
    }

    let shared: SharedFile = Arc::new(Mutex::new(RollingFile::open(&log_dir, app_name, policy)?));
    let writer_handle = shared.clone();

    tracing_subscriber::fmt()
        .with_writer(move || SharedWriter(writer_handle.clone()))
        .with_ansi(false)
        .with_timer(LocalTime)
        .with_max_level(tracing::Level::INFO)
        .try_init()
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    LOGGER.set(shared).map_err(|_| LoggerError::AlreadyInitialized)?;
    log::info!("{} logging to {}", app_name, log_dir.display());
    Ok(())
}

/// Log an info line through the installed logger
pub fn info(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::info!("{}", msg);
    Ok(())
}

/// Log an error line through the installed logger
pub fn error(msg: &str) -> Result<(), LoggerError> {
    ensure_initialized()?;
    log::error!("{}", msg);
    Ok(())
}

/// Last lines written by the installed logger, oldest first
pub fn recent_lines() -> Result<Vec<String>, LoggerError> {
    let shared = LOGGER.get().ok_or(LoggerError::NotInitialized)?;
    let file = shared
        .lock()
        .map_err(|_| LoggerError::Io(io::Error::new(io::ErrorKind::Other, "log file lock poisoned")))?;
    Ok(file.recent())
}

fn ensure_initialized() -> Result<(), LoggerError> {
    LOGGER.get().map(|_| ()).ok_or(LoggerError::NotInitialized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_policy() -> RotationPolicy {
        RotationPolicy {
            max_bytes: 32,
            max_files: 2,
        }
    }

    #[test]
    fn test_writes_to_live_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RollingFile::open(dir.path(), "app", RotationPolicy::default()).unwrap();
        log.write_line("hello").unwrap();
        log.flush().unwrap();

        assert_eq!(fs::read_to_string(dir.path().join("app.log")).unwrap(), "hello\n");
    }

    #[test]
    fn test_rotates_past_limit() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RollingFile::open(dir.path(), "app", small_policy()).unwrap();

        // 20 bytes each, so every second line forces a rotation
        for i in 0..5 {
            log.write_line(&format!("line {:0>14}", i)).unwrap();
        }
        log.flush().unwrap();

        assert!(dir.path().join("app.log.1").exists());
        assert!(dir.path().join("app.log.2").exists());
        assert!(!dir.path().join("app.log.3").exists());

        let live = fs::read_to_string(dir.path().join("app.log")).unwrap();
        assert!(live.contains("00000000000004"));
        let previous = fs::read_to_string(dir.path().join("app.log.1")).unwrap();
        assert!(previous.contains("00000000000003"));
    }

    #[test]
    fn test_zero_kept_files_truncates() {
        let dir = tempfile::tempdir().unwrap();
        let policy = RotationPolicy { max_bytes: 8, max_files: 0 };
        let mut log = RollingFile::open(dir.path(), "app", policy).unwrap();
        log.write_line("first!!").unwrap();
        log.write_line("second!").unwrap();
        log.flush().unwrap();

        assert!(!dir.path().join("app.log.1").exists());
        assert_eq!(fs::read_to_string(dir.path().join("app.log")).unwrap(), "second!\n");
    }

    #[test]
    fn test_recent_lines_survive_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RollingFile::open(dir.path(), "app", small_policy()).unwrap();
        log.write_line("a").unwrap();
        log.write_bytes(b"partial ").unwrap();
        log.write_bytes(b"line\nb\n").unwrap();

        assert_eq!(log.recent(), vec!["a", "partial line", "b"]);
    }

    #[test]
    fn test_recent_keeps_split_multibyte_chars() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RollingFile::open(dir.path(), "app", RotationPolicy::default()).unwrap();
        let bytes = "删除成功\n".as_bytes();
        // Split inside the first character
        log.write_bytes(&bytes[..1]).unwrap();
        log.write_bytes(&bytes[1..]).unwrap();

        assert_eq!(log.recent(), vec!["删除成功"]);
    }

    #[test]
    fn test_recent_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = RollingFile::open(dir.path(), "app", RotationPolicy::default()).unwrap();
        for i in 0..(RECENT_CAPACITY + 10) {
            log.write_line(&i.to_string()).unwrap();
        }

        let recent = log.recent();
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert_eq!(recent[0], "10");
    }
}
