use chrono::Local;
use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use super::app_paths::AppPaths;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 1000;

/// A log entry with timestamp and message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: Level, target: &str, message: String) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S.%3f").to_string(),
            level: level.to_string().to_uppercase(),
            target: target.to_string(),
            message,
        }
    }

    /// Format for the `log` command and the log file
    pub fn format_for_display(&self) -> String {
        format!(
            "[{}] {} [{}] {}",
            self.timestamp, self.level, self.target, self.message
        )
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Thread-safe ring buffer for log entries
#[derive(Clone)]
pub struct LogRingBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    capacity: usize,
}

impl Default for LogRingBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl LogRingBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, entry: LogEntry) {
        let mut entries = lock(&self.entries);
        if entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn get_recent(&self, count: usize) -> Vec<LogEntry> {
        let entries = lock(&self.entries);
        entries.iter().rev().take(count).rev().cloned().collect()
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split a compact-format line (`LEVEL target: message`) into its parts
fn parse_line(line: &str) -> (Level, &str, &str) {
    let (level, rest) = match line.split_once(' ') {
        Some(("TRACE", rest)) => (Level::TRACE, rest),
        Some(("DEBUG", rest)) => (Level::DEBUG, rest),
        Some(("INFO", rest)) => (Level::INFO, rest),
        Some(("WARN", rest)) => (Level::WARN, rest),
        Some(("ERROR", rest)) => (Level::ERROR, rest),
        _ => return (Level::INFO, "general", line),
    };
    let rest = rest.trim_start();

    match rest.split_once(':') {
        Some((target, msg)) if !target.contains(' ') => (level, target, msg.trim()),
        _ => (level, "general", rest),
    }
}

/// Writer that feeds the ring buffer and, when opened, a log file
#[derive(Clone)]
pub struct LogWriter {
    buffer: LogRingBuffer,
    file: Arc<Mutex<Option<File>>>,
}

impl LogWriter {
    pub fn new(buffer: LogRingBuffer, file: Option<File>) -> Self {
        Self {
            buffer,
            file: Arc::new(Mutex::new(file)),
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(message) = std::str::from_utf8(buf) {
            for line in message.lines().map(str::trim).filter(|l| !l.is_empty()) {
                let (level, target, msg) = parse_line(line);
                let entry = LogEntry::new(level, target, msg.to_string());

                if let Some(file) = lock(&self.file).as_mut() {
                    // A failing log file must not take the console down with it
                    let _ = writeln!(file, "{}", entry.format_for_display());
                }
                self.buffer.push(entry);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Some(file) = lock(&self.file).as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Global log buffer accessible throughout the application
static LOG_BUFFER: OnceLock<LogRingBuffer> = OnceLock::new();
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Get the global log buffer
pub fn get_log_buffer() -> Option<LogRingBuffer> {
    LOG_BUFFER.get().cloned()
}

/// Path of the current session's log file, once logging is up
pub fn log_path() -> Option<&'static Path> {
    LOG_PATH.get().map(PathBuf::as_path)
}

fn open_log_file() -> Option<(File, PathBuf)> {
    let log_dir = AppPaths::log_dir().ok()?;
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_path = log_dir.join(format!("catalog-console_{}.log", timestamp));

    #[cfg(unix)]
    {
        let latest = log_dir.join("latest.log");
        let _ = std::fs::remove_file(&latest);
        let _ = std::os::unix::fs::symlink(&log_path, &latest);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok()?;
    Some((file, log_path))
}

/// Initialize tracing into the ring buffer and a timestamped log file.
///
/// `default_directive` is used when `RUST_LOG` is not set.
pub fn init_tracing(default_directive: &str) -> LogRingBuffer {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let buffer = LOG_BUFFER.get_or_init(LogRingBuffer::new).clone();

    let file = match open_log_file() {
        Some((file, path)) => {
            let _ = LOG_PATH.set(path);
            Some(file)
        }
        None => None,
    };

    let fmt_layer = fmt::layer()
        .with_writer(LogWriter::new(buffer.clone(), file))
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .without_time() // LogEntry stamps its own time
        .compact();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();

    tracing::info!(target: "console", "Logging initialized");
    buffer
}
