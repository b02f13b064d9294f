//! Shared logging setup for the sqlgate binary.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "sqlgate=info,sqlgate_db=info,sqlgate_config=info";
const MAX_LOG_FILE_SIZE: u64 = 5 * 1024 * 1024;

/// Logging configuration for a sqlgate process.
pub struct LogConfig<'a> {
    pub app_name: &'a str,
    /// Mirror the file filter on the console.
    pub verbose: bool,
    /// Keep the console quiet (errors only), used when stdout carries
    /// machine-readable output.
    pub quiet_console: bool,
}

/// Initialize tracing with a size-capped file writer and a stderr layer.
pub fn init_logging(config: LogConfig<'_>) -> Result<()> {
    let log_dir = ensure_logs_dir().context("Failed to ensure log directory")?;
    let file_writer = CappedFileWriter::open(log_dir, config.app_name)
        .context("Failed to open log file")?;

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let console_filter = if config.quiet_console && !config.verbose {
        EnvFilter::new("error")
    } else {
        file_filter.clone()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_filter(file_filter),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .init();

    Ok(())
}

/// Resolve the sqlgate home directory.
///
/// Priority:
/// 1) SQLGATE_HOME
/// 2) home directory + .sqlgate
/// 3) ./.sqlgate
pub fn sqlgate_home() -> PathBuf {
    if let Ok(override_path) = std::env::var("SQLGATE_HOME") {
        return PathBuf::from(override_path);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".sqlgate");
    }
    PathBuf::from(".").join(".sqlgate")
}

/// Logs directory: <home>/logs
pub fn logs_dir() -> PathBuf {
    sqlgate_home().join("logs")
}

/// Ensure the logs directory exists.
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir();
    fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create logs directory: {}", logs.display()))?;
    Ok(logs)
}

/// Appender keeping the current log plus one rotated predecessor.
///
/// When the current file would exceed the cap it is renamed to
/// `<name>.log.old` (replacing any previous one) and a fresh file is
/// started. Two files bound disk usage without a rotation scheme to
/// administer.
struct CappedFileAppender {
    current: PathBuf,
    previous: PathBuf,
    file: File,
    size: u64,
}

impl CappedFileAppender {
    fn open(dir: PathBuf, app_name: &str) -> io::Result<Self> {
        let base = sanitize_name(app_name);
        let current = dir.join(format!("{}.log", base));
        let previous = dir.join(format!("{}.log.old", base));
        let file = OpenOptions::new().create(true).append(true).open(&current)?;
        let size = file.metadata()?.len();
        Ok(Self {
            current,
            previous,
            file,
            size,
        })
    }

    fn rotate(&mut self) -> io::Result<()> {
        self.file.flush()?;
        fs::rename(&self.current, &self.previous)?;
        self.file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.current)?;
        self.size = 0;
        Ok(())
    }
}

impl Write for CappedFileAppender {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.size + buf.len() as u64 > MAX_LOG_FILE_SIZE {
            self.rotate()?;
        }
        let bytes = self.file.write(buf)?;
        self.size += bytes as u64;
        Ok(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[derive(Clone)]
struct CappedFileWriter {
    inner: Arc<Mutex<CappedFileAppender>>,
}

impl CappedFileWriter {
    fn open(dir: PathBuf, app_name: &str) -> Result<Self> {
        let appender = CappedFileAppender::open(dir, app_name)
            .with_context(|| format!("Failed to open log file for {}", app_name))?;
        Ok(Self {
            inner: Arc::new(Mutex::new(appender)),
        })
    }
}

struct CappedFileGuard {
    inner: Arc<Mutex<CappedFileAppender>>,
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CappedFileWriter {
    type Writer = CappedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        CappedFileGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Write for CappedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer lock poisoned"))?;
        guard.flush()
    }
}

fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
