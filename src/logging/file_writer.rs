//! Diagnostic logging setup
//!
//! Builds the process-wide tracing subscriber: an optional timestamped log
//! file for diagnostics, and the [`MessageLogLayer`] that feeds the
//! user-visible message log.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::Local;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::config::Config;
use crate::messages::{MessageLogLayer, MessageSink};

/// Information about the current log file
#[derive(Debug, Clone)]
pub struct LogFileInfo {
    /// Full path to the log file
    pub path: PathBuf,
}

/// Generate a timestamped log file path
pub fn create_log_file_path(logs_dir: &Path) -> PathBuf {
    let timestamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    logs_dir.join(format!("logdeck-{}.log", timestamp))
}

/// A writer that appends to the shared log file, flushing every line
struct FileWriter {
    file: Arc<Mutex<File>>,
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut file) = self.file.lock() {
            file.write_all(buf)?;
            file.flush()?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if let Ok(mut file) = self.file.lock() {
            file.flush()
        } else {
            Ok(())
        }
    }
}

/// Writer factory for tracing-subscriber
struct FileWriterMaker {
    file: Arc<Mutex<File>>,
}

impl<'a> MakeWriter<'a> for FileWriterMaker {
    type Writer = FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter {
            file: Arc::clone(&self.file),
        }
    }
}

/// Guard that keeps the logging system alive
pub struct LoggingGuard {
    _file: Option<Arc<Mutex<File>>>,
}

fn open_log_file(logs_dir: &Path) -> Result<(PathBuf, Arc<Mutex<File>>)> {
    fs::create_dir_all(logs_dir).context("Failed to create logs directory")?;

    let log_path = create_log_file_path(logs_dir);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context("Failed to open log file")?;

    Ok((log_path, Arc::new(Mutex::new(file))))
}

/// Initialize the process's logging
///
/// Diagnostics go to a file under `logs_dir` when `config.logging.file` is
/// set, filtered by RUST_LOG or `config.logging.filter`. Events at or above
/// the message log's ingest level are forwarded to `sink` regardless of that
/// filter. Returns the log file info (if any) and a guard that must be kept
/// alive for the duration of logging.
pub fn init_logging(
    config: &Config,
    logs_dir: &Path,
    sink: MessageSink,
) -> Result<(Option<LogFileInfo>, LoggingGuard)> {
    let opened = if config.logging.file {
        Some(open_log_file(logs_dir)?)
    } else {
        None
    };

    let file_layer = opened.as_ref().map(|(_, file)| {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

        tracing_subscriber::fmt::layer()
            .with_writer(FileWriterMaker {
                file: Arc::clone(file),
            })
            .with_ansi(false)
            .with_target(true)
            .with_filter(env_filter)
    });

    let message_layer = MessageLogLayer::new(sink, config.message_log.ingest_level());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(message_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    let info = opened.as_ref().map(|(path, _)| LogFileInfo { path: path.clone() });
    let guard = LoggingGuard {
        _file: opened.map(|(_, file)| file),
    };

    Ok((info, guard))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_log_file_path() {
        let logs_dir = PathBuf::from("/tmp/logdeck/logs");
        let path = create_log_file_path(&logs_dir);
        assert!(path.to_string_lossy().contains("logdeck-"));
        assert!(path.to_string_lossy().ends_with(".log"));
        assert!(path.starts_with(&logs_dir));
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let logs_dir = temp_dir.path().join("nested").join("logs");

        let (path, _file) = open_log_file(&logs_dir).unwrap();
        assert!(logs_dir.is_dir());
        assert!(path.exists());
    }

    #[test]
    fn test_file_writer_appends() {
        let temp_dir = TempDir::new().unwrap();
        let (path, file) = open_log_file(temp_dir.path()).unwrap();
        let maker = FileWriterMaker { file };

        maker.make_writer().write_all(b"first\n").unwrap();
        maker.make_writer().write_all(b"second\n").unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }
}
