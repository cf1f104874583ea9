//! Logging system for logdeck
//!
//! Installs the process's tracing subscriber: file-based diagnostics plus the
//! bridge that feeds the user-visible message log.

mod file_writer;

pub use file_writer::{create_log_file_path, init_logging, LogFileInfo, LoggingGuard};
