//! Log records and stored entries

use chrono::{DateTime, Utc};

use crate::severity::SeverityLevel;

/// Target used when a producer does not name one
pub const DEFAULT_TARGET: &str = "logdeck";

/// Source data supplied by a producer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Logger/module that produced the message
    pub target: String,
    /// Message text
    pub message: String,
}

impl LogRecord {
    /// Create a new record
    pub fn new(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            message: message.into(),
        }
    }
}

impl From<&str> for LogRecord {
    fn from(message: &str) -> Self {
        LogRecord::new(DEFAULT_TARGET, message)
    }
}

impl From<String> for LogRecord {
    fn from(message: String) -> Self {
        LogRecord::new(DEFAULT_TARGET, message)
    }
}

/// A record stamped by a producer, waiting for the consumer to store it
#[derive(Debug, Clone)]
pub(crate) struct PendingRecord {
    pub level: SeverityLevel,
    pub timestamp: DateTime<Utc>,
    pub thread: String,
    pub record: LogRecord,
}

/// A stored message
///
/// Entries keep the raw source data; display text is produced on demand by
/// the log's active formatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Ingest sequence number, unique within one log
    pub seq: u64,
    /// When the producer recorded the message
    pub timestamp: DateTime<Utc>,
    /// Milliseconds between the log's creation and `timestamp`
    pub relative_millis: i64,
    pub level: SeverityLevel,
    /// Name of the producing thread
    pub thread: String,
    pub target: String,
    pub message: String,
}

impl LogEntry {
    pub(crate) fn from_pending(
        seq: u64,
        started_at: DateTime<Utc>,
        pending: PendingRecord,
    ) -> Self {
        Self {
            seq,
            timestamp: pending.timestamp,
            relative_millis: (pending.timestamp - started_at).num_milliseconds(),
            level: pending.level,
            thread: pending.thread,
            target: pending.record.target,
            message: pending.record.message,
        }
    }
}

/// Name of the calling thread, or its id when unnamed
pub(crate) fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}
