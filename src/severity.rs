//! Severity levels
//!
//! The fixed, totally ordered set of verbosity classes shared by the threshold
//! scale and the message log. Ordering runs from OFF (shows nothing) to ALL
//! (shows everything).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Severity of a log record, ordered by verbosity weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SeverityLevel {
    Off,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
    All,
}

/// Error returned when a level name cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity level '{0}'")]
pub struct ParseSeverityError(pub String);

impl SeverityLevel {
    /// Every level, in declaration order
    pub const LEVELS: [SeverityLevel; 8] = [
        SeverityLevel::Off,
        SeverityLevel::Fatal,
        SeverityLevel::Error,
        SeverityLevel::Warn,
        SeverityLevel::Info,
        SeverityLevel::Debug,
        SeverityLevel::Trace,
        SeverityLevel::All,
    ];

    /// Integer weight defining the total order (OFF lowest, ALL highest)
    pub fn weight(&self) -> u8 {
        match self {
            SeverityLevel::Off => 0,
            SeverityLevel::Fatal => 1,
            SeverityLevel::Error => 2,
            SeverityLevel::Warn => 3,
            SeverityLevel::Info => 4,
            SeverityLevel::Debug => 5,
            SeverityLevel::Trace => 6,
            SeverityLevel::All => 7,
        }
    }

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityLevel::Off => "OFF",
            SeverityLevel::Fatal => "FATAL",
            SeverityLevel::Error => "ERROR",
            SeverityLevel::Warn => "WARN",
            SeverityLevel::Info => "INFO",
            SeverityLevel::Debug => "DEBUG",
            SeverityLevel::Trace => "TRACE",
            SeverityLevel::All => "ALL",
        }
    }

    /// Whether a record at this level is shown when the display threshold is `threshold`
    ///
    /// OFF records are never shown; everything else is shown when it is no more
    /// verbose than the threshold.
    pub fn is_visible_at(&self, threshold: SeverityLevel) -> bool {
        *self != SeverityLevel::Off && self.weight() <= threshold.weight()
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for SeverityLevel {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        SeverityLevel::LEVELS
            .iter()
            .copied()
            .find(|level| level.as_str() == upper)
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

impl From<tracing::Level> for SeverityLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => SeverityLevel::Trace,
            tracing::Level::DEBUG => SeverityLevel::Debug,
            tracing::Level::INFO => SeverityLevel::Info,
            tracing::Level::WARN => SeverityLevel::Warn,
            tracing::Level::ERROR => SeverityLevel::Error,
        }
    }
}
