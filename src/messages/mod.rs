//! User-visible message log
//!
//! Provides the insertion-ordered message buffer, the producer handle used to
//! feed it from any thread, swappable entry formatters, and a tracing layer
//! that routes the application's own log events into it.

mod entry;
mod format;
mod layer;
mod log;

pub use entry::{LogEntry, LogRecord, DEFAULT_TARGET};
pub use format::{FnFormatter, Formatter, PatternFormatter, SimpleFormatter, TtccFormatter};
pub use layer::MessageLogLayer;
pub use log::{
    CapacityPolicy, EntriesEvicted, EntryInserted, FormatterChanged, LogCleared, MessageLog,
    MessageSink, DEFAULT_CAPACITY,
};
