//! Message log
//!
//! Producers on any thread hand records to a [`MessageSink`]; the records
//! travel over an unbounded channel to the single [`MessageLog`] owner (the
//! UI/render thread), which stores them and dispatches every notification.
//! Nothing else mutates the buffer, so readers on the owning thread never see
//! a half-applied change.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::events::{ListenerId, ListenerRegistry};
use crate::severity::SeverityLevel;

use super::entry::{current_thread_name, LogEntry, LogRecord, PendingRecord};
use super::format::{Formatter, TtccFormatter};

/// Default number of entries kept by a bounded log
pub const DEFAULT_CAPACITY: usize = 5000;

/// Retention policy for stored entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityPolicy {
    /// Keep at most this many entries, dropping the oldest
    Bounded(usize),
    /// Keep everything
    Unbounded,
}

impl CapacityPolicy {
    /// Maximum entries retained, if bounded (never below one)
    pub fn limit(&self) -> Option<usize> {
        match self {
            CapacityPolicy::Bounded(n) => Some((*n).max(1)),
            CapacityPolicy::Unbounded => None,
        }
    }
}

impl Default for CapacityPolicy {
    fn default() -> Self {
        CapacityPolicy::Bounded(DEFAULT_CAPACITY)
    }
}

/// One entry was stored at the tail
#[derive(Debug, Clone)]
pub struct EntryInserted {
    pub entry: Arc<LogEntry>,
    /// Position of the entry after the insert
    pub index: usize,
    /// Oldest entries dropped to make room
    pub evicted: usize,
}

/// The whole log was emptied; redraw from scratch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogCleared {
    pub removed: usize,
}

/// The active formatter changed; re-render every held entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterChanged {
    pub formatter: String,
}

/// Oldest entries were dropped after the capacity shrank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntriesEvicted {
    pub count: usize,
}

/// Producer handle for a [`MessageLog`]
///
/// Cheap to clone and safe to use from any thread. Appends never block and
/// never fail; once the log is dropped they are discarded.
#[derive(Debug, Clone)]
pub struct MessageSink {
    tx: mpsc::UnboundedSender<PendingRecord>,
}

impl MessageSink {
    /// Record a message at `level`
    pub fn append(&self, level: SeverityLevel, record: impl Into<LogRecord>) {
        let pending = PendingRecord {
            level,
            timestamp: Utc::now(),
            thread: current_thread_name(),
            record: record.into(),
        };
        // A closed channel means the log is gone; nobody is left to show it
        let _ = self.tx.send(pending);
    }

    /// Record an informational message for the user
    pub fn add_message(&self, message: impl Into<String>) {
        self.append(SeverityLevel::Info, message.into());
    }

    /// Whether the owning log has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Insertion-ordered, listener-notified buffer of log entries
///
/// Owned by one consumer. Producers use [`sink`](Self::sink) handles; the
/// owner calls [`pump`](Self::pump) or awaits [`next_batch`](Self::next_batch)
/// to move queued records into the buffer.
pub struct MessageLog {
    entries: VecDeque<Arc<LogEntry>>,
    capacity: CapacityPolicy,
    formatter: Box<dyn Formatter>,
    started_at: DateTime<Utc>,
    next_seq: u64,
    tx: mpsc::UnboundedSender<PendingRecord>,
    rx: mpsc::UnboundedReceiver<PendingRecord>,
    inserted: ListenerRegistry<EntryInserted>,
    cleared: ListenerRegistry<LogCleared>,
    formatter_changed: ListenerRegistry<FormatterChanged>,
    evicted: ListenerRegistry<EntriesEvicted>,
}

impl MessageLog {
    /// Create an empty log with the TTCC formatter
    pub fn new(capacity: CapacityPolicy) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let initial = capacity.limit().unwrap_or(0).min(DEFAULT_CAPACITY);
        Self {
            entries: VecDeque::with_capacity(initial),
            capacity,
            formatter: Box::new(TtccFormatter),
            started_at: Utc::now(),
            next_seq: 0,
            tx,
            rx,
            inserted: ListenerRegistry::new(),
            cleared: ListenerRegistry::new(),
            formatter_changed: ListenerRegistry::new(),
            evicted: ListenerRegistry::new(),
        }
    }

    /// New producer handle
    pub fn sink(&self) -> MessageSink {
        MessageSink {
            tx: self.tx.clone(),
        }
    }

    /// When this log was created; relative times are measured from here
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    // ----- ingestion -----

    /// Store every record queued when the call starts, firing one insert event each
    ///
    /// Records that listeners queue while this runs wait for the next pump.
    /// Returns the number of records stored.
    pub fn pump(&mut self) -> usize {
        let queued = self.rx.len();
        let mut stored = 0;
        while stored < queued {
            let Ok(pending) = self.rx.try_recv() else {
                break;
            };
            self.store(pending);
            stored += 1;
        }
        stored
    }

    /// Wait until at least one record is queued, then pump
    pub async fn next_batch(&mut self) -> usize {
        match self.rx.recv().await {
            Some(pending) => {
                self.store(pending);
                1 + self.pump()
            }
            None => 0,
        }
    }

    /// Record a message from the owning thread
    ///
    /// Queued producer records are stored first, so storage order matches
    /// arrival order.
    pub fn append(&mut self, level: SeverityLevel, record: impl Into<LogRecord>) {
        self.pump();
        let pending = PendingRecord {
            level,
            timestamp: Utc::now(),
            thread: current_thread_name(),
            record: record.into(),
        };
        self.store(pending);
    }

    fn store(&mut self, pending: PendingRecord) {
        let entry = Arc::new(LogEntry::from_pending(
            self.next_seq,
            self.started_at,
            pending,
        ));
        self.next_seq += 1;

        self.entries.push_back(Arc::clone(&entry));
        let evicted = self.trim();

        let event = EntryInserted {
            entry,
            index: self.entries.len() - 1,
            evicted,
        };
        self.inserted.dispatch(&event);
    }

    fn trim(&mut self) -> usize {
        let Some(limit) = self.capacity.limit() else {
            return 0;
        };
        let excess = self.entries.len().saturating_sub(limit);
        self.entries.drain(..excess);
        excess
    }

    // ----- mutation -----

    /// Remove every entry and fire a single clear event
    ///
    /// Records already handed to a sink are stored (and announced) first, so
    /// nothing appended before this call survives it.
    pub fn clear(&mut self) {
        self.pump();
        let removed = self.entries.len();
        self.entries.clear();

        debug!(removed, "Message log cleared");
        self.cleared.dispatch(&LogCleared { removed });
    }

    /// Swap the active formatter and fire a single formatter-changed event
    pub fn set_formatter(&mut self, formatter: impl Formatter + 'static) {
        self.formatter = Box::new(formatter);
        let event = FormatterChanged {
            formatter: self.formatter.name().to_string(),
        };

        debug!(formatter = %event.formatter, "Message log formatter changed");
        self.formatter_changed.dispatch(&event);
    }

    /// Change the retention policy, dropping the oldest entries if needed
    pub fn set_capacity(&mut self, capacity: CapacityPolicy) {
        self.capacity = capacity;
        let count = self.trim();
        if count > 0 {
            debug!(count, "Message log trimmed to new capacity");
            self.evicted.dispatch(&EntriesEvicted { count });
        }
    }

    // ----- reading -----

    /// Current entries, oldest first
    ///
    /// The iterator borrows the log, so it cannot observe a mutation; clone it
    /// to walk the same contents again.
    pub fn entries(
        &self,
    ) -> impl ExactSizeIterator<Item = &LogEntry> + DoubleEndedIterator + Clone + '_ {
        self.entries.iter().map(|entry| &**entry)
    }

    /// Entry at `index`, oldest first
    pub fn get(&self, index: usize) -> Option<&Arc<LogEntry>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a clear action has anything to do
    pub fn can_clear(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn capacity(&self) -> CapacityPolicy {
        self.capacity
    }

    /// Name of the active formatter
    pub fn formatter_name(&self) -> &str {
        self.formatter.name()
    }

    /// Display text for `entry` under the active formatter
    pub fn render(&self, entry: &LogEntry) -> String {
        self.formatter.format(entry)
    }

    /// Display text for every held entry, oldest first
    pub fn render_all(&self) -> Vec<String> {
        self.entries().map(|entry| self.render(entry)).collect()
    }

    // ----- subscription -----

    pub fn on_insert<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&EntryInserted) + Send + 'static,
    {
        self.inserted.add(callback)
    }

    pub fn on_clear<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&LogCleared) + Send + 'static,
    {
        self.cleared.add(callback)
    }

    pub fn on_formatter_changed<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&FormatterChanged) + Send + 'static,
    {
        self.formatter_changed.add(callback)
    }

    pub fn on_evicted<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&EntriesEvicted) + Send + 'static,
    {
        self.evicted.add(callback)
    }

    /// Remove a listener of any kind
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.inserted.remove(id)
            || self.cleared.remove(id)
            || self.formatter_changed.remove(id)
            || self.evicted.remove(id)
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(CapacityPolicy::default())
    }
}

impl std::fmt::Debug for MessageLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageLog")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("formatter", &self.formatter.name())
            .finish()
    }
}
