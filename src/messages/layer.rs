//! Tracing bridge
//!
//! A `tracing_subscriber` layer that turns the process's own log events into
//! message log records, making the message log the user-visible end of the
//! application's logging.

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::severity::SeverityLevel;

use super::entry::LogRecord;
use super::log::MessageSink;

/// Module whose own events are never fed back into the message log
const FEEDBACK_TARGET: &str = "logdeck::messages::log";

fn is_feedback(target: &str) -> bool {
    target
        .strip_prefix(FEEDBACK_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Forwards tracing events at or above a threshold into a [`MessageSink`]
#[derive(Debug, Clone)]
pub struct MessageLogLayer {
    sink: MessageSink,
    threshold: SeverityLevel,
}

impl MessageLogLayer {
    /// Forward events no more verbose than `threshold`
    pub fn new(sink: MessageSink, threshold: SeverityLevel) -> Self {
        Self { sink, threshold }
    }

    pub fn threshold(&self) -> SeverityLevel {
        self.threshold
    }
}

impl<S: Subscriber> Layer<S> for MessageLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_feedback(metadata.target()) {
            return;
        }

        let level = SeverityLevel::from(*metadata.level());
        if !level.is_visible_at(self.threshold) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.sink
            .append(level, LogRecord::new(metadata.target(), visitor.finish()));
    }
}

/// Collects the `message` field plus any other fields as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }

    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{}", value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
