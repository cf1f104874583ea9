//! Application context
//!
//! The composition root owns one instance of each core component and hands
//! out references; nothing is reached through global state. The console run
//! loop stands in for a real view: it drains the message log on its own task
//! and prints every entry that passes the threshold.

use std::io::BufRead;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;
use crate::messages::{LogEntry, LogRecord, MessageLog, MessageSink};
use crate::preferences::{PreferenceName, PreferenceStore};
use crate::severity::SeverityLevel;
use crate::threshold::{ThresholdControl, ThresholdScale};

/// Target for lines read from standard input
const STDIN_TARGET: &str = "stdin";

/// Core state shared by every view
pub struct App {
    config: Config,
    preferences: PreferenceStore,
    threshold: ThresholdControl,
    messages: MessageLog,
    /// Entries announced by the log but not yet shown
    pending: Arc<Mutex<Vec<Arc<LogEntry>>>>,
}

impl App {
    /// Build the context from configuration
    pub fn new(config: Config) -> Self {
        let mut messages = MessageLog::new(config.message_log.capacity);

        let pending = Arc::new(Mutex::new(Vec::new()));
        let queue = Arc::clone(&pending);
        messages.on_insert(move |event| {
            if let Ok(mut queue) = queue.lock() {
                queue.push(Arc::clone(&event.entry));
            }
        });

        let mut preferences = PreferenceStore::new();
        preferences.subscribe(Some(PreferenceName::CyclicBufferSize), |change| {
            info!(old = %change.old, new = %change.new, "Buffer size preference changed");
        });

        Self {
            config,
            preferences,
            threshold: ThresholdControl::new(ThresholdScale::new()),
            messages,
            pending,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Producer handle for the message log
    pub fn sink(&self) -> MessageSink {
        self.messages.sink()
    }

    pub fn preferences(&self) -> &PreferenceStore {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut PreferenceStore {
        &mut self.preferences
    }

    pub fn threshold(&self) -> &ThresholdControl {
        &self.threshold
    }

    pub fn threshold_mut(&mut self) -> &mut ThresholdControl {
        &mut self.threshold
    }

    pub fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut MessageLog {
        &mut self.messages
    }

    /// Rendered text of entries announced since the last call that pass the threshold
    pub fn take_visible(&self) -> Vec<String> {
        let announced = match self.pending.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => return Vec::new(),
        };

        announced
            .iter()
            .filter(|entry| self.threshold.admits(entry.level))
            .map(|entry| self.messages.render(entry))
            .collect()
    }

    /// Print entries as they arrive until Ctrl-C
    ///
    /// Lines on standard input are ingested as messages; a leading level name
    /// (e.g. `WARN disk low`) sets the level, otherwise INFO is used.
    pub async fn run(&mut self) -> Result<()> {
        spawn_stdin_reader(self.sink());

        info!(
            threshold = %self.threshold.selected_level(),
            capacity = ?self.messages.capacity(),
            "Message log ready"
        );

        loop {
            tokio::select! {
                _ = self.messages.next_batch() => {
                    for line in self.take_visible() {
                        println!("{}", line);
                    }
                }
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        warn!("Failed to listen for Ctrl-C: {}", e);
                    }
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Split an input line into a level and message
pub fn parse_input_line(line: &str) -> (SeverityLevel, &str) {
    let trimmed = line.trim();
    if let Some((first, rest)) = trimmed.split_once(char::is_whitespace) {
        if let Ok(level) = first.parse::<SeverityLevel>() {
            return (level, rest.trim_start());
        }
    }
    (SeverityLevel::Info, trimmed)
}

fn spawn_stdin_reader(sink: MessageSink) {
    let spawned = std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() {
                    continue;
                }
                let (level, message) = parse_input_line(&line);
                sink.append(level, LogRecord::new(STDIN_TARGET, message));
            }
        });

    if let Err(e) = spawned {
        warn!("Failed to start stdin reader: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_line_with_level() {
        assert_eq!(
            parse_input_line("WARN  disk almost full"),
            (SeverityLevel::Warn, "disk almost full")
        );
        assert_eq!(
            parse_input_line("debug cache miss"),
            (SeverityLevel::Debug, "cache miss")
        );
    }

    #[test]
    fn test_parse_input_line_without_level() {
        assert_eq!(
            parse_input_line("  server started  "),
            (SeverityLevel::Info, "server started")
        );
        assert_eq!(parse_input_line("ERROR"), (SeverityLevel::Info, "ERROR"));
    }

    #[test]
    fn test_take_visible_applies_threshold() {
        let mut app = App::new(Config::default());
        app.threshold_mut().set_chosen_level(SeverityLevel::Warn);

        let sink = app.sink();
        sink.append(SeverityLevel::Info, "routine");
        sink.append(SeverityLevel::Error, "broken");
        app.messages_mut().pump();

        let visible = app.take_visible();
        assert_eq!(visible.len(), 1);
        assert!(visible[0].ends_with("ERROR logdeck - broken"));
        assert!(app.take_visible().is_empty());
        assert_eq!(app.messages().len(), 2);
    }

    #[test]
    fn test_capacity_comes_from_config() {
        let mut config = Config::default();
        config.message_log.capacity = crate::messages::CapacityPolicy::Bounded(2);
        let mut app = App::new(config);

        for i in 0..3 {
            app.messages_mut()
                .append(SeverityLevel::Info, format!("msg {}", i));
        }
        assert_eq!(app.messages().len(), 2);
        assert_eq!(app.take_visible().len(), 3);
    }

    #[test]
    fn test_preferences_are_owned_by_context() {
        let mut app = App::new(Config::default());
        app.preferences_mut().set_cyclic_buffer_size(100);
        assert_eq!(app.preferences().cyclic_buffer_size(), 100);
    }
}
