//! Entry formatters
//!
//! A formatter turns a stored [`LogEntry`] into display text. Formatters are
//! pure: the same entry always renders to the same text.

use std::fmt::Write;

use chrono::SecondsFormat;

use super::entry::LogEntry;

/// Renders entries to display text
pub trait Formatter: Send {
    /// Short name, reported when the formatter is swapped in
    fn name(&self) -> &str;

    /// Render one entry
    fn format(&self, entry: &LogEntry) -> String;
}

/// `<relative millis> [<thread>] <LEVEL> <target> - <message>`
#[derive(Debug, Clone, Copy, Default)]
pub struct TtccFormatter;

impl Formatter for TtccFormatter {
    fn name(&self) -> &str {
        "ttcc"
    }

    fn format(&self, entry: &LogEntry) -> String {
        format!(
            "{} [{}] {} {} - {}",
            entry.relative_millis, entry.thread, entry.level, entry.target, entry.message
        )
    }
}

/// `<LEVEL> - <message>`
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleFormatter;

impl Formatter for SimpleFormatter {
    fn name(&self) -> &str {
        "simple"
    }

    fn format(&self, entry: &LogEntry) -> String {
        format!("{} - {}", entry.level, entry.message)
    }
}

/// Wraps a closure as a named formatter
pub struct FnFormatter<F> {
    name: String,
    func: F,
}

impl<F> FnFormatter<F>
where
    F: Fn(&LogEntry) -> String + Send,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> Formatter for FnFormatter<F>
where
    F: Fn(&LogEntry) -> String + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn format(&self, entry: &LogEntry) -> String {
        (self.func)(entry)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Date,
    Relative,
    Thread,
    Level,
    Target,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: Field,
        min_width: usize,
        left_align: bool,
    },
}

/// Conversion-pattern formatter
///
/// Supported conversions: `%d` RFC 3339 timestamp (UTC), `%r` relative millis, `%t`
/// thread, `%p` level, `%c` target, `%m` message, `%n` newline and `%%`.
/// A conversion may carry a minimum width, e.g. `%-5p` or `%10c`. Unknown
/// conversions are emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFormatter {
    pattern: String,
    segments: Vec<Segment>,
}

impl PatternFormatter {
    /// Parse `pattern`
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        let segments = parse_pattern(&pattern);
        Self { pattern, segments }
    }

    /// The pattern this formatter was built from
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Formatter for PatternFormatter {
    fn name(&self) -> &str {
        &self.pattern
    }

    fn format(&self, entry: &LogEntry) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field {
                    field,
                    min_width,
                    left_align,
                } => {
                    let value = match field {
                        Field::Date => entry
                            .timestamp
                            .to_rfc3339_opts(SecondsFormat::Millis, true),
                        Field::Relative => entry.relative_millis.to_string(),
                        Field::Thread => entry.thread.clone(),
                        Field::Level => entry.level.as_str().to_string(),
                        Field::Target => entry.target.clone(),
                        Field::Message => entry.message.clone(),
                    };
                    let width = *min_width;
                    // Writing to a String cannot fail
                    let _ = if *left_align {
                        write!(out, "{:<width$}", value)
                    } else {
                        write!(out, "{:>width$}", value)
                    };
                }
            }
        }
        out
    }
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        // Collect the spec so an unknown conversion can be emitted as written
        let mut raw = String::from("%");
        let left_align = chars.next_if_eq(&'-').is_some();
        if left_align {
            raw.push('-');
        }
        let mut digits = String::new();
        while let Some(d) = chars.next_if(|ch| ch.is_ascii_digit()) {
            digits.push(d);
        }
        raw.push_str(&digits);
        let min_width = digits.parse().unwrap_or(0);

        let field = match chars.next() {
            Some('%') if raw == "%" => {
                literal.push('%');
                continue;
            }
            Some('n') if raw == "%" => {
                literal.push('\n');
                continue;
            }
            Some('d') => Field::Date,
            Some('r') => Field::Relative,
            Some('t') => Field::Thread,
            Some('p') => Field::Level,
            Some('c') => Field::Target,
            Some('m') => Field::Message,
            Some(other) => {
                literal.push_str(&raw);
                literal.push(other);
                continue;
            }
            None => {
                literal.push_str(&raw);
                break;
            }
        };

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Field {
            field,
            min_width,
            left_align,
        });
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::SeverityLevel;
    use chrono::{TimeZone, Utc};

    fn sample_entry() -> LogEntry {
        LogEntry {
            seq: 0,
            timestamp: Utc.with_ymd_and_hms(2026, 1, 21, 14, 30, 45).unwrap(),
            relative_millis: 176,
            level: SeverityLevel::Info,
            thread: "main".to_string(),
            target: "app::prime".to_string(),
            message: "Located nearest prime: 113".to_string(),
        }
    }

    #[test]
    fn test_ttcc_format() {
        assert_eq!(
            TtccFormatter.format(&sample_entry()),
            "176 [main] INFO app::prime - Located nearest prime: 113"
        );
    }

    #[test]
    fn test_simple_format() {
        assert_eq!(
            SimpleFormatter.format(&sample_entry()),
            "INFO - Located nearest prime: 113"
        );
    }

    #[test]
    fn test_fn_formatter() {
        let formatter = FnFormatter::new("upper", |e: &LogEntry| e.message.to_uppercase());
        assert_eq!(formatter.name(), "upper");
        assert_eq!(formatter.format(&sample_entry()), "LOCATED NEAREST PRIME: 113");
    }

    #[test]
    fn test_pattern_all_conversions() {
        let formatter = PatternFormatter::new("%d %r [%t] %p %c: %m%n");
        assert_eq!(
            formatter.format(&sample_entry()),
            "2026-01-21T14:30:45.000Z 176 [main] INFO app::prime: Located nearest prime: 113\n"
        );
    }

    #[test]
    fn test_pattern_date_is_rfc3339() {
        let rendered = PatternFormatter::new("%d").format(&sample_entry());
        let parsed = chrono::DateTime::parse_from_rfc3339(&rendered).unwrap();
        assert_eq!(parsed, sample_entry().timestamp);
    }

    #[test]
    fn test_pattern_width_and_alignment() {
        let formatter = PatternFormatter::new("[%-5p][%6r]");
        assert_eq!(formatter.format(&sample_entry()), "[INFO ][   176]");
    }

    #[test]
    fn test_pattern_literals_and_unknown_conversions() {
        let formatter = PatternFormatter::new("100%% %x %-3q %");
        assert_eq!(formatter.format(&sample_entry()), "100% %x %-3q %");
    }

    #[test]
    fn test_pattern_is_pure() {
        let formatter = PatternFormatter::new("%p %m");
        let entry = sample_entry();
        assert_eq!(formatter.format(&entry), formatter.format(&entry));
        assert_eq!(formatter.pattern(), "%p %m");
    }
}
