//! Structured JSON log sinks
//!
//! - Structured logs (JSON), one log line = one event
//! - Deterministic key ordering
//! - Explicit severity levels
//! - Synchronous, no buffering
//!
//! Sinks are injected into each service instance rather than reached through
//! a global; the capturing sink makes the emitted stream assertable in tests.

use std::fmt;
use std::io::{self, Write};
use std::sync::Mutex;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues (skipped entries, rejected batch items)
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Destination for structured log events.
///
/// Implementations must be synchronous; callers never buffer.
pub trait LogSink {
    /// Log an event with the given severity and fields
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]);
}

/// A sink that renders each event as one JSON line.
///
/// Fields are output in deterministic order (alphabetical by key), after the
/// fixed `event` and `severity` keys.
pub struct JsonLogger {
    target: Target,
}

enum Target {
    Stdout,
    Stderr,
}

impl JsonLogger {
    /// JSON lines to stdout
    pub fn stdout() -> Self {
        Self {
            target: Target::Stdout,
        }
    }

    /// JSON lines to stderr
    pub fn stderr() -> Self {
        Self {
            target: Target::Stderr,
        }
    }
}

impl LogSink for JsonLogger {
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        match self.target {
            Target::Stdout => write_line(severity, event, fields, &mut io::stdout()),
            Target::Stderr => write_line(severity, event, fields, &mut io::stderr()),
        }
    }
}

/// A sink that discards everything.
pub struct NullSink;

impl LogSink for NullSink {
    fn log(&self, _severity: Severity, _event: &str, _fields: &[(&str, &str)]) {}
}

/// A sink that captures rendered lines for assertions.
#[derive(Default)]
pub struct CaptureSink {
    lines: Mutex<Vec<String>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered lines captured so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Number of captured lines whose event matches `event`
    pub fn count_event(&self, event: &str) -> usize {
        let needle = format!("\"event\":\"{}\"", event);
        self.lines
            .lock()
            .unwrap()
            .iter()
            .filter(|line| line.contains(&needle))
            .count()
    }
}

impl LogSink for CaptureSink {
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let mut buffer = Vec::new();
        write_line(severity, event, fields, &mut buffer);
        let mut line = String::from_utf8(buffer).unwrap_or_default();
        if line.ends_with('\n') {
            line.pop();
        }
        self.lines.lock().unwrap().push(line);
    }
}

/// Renders one event as a single JSON line on the given writer.
fn write_line<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], writer: &mut W) {
    // Build JSON manually to ensure deterministic ordering
    let mut output = String::with_capacity(256);

    output.push('{');

    // Always output event first
    output.push_str("\"event\":\"");
    escape_json_string(&mut output, event);
    output.push('"');

    // Then severity
    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    // Sort fields alphabetically for deterministic output
    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push('}');
    output.push('\n');

    // Write atomically (one syscall)
    let _ = writer.write_all(output.as_bytes());
    let _ = writer.flush();
}

/// Escape special characters for JSON strings
fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}
