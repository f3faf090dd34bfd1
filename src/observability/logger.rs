//! Structured event logging
//!
//! One log record per event. The event name goes in the `event` field and
//! caller fields are rendered in deterministic (alphabetical) order in the
//! `fields` field. Records are emitted through `tracing`; installing a
//! subscriber is the embedder's concern.

use std::fmt;

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-record detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Swallowed conditions
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
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

/// Renders fields as `key=value` pairs sorted by key
pub fn render_fields(fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Logs `event` at its default severity
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Logs `event` with extra fields at its default severity
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_error() {
        Severity::Error
    } else {
        Severity::Info
    };
    log(severity, event, fields);
}

/// Logs `event` at an explicit severity
pub fn log(severity: Severity, event: Event, fields: &[(&str, &str)]) {
    let name = event.as_str();
    let fields = render_fields(fields);
    match severity {
        Severity::Trace => tracing::trace!(event = name, fields = %fields),
        Severity::Info => tracing::info!(event = name, fields = %fields),
        Severity::Warn => tracing::warn!(event = name, fields = %fields),
        Severity::Error => tracing::error!(event = name, fields = %fields),
    }
}
