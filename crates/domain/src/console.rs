//! In-app console log sink
//!
//! An append-only bounded ring of diagnostic events emitted by the
//! dispatcher. This is the user-visible console, separate from the
//! `tracing` diagnostics the relay emits.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::id::generate_id;

/// Maximum number of console entries retained.
pub const MAX_ENTRIES: usize = 100;

/// Category of a console entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    /// General information
    Info,
    /// A pipeline failure
    Error,
    /// An outgoing request
    Request,
    /// A received response
    Response,
}

/// A single console entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleLog {
    /// Unique identifier
    pub id: String,
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Entry category
    #[serde(rename = "type")]
    pub kind: LogKind,
    /// Human-readable message
    pub message: String,
    /// Optional structured details (headers, status, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ConsoleLog {
    /// Creates a new entry timestamped now.
    #[must_use]
    pub fn new(kind: LogKind, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            id: generate_id(),
            timestamp: Utc::now(),
            kind,
            message: message.into(),
            details,
        }
    }
}

/// Bounded ring of console entries (newest first).
///
/// The cap is enforced on every insert; the oldest entry is evicted
/// silently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogSink {
    entries: VecDeque<ConsoleLog>,
}

impl LogSink {
    /// Creates an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Appends an entry at the front.
    pub fn push(&mut self, entry: ConsoleLog) {
        self.entries.push_front(entry);
        while self.entries.len() > MAX_ENTRIES {
            self.entries.pop_back();
        }
    }

    /// Convenience for appending a new entry.
    pub fn append(&mut self, kind: LogKind, message: impl Into<String>, details: Option<Value>) {
        self.push(ConsoleLog::new(kind, message, details));
    }

    /// Returns all entries (newest first).
    #[must_use]
    pub fn entries(&self) -> &VecDeque<ConsoleLog> {
        &self.entries
    }

    /// Clears all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the sink is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bounded_at_100() {
        let mut sink = LogSink::new();
        for i in 0..150 {
            sink.append(LogKind::Info, format!("event {i}"), None);
        }

        assert_eq!(sink.len(), MAX_ENTRIES);
        // Newest first; the retained 100 are the most recent 100
        assert_eq!(sink.entries()[0].message, "event 149");
        assert_eq!(sink.entries()[99].message, "event 50");
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let entry = ConsoleLog::new(LogKind::Request, "Sending GET", None);
        let json = serde_json::to_value(&entry).unwrap_or_default();
        assert_eq!(json["type"], "request");
    }

    #[test]
    fn test_clear() {
        let mut sink = LogSink::new();
        sink.append(LogKind::Error, "boom", None);
        sink.clear();
        assert!(sink.is_empty());
    }
}
