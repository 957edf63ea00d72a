//! # Logger Service
//!
//! This crate implements structured logging for drivers and the device
//! manager.
//!
//! ## Philosophy
//!
//! Logging is explicit and structured, not text-based or printf-style.
//! Drivers never print; they hand [`LogEntry`] values to a [`Logger`], and
//! the host decides where those go.

use core_types::DeviceId;
use std::fmt;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Debug information
    Debug,
    /// Informational messages
    Info,
    /// Warnings
    Warn,
    /// Errors
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// A structured log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Source device (if known)
    pub source: Option<DeviceId>,
    /// Log message
    pub message: String,
    /// Structured fields
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    /// Creates a new log entry
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            source: None,
            message: message.into(),
            fields: Vec::new(),
        }
    }

    /// Sets the source device
    pub fn with_source(mut self, source: DeviceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Adds a field to the log entry
    pub fn with_field(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((key.into(), value.to_string()));
        self
    }

    /// Looks up a field by key
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.level)?;
        if let Some(source) = self.source {
            write!(f, " {}:", source)?;
        }
        write!(f, " {}", self.message)?;
        for (key, value) in &self.fields {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}

/// Destination for log entries
pub trait LogSink: Send + Sync {
    fn record(&self, entry: LogEntry);
}

/// Cheap, cloneable logging handle
///
/// Entries below `min_level` are dropped before they reach the sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    min_level: LogLevel,
    source: Option<DeviceId>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            min_level: LogLevel::Debug,
            source: None,
        }
    }

    /// Logger that discards everything
    pub fn null() -> Self {
        Self::new(Arc::new(NullLog))
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Returns a logger that stamps every entry with `source`
    pub fn for_device(&self, source: DeviceId) -> Self {
        Self {
            sink: Arc::clone(&self.sink),
            min_level: self.min_level,
            source: Some(source),
        }
    }

    pub fn log(&self, mut entry: LogEntry) {
        if entry.level < self.min_level {
            return;
        }
        if entry.source.is_none() {
            entry.source = self.source;
        }
        self.sink.record(entry);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Debug, message));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Info, message));
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Warn, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(LogEntry::new(LogLevel::Error, message));
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.min_level)
            .field("source", &self.source)
            .finish()
    }
}

/// Sink that discards everything
pub struct NullLog;

impl LogSink for NullLog {
    fn record(&self, _entry: LogEntry) {}
}

/// In-memory sink, shared between clones
#[derive(Clone, Default)]
pub struct MemoryLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a logger writing into this sink
    pub fn logger(&self) -> Logger {
        Logger::new(Arc::new(self.clone()))
    }

    /// Snapshot of everything recorded so far
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns whether any entry's message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries().iter().any(|e| e.message.contains(needle))
    }
}

impl LogSink for MemoryLog {
    fn record(&self, entry: LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

/// Sink that writes one line per entry to stderr
pub struct StderrLog;

impl LogSink for StderrLog {
    fn record(&self, entry: LogEntry) {
        let _ = writeln!(std::io::stderr().lock(), "{}", entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn test_log_entry_creation() {
        let entry = LogEntry::new(LogLevel::Info, "test message");
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.message, "test message");
        assert!(entry.source.is_none());
        assert!(entry.fields.is_empty());
    }

    #[test]
    fn test_log_entry_with_fields() {
        let entry = LogEntry::new(LogLevel::Info, "registered")
            .with_field("major", 240)
            .with_field("minor", 0);

        assert_eq!(entry.fields.len(), 2);
        assert_eq!(entry.field("major"), Some("240"));
        assert_eq!(entry.field("missing"), None);
    }

    #[test]
    fn test_display_format() {
        let entry = LogEntry::new(LogLevel::Warn, "open refused").with_field("reason", "busy");
        assert_eq!(entry.to_string(), "[WARN] open refused reason=busy");
    }

    #[test]
    fn test_logger_filters_and_stamps_source() {
        let memory = MemoryLog::new();
        let device = DeviceId::new();
        let logger = memory
            .logger()
            .with_min_level(LogLevel::Info)
            .for_device(device);

        logger.debug("dropped");
        logger.info("kept");

        let entries = memory.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "kept");
        assert_eq!(entries[0].source, Some(device));
    }
}
