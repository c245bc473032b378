//! Tracing layer that turns events into [LogEntry] values and hands them to sinks.

use std::collections::BTreeMap;
use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};

use crate::config::LogSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => LogLevel::Error,
            tracing::Level::WARN => LogLevel::Warn,
            tracing::Level::INFO => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        })
    }
}

/// One structured log event.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    /// Event target, e.g. `barnstormer_config::loader`
    pub namespace: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
    /// RFC 3339
    pub timestamp: String,
}

impl LogEntry {
    /// "[LEVEL] namespace: message key=value ..."
    pub fn render(&self) -> String {
        let mut line = format!("[{}] {}: {}", self.level, self.namespace, self.message);
        for (key, value) in &self.fields {
            write!(line, " {key}={value}").ok();
        }
        line
    }
}

#[derive(Default)]
struct EntryVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl Visit for EntryVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{value:?}"));
        }
    }
}

/// Layer that sends each event to every sink. Sinks must not block.
pub(crate) fn log_layer(sinks: Vec<LogSink>) -> Option<SinkLayer> {
    if sinks.is_empty() {
        None
    } else {
        Some(SinkLayer { sinks })
    }
}

#[derive(Clone)]
pub(crate) struct SinkLayer {
    sinks: Vec<LogSink>,
}

impl<S> Layer<S> for SinkLayer
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let mut visitor = EntryVisitor::default();
        event.record(&mut visitor);
        let entry = LogEntry {
            level: LogLevel::from(*metadata.level()),
            namespace: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };
        for sink in &self.sinks {
            sink(&entry);
        }
    }
}
