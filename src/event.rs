use crate::value::FieldValue;
use chrono::{DateTime, FixedOffset, Local};
use std::collections::BTreeMap;
use std::fmt;

/// Severity of a [`LogEvent`], most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Panic,
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Level {
    /// Canonical rendering written to the `level` key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Panic => "panic",
            Level::Fatal => "fatal",
            Level::Error => "error",
            Level::Warn => "warning",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Level::Error,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::INFO => Level::Info,
            tracing::Level::DEBUG => Level::Debug,
            _ => Level::Trace,
        }
    }
}

/// One structured log record handed to a [`Formatter`](crate::formatter::Formatter).
///
/// Keys in `data` are caller controlled and may collide with the keys the
/// formatter writes itself (`message`, `level`, `type`, ...).
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub time: DateTime<FixedOffset>,
    pub level: Level,
    pub message: String,
    pub data: BTreeMap<String, FieldValue>,
}

impl LogEvent {
    /// Event stamped with the current local time and no fields.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        LogEvent {
            time: Local::now().into(),
            level,
            message: message.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_time(mut self, time: impl Into<DateTime<FixedOffset>>) -> Self {
        self.time = time.into();
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}
