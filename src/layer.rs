use crate::event::{Level, LogEvent};
use crate::formatter::Formatter;
use crate::value::{CapturedError, FieldValue};
use chrono::Local;
use std::collections::BTreeMap;
use std::error::Error;
use std::io::{self, Write};
use std::sync::{Arc, atomic::{AtomicU64, Ordering}};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns every event into a [`LogEvent`],
/// encodes it with a [`Formatter`] and writes the bytes to a writer.
///
/// The layer is synchronous: each event is written from the thread that
/// emitted it. Events that fail to encode or write are counted in
/// `dropped_events` and reported on stderr.
pub struct LogstashLayer<W> {
    formatter: Arc<dyn Formatter>,
    make_writer: W,
    /// Total events seen by the layer.
    pub total_events: Arc<AtomicU64>,
    /// Encoded and written successfully.
    pub written_events: Arc<AtomicU64>,
    /// Dropped because encoding or writing failed.
    pub dropped_events: Arc<AtomicU64>,
}

impl<W> LogstashLayer<W>
where
    W: for<'a> MakeWriter<'a> + 'static,
{
    /// Create a layer writing through `make_writer`.
    ///
    /// **Parameters**
    /// - `formatter`: encoder applied to every event.
    /// - `make_writer`: destination, e.g. `std::io::stdout` or a file
    ///   appender.
    pub fn new(formatter: Arc<dyn Formatter>, make_writer: W) -> Self {
        Self {
            formatter,
            make_writer,
            total_events: Arc::new(AtomicU64::new(0)),
            written_events: Arc::new(AtomicU64::new(0)),
            dropped_events: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl LogstashLayer<fn() -> io::Stdout> {
    /// Layer writing one document per line to stdout.
    pub fn stdout(formatter: Arc<dyn Formatter>) -> Self {
        Self::new(formatter, io::stdout)
    }
}

impl<S, W> Layer<S> for LogstashLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'a> MakeWriter<'a> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let mut data = BTreeMap::new();
        let mut message = String::new();

        let mut visitor = FieldVisitor { fields: &mut data, message: &mut message };
        event.record(&mut visitor);

        let meta = event.metadata();
        let record = LogEvent {
            time: Local::now().into(),
            level: Level::from(*meta.level()),
            message,
            data,
        };

        let bytes = match self.formatter.format(&record) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.dropped_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("dropping log event: {}", e);
                return;
            }
        };

        let mut writer = self.make_writer.make_writer_for(meta);
        match writer.write_all(&bytes) {
            Ok(()) => {
                self.written_events.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.dropped_events.fetch_add(1, Ordering::Relaxed);
                eprintln!("error writing log event: {}", e);
            }
        }
    }
}

/// Collects `tracing` fields into [`FieldValue`]s. The `message` field
/// becomes the event message instead of a data entry.
pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, FieldValue>,
    pub message: &'a mut String,
}

impl<'a> FieldVisitor<'a> {
    fn insert(&mut self, field: &Field, value: FieldValue) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = value.to_string();
        } else {
            self.insert(field, value.into());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.into());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn Error + 'static)) {
        self.insert(field, FieldValue::error(CapturedError::from_error(value)));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = format!("{:?}", value);
        } else {
            self.insert(field, FieldValue::String(format!("{:?}", value)));
        }
    }
}
