use crate::config::FormatterConfig;
use crate::event::LogEvent;
use crate::value::FieldValue;
use std::collections::BTreeMap;

pub const VERSION_KEY: &str = "@version";
pub const TIMESTAMP_KEY: &str = "@timestamp";
pub const MESSAGE_KEY: &str = "message";
pub const LEVEL_KEY: &str = "level";
pub const TYPE_KEY: &str = "type";

/// Prefix under which a caller field is kept when its key is overwritten.
pub const RELOCATED_PREFIX: &str = "fields.";

const LOGSTASH_VERSION: i64 = 1;

/// Encoder turning one [`LogEvent`] into the bytes written to a sink.
///
/// Implementations must be pure with respect to the event: the same
/// event may be formatted from several threads at once.
pub trait Formatter: Send + Sync {
    /// Encode a single event.
    ///
    /// **Returns**
    /// - `Ok(bytes)` holding one complete record, ready to be written.
    /// - `Err(..)` if the event could not be encoded. Nothing should be
    ///   written in that case.
    fn format(&self, event: &LogEvent) -> Result<Vec<u8>, FormatError>;
}

/// Error type returned by [`Formatter::format`].
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("failed to marshal fields to JSON: {0}")]
    Serialization(#[source] serde_json::Error),
}

/// Formatter producing Logstash JSON documents, one per line.
///
/// Caller fields are copied as-is (errors become their message), then the
/// reserved keys `@version`, `@timestamp`, `message`, `level` and `type`
/// are written on top. A caller field that already used one of those keys
/// moves to `fields.<key>`.
#[derive(Clone, Debug, Default)]
pub struct LogstashFormatter {
    config: FormatterConfig,
}

impl LogstashFormatter {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Build the document for `event` without serializing it.
    pub fn document(&self, event: &LogEvent) -> BTreeMap<String, FieldValue> {
        let mut fields: BTreeMap<String, FieldValue> = event
            .data
            .iter()
            .map(|(key, value)| (key.clone(), value.stringify_error()))
            .collect();

        set_reserved(&mut fields, VERSION_KEY, FieldValue::Int(LOGSTASH_VERSION));
        set_reserved(
            &mut fields,
            TIMESTAMP_KEY,
            FieldValue::String(self.config.format_timestamp(&event.time)),
        );

        if !event.message.is_empty() {
            set_reserved(&mut fields, MESSAGE_KEY, trim_brackets(&event.message).into());
        }

        set_reserved(&mut fields, LEVEL_KEY, event.level.as_str().into());

        if let Some(label) = self.config.type_label() {
            set_reserved(&mut fields, TYPE_KEY, label.into());
        }

        fields
    }
}

impl Formatter for LogstashFormatter {
    fn format(&self, event: &LogEvent) -> Result<Vec<u8>, FormatError> {
        let fields = self.document(event);
        let mut serialized = serde_json::to_vec(&fields).map_err(FormatError::Serialization)?;
        serialized.push(b'\n');
        Ok(serialized)
    }
}

/// Write `value` under `key`, keeping any previous value at `fields.<key>`.
fn set_reserved(fields: &mut BTreeMap<String, FieldValue>, key: &str, value: FieldValue) {
    if let Some(previous) = fields.insert(key.to_string(), value) {
        fields.insert(format!("{}{}", RELOCATED_PREFIX, key), previous);
    }
}

/// Strip leading and trailing runs of `[` and `]` from a message that
/// starts with `[`.
///
/// This trims a character set, it does not match pairs: `"[a][b]"`
/// becomes `"a][b"` and `"[x"` becomes `"x"`.
fn trim_brackets(message: &str) -> &str {
    if message.starts_with('[') {
        message.trim_matches(|c: char| c == '[' || c == ']')
    } else {
        message
    }
}
