use crate::env::{env_or, LOGSTASH_TIMESTAMP_FORMAT_ENV, LOGSTASH_TYPE_ENV};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::Deserialize;
use std::fmt::Write;

/// Configuration of a [`LogstashFormatter`](crate::formatter::LogstashFormatter).
///
/// Set once at construction and read-only afterwards, so one config can
/// back any number of concurrent `format` calls.
///
/// **Fields**
/// - `type_label`: written to the `type` key of every document when set.
/// - `timestamp_format`: strftime-style format for `@timestamp`. RFC 3339
///   with whole seconds is used when unset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawFormatterConfig")]
pub struct FormatterConfig {
    type_label: Option<String>,
    timestamp_format: Option<String>,
}

impl FormatterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every document with `label`. An empty label unsets it.
    pub fn with_type_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.type_label = (!label.is_empty()).then_some(label);
        self
    }

    /// Use a strftime-style `format` for `@timestamp`.
    ///
    /// **Returns**
    /// - `Ok(..)` with the format applied. An empty format restores the
    ///   RFC 3339 default.
    /// - `Err(ConfigError::InvalidTimestampFormat)` if `format` contains a
    ///   specifier chrono cannot parse, or one it parses but refuses to
    ///   format (e.g. `%#z`).
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Result<Self, ConfigError> {
        let format = format.into();
        if format.is_empty() {
            self.timestamp_format = None;
            return Ok(self);
        }
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::InvalidTimestampFormat(format));
        }
        let sample = DateTime::<FixedOffset>::default();
        if write!(String::new(), "{}", sample.format(&format)).is_err() {
            return Err(ConfigError::InvalidTimestampFormat(format));
        }
        self.timestamp_format = Some(format);
        Ok(self)
    }

    /// Build a config from `LOGSTASH_TYPE` and `LOGSTASH_TIMESTAMP_FORMAT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new()
            .with_type_label(env_or(LOGSTASH_TYPE_ENV, ""))
            .with_timestamp_format(env_or(LOGSTASH_TIMESTAMP_FORMAT_ENV, ""))
    }

    pub fn type_label(&self) -> Option<&str> {
        self.type_label.as_deref()
    }

    pub fn timestamp_format(&self) -> Option<&str> {
        self.timestamp_format.as_deref()
    }

    /// Render `time` the way it appears under `@timestamp`.
    ///
    /// Falls back to RFC 3339 if the configured format cannot render `time`.
    pub fn format_timestamp(&self, time: &DateTime<FixedOffset>) -> String {
        if let Some(format) = &self.timestamp_format {
            let mut rendered = String::new();
            if write!(rendered, "{}", time.format(format)).is_ok() {
                return rendered;
            }
        }
        time.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[derive(Deserialize)]
struct RawFormatterConfig {
    #[serde(default, rename = "type")]
    type_label: String,
    #[serde(default)]
    timestamp_format: String,
}

impl TryFrom<RawFormatterConfig> for FormatterConfig {
    type Error = ConfigError;

    fn try_from(raw: RawFormatterConfig) -> Result<Self, Self::Error> {
        FormatterConfig::new()
            .with_type_label(raw.type_label)
            .with_timestamp_format(raw.timestamp_format)
    }
}

/// Error type returned when building a [`FormatterConfig`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid timestamp format: {0:?}")]
    InvalidTimestampFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_time() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap()
    }

    #[test]
    fn default_is_rfc3339() {
        let config = FormatterConfig::default();
        assert_eq!(config.type_label(), None);
        assert_eq!(config.format_timestamp(&sample_time()), "2024-03-09T14:05:07+02:00");

        let utc: DateTime<FixedOffset> = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap().into();
        assert_eq!(config.format_timestamp(&utc), "2024-03-09T14:05:07Z");
    }

    #[test]
    fn custom_timestamp_format() {
        let config = FormatterConfig::new().with_timestamp_format("%Y/%m/%d %H:%M").unwrap();
        assert_eq!(config.timestamp_format(), Some("%Y/%m/%d %H:%M"));
        assert_eq!(config.format_timestamp(&sample_time()), "2024/03/09 14:05");
    }

    #[test]
    fn empty_values_mean_unset() {
        let config = FormatterConfig::new()
            .with_type_label("app")
            .with_timestamp_format("%s")
            .unwrap()
            .with_type_label("")
            .with_timestamp_format("")
            .unwrap();
        assert_eq!(config, FormatterConfig::default());
    }

    #[test]
    fn rejects_unknown_specifiers() {
        let err = FormatterConfig::new().with_timestamp_format("%Y-%!").unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimestampFormat("%Y-%!".to_string()));
    }

    #[test]
    fn rejects_parse_only_specifiers() {
        let err = FormatterConfig::new().with_timestamp_format("%#z").unwrap_err();
        assert_eq!(err, ConfigError::InvalidTimestampFormat("%#z".to_string()));
    }

    #[test]
    fn unrenderable_format_falls_back_to_rfc3339() {
        let config = FormatterConfig {
            type_label: None,
            timestamp_format: Some("%#z".to_string()),
        };
        assert_eq!(config.format_timestamp(&sample_time()), "2024-03-09T14:05:07+02:00");
    }

    #[test]
    fn reads_environment() {
        std::env::set_var(LOGSTASH_TYPE_ENV, "billing");
        std::env::set_var(LOGSTASH_TIMESTAMP_FORMAT_ENV, "%Y-%m-%d");
        let config = FormatterConfig::from_env();
        std::env::remove_var(LOGSTASH_TYPE_ENV);
        std::env::remove_var(LOGSTASH_TIMESTAMP_FORMAT_ENV);

        let config = config.unwrap();
        assert_eq!(config.type_label(), Some("billing"));
        assert_eq!(config.format_timestamp(&sample_time()), "2024-03-09");

        assert_eq!(FormatterConfig::from_env().unwrap(), FormatterConfig::default());
    }

    #[test]
    fn deserializes_and_validates() {
        let config: FormatterConfig =
            serde_json::from_str(r#"{"type": "app", "timestamp_format": "%Y"}"#).unwrap();
        assert_eq!(config.type_label(), Some("app"));
        assert_eq!(config.timestamp_format(), Some("%Y"));

        let empty: FormatterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, FormatterConfig::default());

        assert!(serde_json::from_str::<FormatterConfig>(r#"{"timestamp_format": "%!"}"#).is_err());
    }
}
