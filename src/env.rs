//! Environment variable names read by [`FormatterConfig::from_env`].
//!
//! These are purely helpers; the formatter itself never touches the
//! environment.
//!
//! [`FormatterConfig::from_env`]: crate::config::FormatterConfig::from_env

/// Value written to the `type` key of every document. Unset or empty
/// leaves the key out.
pub const LOGSTASH_TYPE_ENV: &str = "LOGSTASH_TYPE";

/// strftime-style timestamp format. Unset or empty means RFC 3339.
pub const LOGSTASH_TIMESTAMP_FORMAT_ENV: &str = "LOGSTASH_TIMESTAMP_FORMAT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
