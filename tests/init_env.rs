#![cfg(feature = "layer")]

use logstash_formatter::env::LOGSTASH_TIMESTAMP_FORMAT_ENV;
use logstash_formatter::init::{init_tracing_from_env, InitError};
use logstash_formatter::ConfigError;

#[test]
fn invalid_env_timestamp_format_is_a_config_error() {
    std::env::set_var(LOGSTASH_TIMESTAMP_FORMAT_ENV, "%#z");

    let err = init_tracing_from_env().unwrap_err();
    assert!(matches!(
        err,
        InitError::Config(ConfigError::InvalidTimestampFormat(ref format)) if format == "%#z"
    ));

    std::env::remove_var(LOGSTASH_TIMESTAMP_FORMAT_ENV);
}
