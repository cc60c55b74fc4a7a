use crate::config::{ConfigError, FormatterConfig};
use crate::formatter::LogstashFormatter;
use crate::layer::LogstashLayer;
use std::sync::Arc;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Error type returned by the `init_tracing*` helpers.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to install global subscriber: {0}")]
    SetGlobalDefault(#[from] SetGlobalDefaultError),
}

/// Install a [`Registry`] with a [`LogstashLayer`] writing through
/// `make_writer` as the global default subscriber.
///
/// **Parameters**
/// - `config`: [`FormatterConfig`] for the Logstash documents.
/// - `make_writer`: destination of the encoded lines.
///
/// **Returns**
/// - `Err(InitError::SetGlobalDefault)` if a global subscriber was
///   already installed.
pub fn init_tracing_with_writer<W>(config: FormatterConfig, make_writer: W) -> Result<(), InitError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let formatter = Arc::new(LogstashFormatter::new(config));
    let layer = LogstashLayer::new(formatter, make_writer);
    let subscriber = Registry::default().with(layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install the layer writing to stdout.
pub fn init_tracing(config: FormatterConfig) -> Result<(), InitError> {
    init_tracing_with_writer(config, std::io::stdout)
}

/// Install the layer writing to stdout, configured from
/// `LOGSTASH_TYPE` / `LOGSTASH_TIMESTAMP_FORMAT`.
///
/// This is the recommended entrypoint for typical services.
pub fn init_tracing_from_env() -> Result<(), InitError> {
    init_tracing(FormatterConfig::from_env()?)
}
