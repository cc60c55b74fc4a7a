pub mod config;
pub mod env;
pub mod event;
pub mod formatter;
pub mod value;

#[cfg(feature = "layer")]
pub mod layer;

#[cfg(feature = "layer")]
pub mod init;

pub use config::{ConfigError, FormatterConfig};
pub use event::{Level, LogEvent};
pub use formatter::{FormatError, Formatter, LogstashFormatter};
pub use value::{CapturedError, FieldValue};
