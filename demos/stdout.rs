use std::io;

use logstash_formatter::init::init_tracing_from_env;
use tracing::{error, info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Try `LOGSTASH_TYPE=auth LOGSTASH_TIMESTAMP_FORMAT="%s" cargo run --example stdout`.
    init_tracing_from_env()?;

    info!("starting service");

    warn!(level = "from-caller", "[cache miss]");

    let err = io::Error::new(io::ErrorKind::PermissionDenied, "invalid password");
    error!(
        user_id = 42,
        error = &err as &(dyn std::error::Error + 'static),
        "authentication failed"
    );

    Ok(())
}
