use anyhow::Context;
use configs::{LogFormat, LogSettings};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so command output on stdout stays clean.
pub fn init(log: &LogSettings) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&log.level)
            .with_context(|| format!("invalid log level '{}'", log.level))?,
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match log.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    }
    .map_err(|e| anyhow::anyhow!(e))
    .context("installing tracing subscriber")
}
