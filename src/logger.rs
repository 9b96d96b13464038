//! Initializes the global `tracing` subscriber from [`LoggerSettings`].

use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::{Format, LoggerSettings},
    Error, Result,
};

/// Installs the subscriber. `RUST_LOG` takes precedence over the configured
/// level. Output always goes to stderr so that stdout stays free for query
/// reports.
///
/// # Errors
///
/// Fails when the level is not a valid filter directive or a subscriber was
/// already installed.
pub fn init(settings: &LoggerSettings) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .map_err(|err| Error::Message(format!("invalid log level `{}`: {err}", settings.level)))?,
    };

    let builder = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    let installed = match settings.format {
        Format::Compact => builder.compact().try_init(),
        Format::Pretty => builder.pretty().try_init(),
        Format::Json => builder.json().try_init(),
    };
    installed.map_err(|err| Error::Message(format!("cannot install logger: {err}")))
}
