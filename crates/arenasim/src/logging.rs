//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{HarnessError, HarnessResult};

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins over everything. Otherwise `-v` selects `debug` and
/// `-vv` or more selects `trace`; with no flag the configured filter is used.
///
/// # Errors
///
/// [`HarnessError::Logging`] if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig, verbosity: u8) -> HarnessResult<()> {
    let directive = match verbosity {
        0 => config.filter.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| HarnessError::Logging(err.to_string()))
}
