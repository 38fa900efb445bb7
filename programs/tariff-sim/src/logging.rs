//! Tracing setup for the runner
//!
//! Logs go to stderr so stdout carries only the report.

use tracing_subscriber::EnvFilter;

use crate::error::{CliError, Result};

/// Filter variable, e.g. `TARIFF_SIM_LOG=tariff_game=debug`
pub const LOG_ENV: &str = "TARIFF_SIM_LOG";

/// Install the global subscriber.
///
/// `TARIFF_SIM_LOG` wins when set; otherwise `info` with `verbose`, `warn`
/// without.
pub fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| CliError::Logging(e.to_string()))
}
