//! Tracing subscriber setup for hosts embedding the ledger.

use tracing_subscriber::EnvFilter;

use crate::config::LedgerConfig;

/// Installs a global `fmt` subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// [`LedgerConfig::log_level`]. With [`LedgerConfig::log_json`] the output is
/// one JSON object per line.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(
    config: &LedgerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
}
