//! Logging bootstrap
//!
//! Installs a global `tracing` subscriber. The `CADENCE_LOG` environment
//! variable takes precedence over the configured level.

use tracing_subscriber::EnvFilter;

use crate::LogConfig;

/// Environment variable holding the filter directive
pub const LOG_ENV: &str = "CADENCE_LOG";

/// Build the filter for a config, honoring `CADENCE_LOG`
pub fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber
///
/// Returns `false` if a subscriber was already installed; the existing one
/// is kept.
pub fn init(config: &LogConfig) -> bool {
    let builder = tracing_subscriber::fmt().with_env_filter(filter(config));
    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.is_ok()
}
