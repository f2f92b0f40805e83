//! Tracing setup: subscriber initialization, span macros, and event helpers.

pub mod events;
pub mod spans;

use brokerscope_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Environment variable consulted before the configured log level.
pub const LOG_ENV_VAR: &str = "BROKERSCOPE_LOG";

/// Install the global subscriber.
///
/// `BROKERSCOPE_LOG` wins over `config.log_level`. Returns `false` when a
/// subscriber was already installed, so repeated calls are harmless.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if config.json_logs {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Initialize tracing with an explicit filter string (tests, embedding).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}
