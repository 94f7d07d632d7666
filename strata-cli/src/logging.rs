//! Logging initialization for the strata CLI.
//!
//! Configures `tracing-subscriber` from the `[general]` section of
//! `StrataConfig`. Logs go to stderr so the document on stdout stays clean.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use strata_core::config::GeneralConfig;

use crate::error::CliError;

/// Build the level filter: `RUST_LOG` wins, otherwise the configured level.
fn env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level))
}

/// Initialize the global tracing subscriber.
///
/// Must be called once, before any tracing macros are used.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable output (for interactive use)
pub fn init_tracing(config: &GeneralConfig) -> Result<(), CliError> {
    let filter = env_filter(&config.log_level);

    match config.log_format.as_str() {
        "json" => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| {
                CliError::Command(format!("failed to initialize JSON tracing subscriber: {e}"))
            }),
        "pretty" => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| {
                CliError::Command(format!("failed to initialize pretty tracing subscriber: {e}"))
            }),
        other => Err(CliError::Config(format!(
            "unknown log format '{other}', expected 'json' or 'pretty'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_is_config_error() {
        let config = GeneralConfig {
            log_level: "info".to_owned(),
            log_format: "xml".to_owned(),
        };
        let err = init_tracing(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
