//! Tracing subscriber setup.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global tracing subscriber from the logging configuration.
///
/// `RUST_LOG` overrides the configured level when set. The format defaults
/// to structured JSON; anything else in `logging.format` selects the
/// human-readable output for local development. Calling this when a
/// subscriber is already installed is a no-op, so embedders and tests can
/// initialize freely.
pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let result = match config.format.as_str() {
        "pretty" => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .pretty()
            .try_init(),
        _ => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .with_current_span(true)
            .try_init(),
    };

    if result.is_err() {
        tracing::debug!("Logging already initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging_config(format: &str) -> LoggingConfig {
        LoggingConfig {
            level: "info".to_string(),
            format: format.to_string(),
        }
    }

    #[test]
    fn test_init_logging_tolerates_repeat_initialization() {
        init_logging(&logging_config("json"));
        init_logging(&logging_config("json"));
        init_logging(&logging_config("pretty"));
    }
}
