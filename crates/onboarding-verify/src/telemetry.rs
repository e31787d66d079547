//! Structured logging for the service and CLI.
//!
//! Logs go to stderr so `verify --json` can keep stdout clean for the receipt.

use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// `APP_LOG_LEVEL` holds something `EnvFilter` cannot parse.
    #[error("invalid log filter '{value}' in APP_LOG_LEVEL")]
    InvalidFilter {
        value: String,
        #[source]
        source: ParseError,
    },
    /// A global subscriber was already installed.
    #[error("unable to install log subscriber: {0}")]
    Subscriber(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Installs the global subscriber. `RUST_LOG` wins over the configured level,
/// so per-check spans (`vendor_verification`, `verification_check`) can be
/// turned up without touching the service config.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| build_filter(&config.log_level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

fn build_filter(level: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidFilter {
        value: level.to_string(),
        source,
    })
}
