//! # Logging Setup
//!
//! Structured logging initialization on top of `tracing-subscriber`.
//!
//! The filter directive comes from the logging configuration, with the
//! `RUST_LOG` environment variable taking precedence when set.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{BridgeError, Result};

/// Install the global subscriber. Call once at startup.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| BridgeError::Config(format!("invalid log filter {:?}: {e}", config.level)))?;

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if config.json_format {
        subscriber
            .json()
            .try_init()
            .map_err(|e| BridgeError::Config(format!("failed to install subscriber: {e}")))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| BridgeError::Config(format!("failed to install subscriber: {e}")))?;
    }

    Ok(())
}
