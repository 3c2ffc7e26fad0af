//! Log subscriber setup
//!
//! The library only emits `tracing` events. Binaries call [`init_logging`]
//! once at startup to print them.
//!
//! ```rust,ignore
//! use thimble_core::logging::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development())?;
//! ```

use crate::{Error, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directive, e.g. `info` or `thimble_core=debug`
    pub level: String,
    /// One JSON object per line instead of human-readable text
    pub json_format: bool,
    /// Include the module path of each event
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_target: true,
        }
    }
}

impl LogConfig {
    /// Debug level, the equivalent of running with `debug=True`
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Info level JSON lines
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            include_target: true,
        }
    }
}

/// Parse a filter directive
pub fn create_env_filter(filter: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| Error::LoggingInit(format!("invalid log level: {e}")))
}

/// Install the global subscriber
///
/// Fails if the filter is invalid or a subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let filter = create_env_filter(&config.level)?;

    let layer = if config.json_format {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|e| Error::LoggingInit(e.to_string()))
}
