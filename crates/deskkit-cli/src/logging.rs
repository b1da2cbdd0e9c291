//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Logs go to stderr so they never interleave with the live displays drawn
//! on stdout. `RUST_LOG` overrides the level chosen from `-v`/`-q`.

use crate::error::{CliError, CliResult};
use serde::{Deserialize, Serialize};
use std::io;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    /// Single-line human-readable format
    #[default]
    Compact,
    /// JSON lines for machine parsing
    Json,
}

/// Configuration for logging behavior
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level filter
    pub level: Level,
    /// Output format
    pub format: LogFormat,
    /// Whether to use ANSI colors
    pub with_ansi: bool,
    /// Whether to include the module path
    pub with_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            format: LogFormat::default(),
            with_ansi: true,
            with_target: false,
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` at `level`
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Set output format
    #[must_use]
    pub const fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable ANSI colors
    #[must_use]
    pub const fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }

    /// Enable or disable the module path in output
    #[must_use]
    pub const fn with_target(mut self, enable: bool) -> Self {
        self.with_target = enable;
        self
    }
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(config: &LogConfig) -> CliResult<()> {
    let filter = build_env_filter(config.level);
    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_target(config.with_target),
            )
            .try_init(),
        LogFormat::Compact => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .compact()
                    .without_time()
                    .with_writer(io::stderr)
                    .with_ansi(config.with_ansi)
                    .with_target(config.with_target),
            )
            .try_init(),
    };
    result.map_err(|e| CliError::config(format!("logging already initialised: {e}")))
}

/// Build an `EnvFilter` from `level`, respecting `RUST_LOG`
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!("warn,deskkit={level},deskkit_cli={level}"))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.with_ansi);
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::new(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_ansi(false)
            .with_target(true);
        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.with_ansi);
        assert!(config.with_target);
    }

    #[test]
    fn test_init_twice_fails() {
        let config = LogConfig::new(Level::ERROR).with_ansi(false);
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }
}
