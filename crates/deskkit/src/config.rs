//! Engine configuration
//!
//! Every section deserializes with defaults, so a YAML file only needs the
//! keys it overrides:
//!
//! ```yaml
//! timer:
//!   default_seconds: 90
//! stopwatch:
//!   lap_capacity: 50
//! ```

use crate::error::{DeskError, DeskResult};
use crate::timer::MAX_DURATION_SECS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Calculator settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    /// Maximum number of history entries kept (newest first)
    pub history_capacity: usize,
    /// Delay before the Error display clears itself
    pub error_recovery_ms: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            history_capacity: 10,
            error_recovery_ms: 1500,
        }
    }
}

impl CalculatorConfig {
    /// Error recovery delay as a [`Duration`]
    #[must_use]
    pub const fn error_recovery(&self) -> Duration {
        Duration::from_millis(self.error_recovery_ms)
    }
}

/// Countdown timer settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Duration loaded before the user configures one
    pub default_seconds: u64,
    /// Countdown granularity
    pub tick_ms: u64,
    /// Number of display toggles after expiry
    pub flash_count: u32,
    /// Delay between display toggles
    pub flash_interval_ms: u64,
    /// Remaining seconds at or below which the display is flagged
    pub warning_threshold_secs: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_seconds: 5 * 60,
            tick_ms: 1000,
            flash_count: 10,
            flash_interval_ms: 500,
            warning_threshold_secs: 10,
        }
    }
}

/// Stopwatch settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopwatchConfig {
    /// Maximum number of laps kept (newest first)
    pub lap_capacity: usize,
    /// Display refresh cadence
    pub refresh_ms: u64,
}

impl Default for StopwatchConfig {
    fn default() -> Self {
        Self {
            lap_capacity: 20,
            refresh_ms: 10,
        }
    }
}

/// Top-level configuration for every engine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Calculator section
    pub calculator: CalculatorConfig,
    /// Timer section
    pub timer: TimerConfig,
    /// Stopwatch section
    pub stopwatch: StopwatchConfig,
}

impl DeskConfig {
    /// Parse a YAML document and validate it
    pub fn from_yaml_str(yaml: &str) -> DeskResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> DeskResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Loading configuration");
        Self::from_yaml_str(&text)
    }

    /// Render as YAML
    pub fn to_yaml(&self) -> DeskResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Reject values that would stall or disable an engine
    pub fn validate(&self) -> DeskResult<()> {
        if self.calculator.history_capacity == 0 {
            return Err(DeskError::config("calculator.history_capacity must be at least 1"));
        }
        if self.timer.default_seconds > MAX_DURATION_SECS {
            return Err(DeskError::config(format!(
                "timer.default_seconds must be at most {MAX_DURATION_SECS}"
            )));
        }
        if self.timer.tick_ms == 0 {
            return Err(DeskError::config("timer.tick_ms must be positive"));
        }
        if self.timer.flash_interval_ms == 0 {
            return Err(DeskError::config("timer.flash_interval_ms must be positive"));
        }
        if self.stopwatch.lap_capacity == 0 {
            return Err(DeskError::config("stopwatch.lap_capacity must be at least 1"));
        }
        if self.stopwatch.refresh_ms == 0 {
            return Err(DeskError::config("stopwatch.refresh_ms must be positive"));
        }
        Ok(())
    }
}
