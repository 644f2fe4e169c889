//! Backoff settings for the analysis call.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One initial attempt plus five retries.
const fn default_max_attempts() -> u32 {
    6
}

const fn default_initial_delay_ms() -> u64 {
    1000
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt, in milliseconds.
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Factor applied to the delay after each failed attempt.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound on a single delay, in milliseconds. `0` leaves it uncapped.
    #[serde(default)]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: 0,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    #[must_use]
    pub const fn max_delay(&self) -> Option<Duration> {
        if self.max_delay_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.max_delay_ms))
        }
    }

    /// Check the invariants a backoff policy needs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `max_attempts` is zero or the
    /// multiplier is not a finite number greater than one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !self.backoff_multiplier.is_finite() || self.backoff_multiplier <= 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.backoff_multiplier".into(),
                reason: format!("must be greater than 1, got {}", self.backoff_multiplier),
            });
        }
        Ok(())
    }
}
