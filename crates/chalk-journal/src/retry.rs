//! Exponential backoff for a fallible async operation.
//!
//! [`run`] makes the first attempt immediately and sleeps `initial_delay`,
//! then `initial_delay * multiplier`, and so on, between later attempts. The
//! error of the last attempt is returned unchanged. Nothing is kept between
//! calls: every `run` owns its own attempt counter and delay.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use chalk_config::{ConfigError, RetryConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Option<Duration>,
}

impl RetryPolicy {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `max_attempts` is zero or
    /// `backoff_multiplier` is not a finite number greater than one.
    pub fn new(
        max_attempts: u32,
        initial_delay: Duration,
        backoff_multiplier: f64,
    ) -> Result<Self, ConfigError> {
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }
        if !backoff_multiplier.is_finite() || backoff_multiplier <= 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier".into(),
                reason: format!("must be greater than 1, got {backoff_multiplier}"),
            });
        }
        Ok(Self {
            max_attempts,
            initial_delay,
            backoff_multiplier,
            max_delay: None,
        })
    }

    /// Cap every delay at `max_delay`. `None` leaves the schedule uncapped.
    #[must_use]
    pub const fn with_max_delay(mut self, max_delay: Option<Duration>) -> Self {
        self.max_delay = max_delay;
        self
    }

    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    #[must_use]
    pub const fn backoff_multiplier(&self) -> f64 {
        self.backoff_multiplier
    }

    #[must_use]
    pub const fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// The sleep that precedes `attempt` (1-based). Attempt 1 never waits.
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let mut delay = self.cap(self.initial_delay);
        for _ in 2..attempt {
            delay = self.grow(delay);
        }
        delay
    }

    /// Total time spent sleeping when every attempt fails.
    #[must_use]
    pub fn worst_case_wait(&self) -> Duration {
        (2..=self.max_attempts)
            .map(|attempt| self.delay_before(attempt))
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    fn grow(&self, delay: Duration) -> Duration {
        let next = Duration::try_from_secs_f64(delay.as_secs_f64() * self.backoff_multiplier)
            .unwrap_or(Duration::MAX);
        self.cap(next)
    }

    fn cap(&self, delay: Duration) -> Duration {
        self.max_delay.map_or(delay, |max| delay.min(max))
    }
}

impl Default for RetryPolicy {
    /// Six attempts, one second doubling.
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: None,
        }
    }
}

impl TryFrom<&RetryConfig> for RetryPolicy {
    type Error = ConfigError;

    fn try_from(config: &RetryConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        Ok(Self::new(
            config.max_attempts,
            config.initial_delay(),
            config.backoff_multiplier,
        )?
        .with_max_delay(config.max_delay()))
    }
}

/// Run `operation` until it succeeds or `policy.max_attempts()` attempts have
/// failed.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn run<T, E, F, Fut>(policy: &RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt = 1;
    let mut delay = policy.cap(policy.initial_delay);

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                let remaining = policy.max_attempts.saturating_sub(attempt);
                if remaining == 0 {
                    tracing::debug!(attempts = attempt, %error, "giving up");
                    return Err(error);
                }

                tracing::warn!(attempt, remaining, ?delay, %error, "attempt failed, retrying");
                tokio::time::sleep(delay).await;

                delay = policy.grow(delay);
                attempt += 1;
            }
        }
    }
}
