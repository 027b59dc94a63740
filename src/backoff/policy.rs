use std::time::Duration;

use crate::error::ExtractError;

use super::schedule::DelaySchedule;

const DEFAULT_MAX_ATTEMPTS: usize = 4;
const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
const DEFAULT_MULTIPLIER: f64 = 2.0;
const DEFAULT_MAX_DELAY_MS: u64 = 2_000;

/// Retry and backoff settings for one class of outbound calls.
///
/// Values are checked once in [`BackoffPolicy::new`] and never change
/// afterwards, so a policy can be shared read-only between requests.
#[derive(Clone, Debug, PartialEq)]
pub struct BackoffPolicy {
    max_attempts: usize,
    initial_delay: Duration,
    multiplier: f64,
    max_delay: Duration,
    jitter: bool,
}

impl BackoffPolicy {
    /// Creates a validated policy.
    ///
    /// `max_attempts` counts the first attempt, so `1` disables retries.
    pub fn new(
        max_attempts: usize,
        initial_delay: Duration,
        multiplier: f64,
        max_delay: Duration,
        jitter: bool,
    ) -> Result<Self, ExtractError> {
        if max_attempts == 0 {
            return Err(ExtractError::Config(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ExtractError::Config(format!(
                "multiplier must be a finite value >= 1.0 (got {multiplier})"
            )));
        }
        if initial_delay > max_delay {
            return Err(ExtractError::Config(format!(
                "initial delay {initial_delay:?} exceeds max delay {max_delay:?}"
            )));
        }
        Ok(Self {
            max_attempts,
            initial_delay,
            multiplier,
            max_delay,
            jitter,
        })
    }

    /// Creates a default policy with conservative values.
    pub fn defaults() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            multiplier: DEFAULT_MULTIPLIER,
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
            jitter: true,
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    pub fn jitter(&self) -> bool {
        self.jitter
    }

    /// Fresh delay schedule starting at the initial delay.
    pub fn schedule(&self) -> DelaySchedule {
        DelaySchedule::new(self.initial_delay, self.multiplier, self.max_delay)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::defaults()
    }
}
