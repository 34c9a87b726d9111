//! Retry policy helpers.

use rand::Rng;
use std::time::Duration;
use wikijs_core::WikiError;

/// Retry decision result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after a delay.
    RetryAfter(Duration),
    /// Do not retry.
    DoNotRetry,
}

/// Exponential backoff with multiplicative jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry, before jitter.
    pub base_delay: Duration,
    /// Upper bound on any single delay.
    pub max_delay: Duration,
    /// Jitter spread around 1.0; `0.2` draws factors from `[0.8, 1.2]`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_millis(2000),
            jitter: 0.2,
        }
    }
}

impl RetryPolicy {
    /// A policy with no waiting between attempts.
    pub fn immediate() -> Self {
        Self {
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: 0.0,
        }
    }

    /// Decide whether to retry after `attempt` (0-indexed) failed with `error`.
    pub fn decide(&self, error: &WikiError, attempt: u32, max_retries: u32) -> RetryDecision {
        if attempt >= max_retries || !error.is_retryable() {
            return RetryDecision::DoNotRetry;
        }
        RetryDecision::RetryAfter(self.delay(attempt))
    }

    /// Delay before the retry that follows `attempt`, with a random jitter factor.
    pub fn delay(&self, attempt: u32) -> Duration {
        let spread = self.jitter.abs().min(1.0);
        let factor = rand::rng().random_range((1.0 - spread)..=(1.0 + spread));
        self.delay_with_factor(attempt, factor)
    }

    /// Delay before the retry that follows `attempt`, with an explicit jitter factor.
    pub fn delay_with_factor(&self, attempt: u32, factor: f64) -> Duration {
        let base_ms = self.base_delay.as_secs_f64() * 1000.0;
        let max_ms = self.max_delay.as_secs_f64() * 1000.0;
        let exp = 2_f64.powi(attempt.min(30) as i32);
        let delay_ms = (base_ms * exp * factor).clamp(0.0, max_ms);
        Duration::from_millis(delay_ms.round() as u64)
    }
}
