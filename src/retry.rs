//! Back-off policy for rate-limited requests.

use std::time::Duration;

use rand::Rng;

/// Longest single wait between attempts.
const MAX_DELAY: Duration = Duration::from_secs(60);

/// How often, and how patiently, a rate-limited request is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Whether another attempt is allowed after `retry` retries have been made.
    pub fn should_retry(&self, retry: u32) -> bool {
        retry < self.max_retries
    }

    /// Delay before retry number `retry` (1-based).
    ///
    /// Exponential in `base_delay` with up to 25% random jitter. A server
    /// supplied hint acts as a floor. The result never exceeds one minute.
    pub fn delay_for(&self, retry: u32, hint: Option<Duration>) -> Duration {
        let exp = self
            .base_delay
            .saturating_mul(1u32 << retry.saturating_sub(1).min(16));
        let jitter_ms = if exp.is_zero() {
            0
        } else {
            let max_jitter = (exp.as_millis() / 4).max(1) as u64;
            rand::thread_rng().gen_range(0..=max_jitter)
        };
        let delay = exp + Duration::from_millis(jitter_ms);
        delay.max(hint.unwrap_or(Duration::ZERO)).min(MAX_DELAY)
    }
}
