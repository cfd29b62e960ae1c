//! Retry policy for HTTP requests.

use reqwest::StatusCode;
use std::time::Duration;

/// Statuses that are retried: rate limiting and transient server errors.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// How a response status is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 2xx: read the body.
    Success,
    /// Transient: wait and try again.
    Retryable,
    /// Anything else: give up immediately.
    Fatal,
}

/// Classifies a response status.
pub fn classify(status: StatusCode) -> StatusClass {
    if status.is_success() {
        StatusClass::Success
    } else if RETRYABLE_STATUSES.contains(&status.as_u16()) {
        StatusClass::Retryable
    } else {
        StatusClass::Fatal
    }
}

/// Parses a numeric `Retry-After` value in seconds.
///
/// HTTP-date values and values too large for a [`Duration`] are not
/// supported and yield `None`, which falls back to exponential backoff.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let secs: f64 = value.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Strategy for retrying failed requests.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_tries: u32,
    /// Base of the exponential schedule: attempt `n` waits `base^(n-1)` seconds.
    pub backoff_base: f64,
    /// Ceiling for the exponential schedule. A server `Retry-After` is not capped.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt count and a base of 2.
    pub fn new(max_tries: u32) -> Self {
        Self {
            max_tries,
            backoff_base: 2.0,
            max_delay: Duration::from_secs(300),
        }
    }

    /// Sets the backoff base.
    pub fn with_backoff_base(mut self, base: f64) -> Self {
        self.backoff_base = base;
        self
    }

    /// Sets the backoff ceiling.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Attempts actually made; at least one.
    pub fn attempts(&self) -> u32 {
        self.max_tries.max(1)
    }

    /// Calculates the exponential delay after failed attempt `attempt` (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.backoff_base.max(0.0).powi(exponent);
        let cap = self.max_delay.as_secs_f64();

        if secs.is_finite() {
            Duration::from_secs_f64(secs.min(cap))
        } else {
            self.max_delay
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
