//! Retry policy consumed by [`HttpClient`](super::HttpClient).
//!
//! The policy decides three things: how many attempts a transient failure
//! gets, how long to back off between them, and which failures are worth
//! retrying at all.

use derive_builder::Builder;
use std::time::Duration;

use crate::error::FetchError;

/// What the client should do after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Sleep, then try again without consuming an attempt.
    WaitRateLimit(Duration),
    /// Sleep, then try again; the attempt counts against the bound.
    Backoff(Duration),
    /// Return the error to the caller.
    GiveUp,
}

/// Bounded exponential backoff with special handling for rate limiting.
///
/// # Examples
///
/// ```rust
/// use anime_album::net::RetryPolicyBuilder;
/// use std::time::Duration;
///
/// let policy = RetryPolicyBuilder::default()
///     .max_attempts(4u32)
///     .base_delay(Duration::from_millis(100))
///     .build()
///     .unwrap();
///
/// assert_eq!(policy.backoff(1), Duration::from_millis(100));
/// assert_eq!(policy.backoff(3), Duration::from_millis(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
#[builder(setter(into), default)]
pub struct RetryPolicy {
    /// Total attempts for transient failures, including the first one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub base_delay: Duration,
    /// Upper bound for any single backoff delay.
    pub max_delay: Duration,
    /// Delay used for a 429 without a usable `Retry-After` header.
    pub rate_limit_fallback: Duration,
    /// Consecutive 429 responses tolerated before giving up.
    pub max_rate_limit_waits: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
            rate_limit_fallback: Duration::from_secs(1),
            max_rate_limit_waits: 5,
        }
    }
}

impl RetryPolicy {
    /// A policy that never waits, for tests and tooling.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            rate_limit_fallback: Duration::ZERO,
            ..Default::default()
        }
    }

    /// Backoff before attempt `attempt + 1`, where `attempt` is 1-based.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay.max(self.base_delay))
    }

    /// Whether a failure may succeed on a later attempt.
    pub fn is_retriable(&self, error: &FetchError) -> bool {
        matches!(
            error,
            FetchError::Transient { .. } | FetchError::RateLimited { .. }
        )
    }

    /// Decides the next step after `error`.
    ///
    /// `attempts` counts transient attempts made so far; `rate_limit_waits`
    /// counts consecutive 429 waits.
    pub fn decide(&self, error: &FetchError, attempts: u32, rate_limit_waits: u32) -> RetryDecision {
        if !self.is_retriable(error) {
            return RetryDecision::GiveUp;
        }

        match error {
            FetchError::RateLimited { retry_after } => {
                if rate_limit_waits >= self.max_rate_limit_waits {
                    return RetryDecision::GiveUp;
                }
                let delay = retry_after
                    .map(Duration::from_secs)
                    .unwrap_or(self.rate_limit_fallback);
                RetryDecision::WaitRateLimit(delay)
            }
            _ if attempts >= self.max_attempts => RetryDecision::GiveUp,
            _ => RetryDecision::Backoff(self.backoff(attempts)),
        }
    }
}
