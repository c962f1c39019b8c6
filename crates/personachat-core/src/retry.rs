//! Bounded retry policy for provider calls.
//!
//! Transient failures (timeout, rate limit, overload, network) are retried
//! a fixed number of times with doubling backoff; permanent failures are
//! never retried.

use std::time::Duration;

use personachat_types::config::ProviderConfig;
use personachat_types::error::GenerationError;

/// Stateless retry policy applied per `send`.
///
/// `attempt` is 1-based: the first execution is attempt 1, so a policy with
/// `max_retries = 2` allows attempts 1..=3.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Per-call timeout. Elapse counts as a transient failure.
    pub timeout: Duration,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    /// Backoff before the first retry; doubles per subsequent retry.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, max_retries: u32, backoff: Duration) -> Self {
        Self {
            timeout,
            max_retries,
            backoff,
        }
    }

    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            Duration::from_millis(config.timeout_ms),
            config.max_retries,
            Duration::from_millis(config.backoff_ms),
        )
    }

    /// Whether another attempt is allowed for this failure.
    pub fn should_retry(&self, attempt: u32, error: &GenerationError) -> bool {
        error.is_transient() && attempt <= self.max_retries
    }

    /// Backoff duration before retrying after `attempt` failed.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ProviderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(Duration::from_secs(30), 2, Duration::from_millis(250))
    }

    #[test]
    fn test_transient_retried_within_budget() {
        let p = policy();
        let err = GenerationError::RateLimited {
            retry_after_ms: None,
        };
        assert!(p.should_retry(1, &err));
        assert!(p.should_retry(2, &err));
        assert!(!p.should_retry(3, &err));
    }

    #[test]
    fn test_permanent_never_retried() {
        let p = policy();
        assert!(!p.should_retry(1, &GenerationError::AuthenticationFailed));
        assert!(!p.should_retry(1, &GenerationError::InvalidRequest("temp".to_string())));
    }

    #[test]
    fn test_backoff_doubles() {
        let p = policy();
        assert_eq!(p.backoff_for(1), Duration::from_millis(250));
        assert_eq!(p.backoff_for(2), Duration::from_millis(500));
        assert_eq!(p.backoff_for(3), Duration::from_millis(1_000));
    }

    #[test]
    fn test_zero_retries_surfaces_immediately() {
        let p = RetryPolicy::new(Duration::from_secs(30), 0, Duration::from_millis(250));
        assert!(!p.should_retry(1, &GenerationError::Timeout(30_000)));
    }
}
