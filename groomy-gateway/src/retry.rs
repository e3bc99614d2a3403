//! Retry policy with exponential backoff.

use std::time::Duration;

/// Bounded retry schedule for outbound payment API calls.
///
/// Attempt counting is total: `max_attempts = 3` means one initial call
/// plus two retries, with backoffs between them.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1000),
            multiplier: 2.0,
            max_backoff: Duration::from_millis(10000),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries; useful where the caller drives retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Backoff to wait after the given failed attempt (1-based), or `None`
    /// once attempts are exhausted.
    pub fn backoff_after(&self, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }
        let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
        Some(self.initial_backoff.mul_f64(factor).min(self.max_backoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backoff_sequence() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_after(1), Some(Duration::from_millis(1000)));
        assert_eq!(policy.backoff_after(2), Some(Duration::from_millis(2000)));
        assert_eq!(policy.backoff_after(3), None);
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            ..RetryPolicy::default()
        };
        // 1s * 2^8 = 256s without the cap
        assert_eq!(policy.backoff_after(9), Some(Duration::from_millis(10000)));
    }

    #[test]
    fn test_no_retry_policy() {
        assert_eq!(RetryPolicy::none().backoff_after(1), None);
    }
}
