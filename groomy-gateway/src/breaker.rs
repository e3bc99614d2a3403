//! Circuit breaker for the payment provider.
//!
//! An explicit state machine (Closed → Open → HalfOpen → Closed, or back
//! to Open on a half-open failure) owned by the gateway client and shared
//! process-wide for the single provider service name. Outcomes are kept
//! in a count-based rolling window; once at least `min_calls` outcomes
//! are recorded and the failure ratio reaches the threshold, the circuit
//! opens and every call is rejected without touching the network until
//! `wait_duration` has elapsed. Then a bounded number of trial calls is
//! let through: all succeeding closes the circuit, any failure re-opens it.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{info, warn};

/// Circuit breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation, outcomes tracked in the rolling window.
    Closed,
    /// Rejecting calls until the wait duration elapses.
    Open,
    /// Letting a bounded number of trial calls through.
    HalfOpen,
}

/// Circuit breaker configuration.
#[derive(Debug, Clone)]
pub struct CircuitBreakerConfig {
    /// Number of outcomes kept in the rolling window.
    pub window_size: usize,
    /// Minimum recorded calls before the failure ratio is evaluated.
    pub min_calls: usize,
    /// Failure ratio at or above which the circuit opens.
    pub failure_rate_threshold: f64,
    /// How long the circuit stays open before probing.
    pub wait_duration: Duration,
    /// Trial calls permitted in half-open; that many successes close it.
    pub trial_calls: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            window_size: 10,
            min_calls: 10,
            failure_rate_threshold: 0.5,
            wait_duration: Duration::from_secs(30),
            trial_calls: 3,
        }
    }
}

struct BreakerInner {
    state: CircuitState,
    /// Rolling window of outcomes; `true` marks a failure.
    window: VecDeque<bool>,
    opened_at: Option<Instant>,
    trial_permits: u32,
    trial_successes: u32,
}

/// Process-wide circuit breaker keyed by one external service name.
pub struct CircuitBreaker {
    service: &'static str,
    config: CircuitBreakerConfig,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(service: &'static str, config: CircuitBreakerConfig) -> Self {
        let inner = Mutex::new(BreakerInner {
            state: CircuitState::Closed,
            window: VecDeque::with_capacity(config.window_size),
            opened_at: None,
            trial_permits: 0,
            trial_successes: 0,
        });
        Self {
            service,
            config,
            inner,
        }
    }

    /// Asks for permission to make one call.
    ///
    /// Handles the Open → HalfOpen transition once the wait duration has
    /// elapsed. Returns `false` when the call must be short-circuited.
    pub fn try_acquire(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            CircuitState::Closed => true,
            CircuitState::Open => {
                let elapsed = inner
                    .opened_at
                    .map(|t| t.elapsed() >= self.config.wait_duration)
                    .unwrap_or(true);
                if elapsed {
                    info!(service = self.service, "circuit breaker half-opening");
                    inner.state = CircuitState::HalfOpen;
                    inner.trial_permits = 1;
                    inner.trial_successes = 0;
                    true
                } else {
                    false
                }
            }
            CircuitState::HalfOpen => {
                if inner.trial_permits < self.config.trial_calls {
                    inner.trial_permits += 1;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Records a successful call.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            CircuitState::Closed => {
                push_outcome(&mut inner.window, self.config.window_size, false);
            }
            CircuitState::HalfOpen => {
                inner.trial_successes += 1;
                if inner.trial_successes >= self.config.trial_calls {
                    info!(service = self.service, "circuit breaker closing");
                    inner.state = CircuitState::Closed;
                    inner.window.clear();
                    inner.opened_at = None;
                }
            }
            CircuitState::Open => {}
        }
    }

    /// Records a failed call.
    pub fn record_failure(&self) {
        let mut inner = self.inner.lock().unwrap();
        match inner.state {
            CircuitState::Closed => {
                push_outcome(&mut inner.window, self.config.window_size, true);
                if inner.window.len() >= self.config.min_calls {
                    let failures = inner.window.iter().filter(|f| **f).count();
                    let rate = failures as f64 / inner.window.len() as f64;
                    if rate >= self.config.failure_rate_threshold {
                        warn!(
                            service = self.service,
                            failure_rate = rate,
                            "circuit breaker opening"
                        );
                        inner.state = CircuitState::Open;
                        inner.opened_at = Some(Instant::now());
                    }
                }
            }
            CircuitState::HalfOpen => {
                warn!(service = self.service, "circuit breaker re-opening");
                inner.state = CircuitState::Open;
                inner.opened_at = Some(Instant::now());
                inner.trial_permits = 0;
                inner.trial_successes = 0;
            }
            CircuitState::Open => {}
        }
    }

    /// Current state, for inspection and tests.
    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap().state
    }
}

fn push_outcome(window: &mut VecDeque<bool>, window_size: usize, failed: bool) {
    if window.len() == window_size {
        window.pop_front();
    }
    window.push_back(failed);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> CircuitBreakerConfig {
        CircuitBreakerConfig {
            window_size: 10,
            min_calls: 10,
            failure_rate_threshold: 0.5,
            wait_duration: Duration::from_secs(1),
            trial_calls: 3,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_opens_after_min_calls_of_failures() {
        let breaker = CircuitBreaker::new("test", test_config());

        for _ in 0..9 {
            assert!(breaker.try_acquire());
            breaker.record_failure();
        }
        assert_eq!(breaker.state(), CircuitState::Closed);

        assert!(breaker.try_acquire());
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stays_closed_below_failure_threshold() {
        let breaker = CircuitBreaker::new("test", test_config());

        for i in 0..20 {
            assert!(breaker.try_acquire());
            if i % 3 == 0 {
                breaker.record_failure();
            } else {
                breaker.record_success();
            }
        }
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_lifecycle_closed_open_half_open_closed() {
        let breaker = CircuitBreaker::new("test", test_config());

        for _ in 0..10 {
            assert!(breaker.try_acquire());
            breaker.record_failure();
        }
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.try_acquire());

        tokio::time::advance(Duration::from_millis(1100)).await;

        // Wait window elapsed: three trial calls pass, a fourth is rejected.
        assert!(breaker.try_acquire());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        assert!(breaker.try_acquire());
        assert!(breaker.try_acquire());
        assert!(!breaker.try_acquire());

        breaker.record_success();
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::HalfOpen);
        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
        assert!(breaker.try_acquire());
    }

    #[tokio::test(start_paused = true)]
    async fn test_half_open_failure_reopens() {
        let breaker = CircuitBreaker::new("test", test_config());

        for _ in 0..10 {
            breaker.try_acquire();
            breaker.record_failure();
        }
        tokio::time::advance(Duration::from_millis(1100)).await;

        assert!(breaker.try_acquire());
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.try_acquire());
    }
}
