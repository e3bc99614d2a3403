//! # Groomy Gateway
//!
//! Resilient client for the Toss Payments API, implementing the
//! `PaymentGateway` port.
//!
//! ## Architecture
//!
//! - `transport/` - raw HTTP round trips (reqwest), swappable for tests
//! - `retry/` - bounded exponential backoff policy
//! - `breaker/` - explicit circuit-breaker state machine
//!
//! Every outbound call runs through the retry policy, and every attempt
//! asks the circuit breaker for a permit. When the breaker rejects a call
//! or the retries are exhausted, the fallback logs the operation context
//! and returns a typed `GatewayError` - failures are never swallowed.

pub mod breaker;
pub mod retry;
pub mod transport;

use serde_json::Value;
use tracing::{error, warn};

use groomy_types::{GatewayError, PaymentGateway};

pub use breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, TossTransport, TransportError};

/// Circuit-breaker service name for the payment provider. One breaker
/// instance guards all callers process-wide.
pub const SERVICE_NAME: &str = "toss-payments";

const CONFIRM_FALLBACK_MESSAGE: &str =
    "현재 결제 시스템에 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.";
const CANCEL_FALLBACK_MESSAGE: &str =
    "현재 결제 취소 시스템에 오류가 발생했습니다. 잠시 후 다시 시도해 주세요.";

/// Configuration for the Toss Payments client.
#[derive(Debug, Clone)]
pub struct TossConfig {
    pub base_url: String,
    pub secret_key: String,
    pub retry: RetryPolicy,
    pub breaker: CircuitBreakerConfig,
}

impl TossConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.tosspayments.com".into(),
            secret_key: secret_key.into(),
            retry: RetryPolicy::default(),
            breaker: CircuitBreakerConfig::default(),
        }
    }
}

/// Resilient Toss Payments client.
///
/// Generic over the transport so the retry/breaker envelope can be tested
/// with injected failures. No domain validation happens here.
pub struct TossClient<T: TossTransport> {
    transport: T,
    retry: RetryPolicy,
    breaker: CircuitBreaker,
}

impl TossClient<HttpTransport> {
    /// Creates a client backed by the real HTTP transport.
    pub fn new(config: TossConfig) -> Self {
        let transport = HttpTransport::new(config.base_url.clone(), config.secret_key.clone());
        Self::with_transport(transport, config)
    }
}

impl<T: TossTransport> TossClient<T> {
    /// Creates a client over an arbitrary transport (tests).
    pub fn with_transport(transport: T, config: TossConfig) -> Self {
        Self {
            transport,
            retry: config.retry,
            breaker: CircuitBreaker::new(SERVICE_NAME, config.breaker),
        }
    }

    /// The breaker guarding this client, exposed for inspection.
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// Runs one operation through the breaker and the retry schedule.
    ///
    /// Each attempt needs its own breaker permit, so a circuit that opens
    /// mid-schedule stops the remaining retries immediately.
    async fn call_resilient<F, Fut>(
        &self,
        context: &str,
        fallback_message: &str,
        call: F,
    ) -> Result<Value, GatewayError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<Value, TransportError>>,
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;

            if !self.breaker.try_acquire() {
                error!(
                    service = SERVICE_NAME,
                    context, "circuit open, short-circuiting payment API call"
                );
                return Err(GatewayError::Unavailable(fallback_message.to_string()));
            }

            match call().await {
                Ok(value) => {
                    self.breaker.record_success();
                    return Ok(value);
                }
                Err(err) => {
                    self.breaker.record_failure();
                    match self.retry.backoff_after(attempt) {
                        Some(delay) => {
                            warn!(
                                context,
                                attempt,
                                error = %err,
                                backoff_ms = delay.as_millis() as u64,
                                "payment API call failed, retrying"
                            );
                            tokio::time::sleep(delay).await;
                        }
                        None => {
                            error!(
                                context,
                                attempt,
                                error = %err,
                                "payment API call failed after final attempt"
                            );
                            return Err(GatewayError::Unavailable(fallback_message.to_string()));
                        }
                    }
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl<T: TossTransport> PaymentGateway for TossClient<T> {
    async fn confirm(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<Value, GatewayError> {
        let context = format!("confirm order_id={order_id}");
        self.call_resilient(&context, CONFIRM_FALLBACK_MESSAGE, || {
            self.transport.post_confirm(payment_key, order_id, amount)
        })
        .await
    }

    async fn cancel(
        &self,
        payment_key: &str,
        cancel_reason: &str,
    ) -> Result<Value, GatewayError> {
        let context = format!("cancel payment_key={payment_key}");
        self.call_resilient(&context, CANCEL_FALLBACK_MESSAGE, || {
            self.transport.post_cancel(payment_key, cancel_reason)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::json;

    use super::*;

    /// Transport double that fails the first `fail_remaining` calls.
    struct MockTransport {
        calls: AtomicUsize,
        fail_remaining: AtomicUsize,
    }

    impl MockTransport {
        fn failing(times: usize) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_remaining: AtomicUsize::new(times),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn respond(&self) -> Result<serde_json::Value, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let remaining = self.fail_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                self.fail_remaining.store(remaining - 1, Ordering::SeqCst);
                Err(TransportError::Request("injected failure".into()))
            } else {
                Ok(json!({
                    "approvedAt": "2025-01-15T10:30:00+09:00",
                    "method": "카드",
                    "status": "DONE",
                }))
            }
        }
    }

    #[async_trait::async_trait]
    impl TossTransport for MockTransport {
        async fn post_confirm(
            &self,
            _payment_key: &str,
            _order_id: &str,
            _amount: i64,
        ) -> Result<serde_json::Value, TransportError> {
            self.respond()
        }

        async fn post_cancel(
            &self,
            _payment_key: &str,
            _cancel_reason: &str,
        ) -> Result<serde_json::Value, TransportError> {
            self.respond()
        }
    }

    fn test_config() -> TossConfig {
        TossConfig::new("test_sk")
    }

    fn no_retry_config(wait: Duration) -> TossConfig {
        let mut config = test_config();
        config.retry = RetryPolicy::none();
        config.breaker = CircuitBreakerConfig {
            window_size: 10,
            min_calls: 10,
            failure_rate_threshold: 0.5,
            wait_duration: wait,
            trial_calls: 3,
        };
        config
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_final_retry_attempt() {
        let client = TossClient::with_transport(MockTransport::failing(2), test_config());

        let result = client.confirm("pay_key", "order_1", 10000).await.unwrap();

        assert_eq!(result["method"], "카드");
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_fall_back() {
        let client = TossClient::with_transport(MockTransport::failing(usize::MAX), test_config());

        let err = client.confirm("pay_key", "order_1", 10000).await.unwrap_err();

        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert_eq!(client.transport.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_fallback_carries_cancel_message() {
        let client = TossClient::with_transport(MockTransport::failing(usize::MAX), test_config());

        let err = client.cancel("pay_key", "고객 요청").await.unwrap_err();

        let GatewayError::Unavailable(message) = err;
        assert!(message.contains("결제 취소"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_breaker_lifecycle_through_client() {
        let client = TossClient::with_transport(
            MockTransport::failing(usize::MAX),
            no_retry_config(Duration::from_secs(1)),
        );

        // Ten failing calls trip the breaker.
        for _ in 0..10 {
            let _ = client.confirm("pay_key", "order_1", 10000).await;
        }
        assert_eq!(client.breaker().state(), CircuitState::Open);
        assert_eq!(client.transport.calls(), 10);

        // The eleventh call short-circuits: no transport hit.
        let err = client.confirm("pay_key", "order_1", 10000).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unavailable(_)));
        assert_eq!(client.transport.calls(), 10);

        // After the wait window, trial calls go through and close the circuit.
        tokio::time::advance(Duration::from_millis(1100)).await;
        client.transport.fail_remaining.store(0, Ordering::SeqCst);

        for _ in 0..3 {
            client.confirm("pay_key", "order_1", 10000).await.unwrap();
        }
        assert_eq!(client.breaker().state(), CircuitState::Closed);
        assert_eq!(client.transport.calls(), 13);
    }
}
