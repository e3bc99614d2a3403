//! Payment gateway port.
//!
//! This trait defines the interface to the external payment provider.
//! The production implementation wraps the provider's HTTP API with retry
//! and circuit-breaker protection; tests use mock implementations.

/// Error type for gateway operations.
///
/// A single variant by design: by the time the resilient client gives up
/// (retries exhausted or circuit open), the only fact the workflow can act
/// on is "the provider could not be reached"; the message carries the
/// operation context for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Unavailable(String),
}

/// Port trait for the payment provider.
///
/// Implementations perform no domain validation - they are a pure
/// networking boundary returning the provider's normalized JSON payload
/// (fields of interest: `approvedAt`, `method`, provider status) or a
/// typed failure. Calls are idempotent on their inputs.
#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync + 'static {
    /// Requests approval of a checkout payment.
    async fn confirm(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<serde_json::Value, GatewayError>;

    /// Requests cancellation of an approved payment.
    async fn cancel(
        &self,
        payment_key: &str,
        cancel_reason: &str,
    ) -> Result<serde_json::Value, GatewayError>;
}
