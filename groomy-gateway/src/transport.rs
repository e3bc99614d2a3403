//! Outbound HTTP transport to the Toss Payments API.
//!
//! The transport is a seam: the resilient client wraps whatever implements
//! `TossTransport`, so tests can inject failures without a network.

use serde_json::{Value, json};

/// Error from a single transport attempt. Every variant is retryable from
/// the resilient client's point of view.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// One raw round trip to the payment provider, no retries, no breaker.
#[async_trait::async_trait]
pub trait TossTransport: Send + Sync + 'static {
    /// `POST /v1/payments/confirm`
    async fn post_confirm(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<Value, TransportError>;

    /// `POST /v1/payments/{paymentKey}/cancel`
    async fn post_cancel(
        &self,
        payment_key: &str,
        cancel_reason: &str,
    ) -> Result<Value, TransportError>;
}

/// Production transport over reqwest with Basic-Auth (secret key as the
/// user name, empty password) and JSON bodies.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        }
    }

    async fn post_json(&self, url: String, body: Value) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, Some(""))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))
    }
}

#[async_trait::async_trait]
impl TossTransport for HttpTransport {
    async fn post_confirm(
        &self,
        payment_key: &str,
        order_id: &str,
        amount: i64,
    ) -> Result<Value, TransportError> {
        let url = format!("{}/v1/payments/confirm", self.base_url);
        let body = json!({
            "paymentKey": payment_key,
            "orderId": order_id,
            "amount": amount,
        });
        self.post_json(url, body).await
    }

    async fn post_cancel(
        &self,
        payment_key: &str,
        cancel_reason: &str,
    ) -> Result<Value, TransportError> {
        let url = format!("{}/v1/payments/{}/cancel", self.base_url, payment_key);
        let body = json!({ "cancelReason": cancel_reason });
        self.post_json(url, body).await
    }
}
