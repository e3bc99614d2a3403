//! Data Transfer Objects (DTOs) for requests and responses.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::{CustomerId, QuoteId, QuoteRequestId, RequestScope, SelectedQuoteId};

// ─────────────────────────────────────────────────────────────────────────────
// Payment confirmation DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to confirm a payment and create the reservation.
///
/// `payment_key`, `order_id` and `amount` come from the provider's
/// checkout widget; `quote_id` and `customer_id` identify the quote being
/// paid for and the requesting customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmRequest {
    pub quote_id: QuoteId,
    pub customer_id: CustomerId,
    pub payment_key: String,
    pub order_id: String,
    /// Amount in won.
    pub amount: i64,
}

/// Response after a successful confirmation (or a payment detail lookup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub payment_key: String,
    pub order_id: String,
    /// Human-readable status name resolved from the status-code table.
    pub status: String,
    pub method: String,
    pub approved_at: DateTime<FixedOffset>,
    pub amount: i64,
    pub selected_quote_id: SelectedQuoteId,
    /// Shop name shown as the payment title.
    pub payment_title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Payment cancellation DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to cancel a payment and its reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCancelRequest {
    pub payment_key: String,
    pub cancel_reason: String,
}

/// Response after a successful cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCancelResponse {
    pub payment_key: String,
    /// Human-readable status name resolved from the status-code table.
    pub status: String,
    pub method: String,
    pub cancel_reason: String,
    pub selected_quote_id: SelectedQuoteId,
    pub message: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Atomic write records (service → repository)
// ─────────────────────────────────────────────────────────────────────────────

/// Every state transition of one confirmed payment, applied by the
/// repository in a single transaction.
#[derive(Debug, Clone)]
pub struct ConfirmReservationRecord {
    pub quote_id: QuoteId,
    pub request_id: QuoteRequestId,
    pub customer_id: CustomerId,
    /// Scope of the parent request; an `All` request is deadline-closed
    /// alongside the acceptance, a targeted one is left untouched.
    pub request_scope: RequestScope,
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
    pub method: String,
    pub approved_at: NaiveDateTime,
    /// Shop name recorded as the payment title.
    pub payment_title: String,
}
