//! Payment domain model.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{PaymentId, SelectedQuoteId};

/// Status-code group for payment states in the shared code table.
pub const PAYMENT_STATUS_GROUP: &str = "300";

/// Lifecycle of a payment. Codes resolve to display names via the
/// `(code, "300")` lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
    Cancelled,
}

impl PaymentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "020",
            PaymentStatus::Cancelled => "030",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "020" => Some(PaymentStatus::Completed),
            "030" => Some(PaymentStatus::Cancelled),
            _ => None,
        }
    }
}

/// The financial record tied 1:1 to a reservation.
///
/// Rows are never physically removed on user action: deletion is a logical
/// flag, and a retention sweep purges flagged rows after 30 days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    /// Key issued by the payment provider; unique per payment.
    pub payment_key: String,
    pub order_id: String,
    /// Amount in won.
    pub amount: i64,
    /// Payment method reported by the provider (card, transfer, ...).
    pub method: String,
    pub status: PaymentStatus,
    /// Approval timestamp reported by the provider, local time.
    pub approved_at: NaiveDateTime,
    pub cancel_reason: Option<String>,
    /// Shop name shown on receipts and history.
    pub payment_title: String,
    pub selected_quote_id: SelectedQuoteId,
    pub is_deleted: bool,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_codes() {
        assert_eq!(PaymentStatus::Completed.code(), "020");
        assert_eq!(PaymentStatus::from_code("030"), Some(PaymentStatus::Cancelled));
        assert_eq!(PaymentStatus::from_code("010"), None);
    }
}
