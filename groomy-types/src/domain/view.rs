//! Query projections returned by the persistence port.
//!
//! The payment workflows need identity and display fields from several
//! aggregates at once (quote, request, customer, groomer, dog). Rather
//! than navigating entity references across aggregate boundaries, the
//! repository joins once and returns these flat views.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::{CustomerId, GroomerId, QuoteId, QuoteRequestId, SelectedQuoteId, UserId};
use super::payment::Payment;
use super::quote::{QuoteRequestStatus, QuoteStatus, RequestScope};

/// Everything the confirmation workflow needs about a quote in one row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotePaymentView {
    pub quote_id: QuoteId,
    pub request_id: QuoteRequestId,
    pub groomer_id: GroomerId,
    /// Customer owning the dog the quote was made for.
    pub customer_id: CustomerId,
    pub customer_user_id: UserId,
    pub customer_name: String,
    pub groomer_user_id: UserId,
    pub groomer_nickname: String,
    pub dog_name: String,
    pub cost: i64,
    pub beauty_date: NaiveDateTime,
    pub quote_status: QuoteStatus,
    pub request_scope: RequestScope,
    pub request_status: QuoteRequestStatus,
}

/// Joined result of a cancellation: the updated payment plus the
/// counterparty identity needed for the response and the cancel event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationView {
    pub payment: Payment,
    pub selected_quote_id: SelectedQuoteId,
    pub customer_user_id: UserId,
    pub customer_name: String,
    pub groomer_user_id: UserId,
    pub groomer_nickname: String,
    pub dog_name: String,
    /// Original quoted cost in won.
    pub cost: i64,
}
