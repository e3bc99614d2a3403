//! Reservation (selected quote) domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{CustomerId, QuoteId, SelectedQuoteId};

/// Lifecycle of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Reserved,
    Cancelled,
}

impl ReservationStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ReservationStatus::Reserved => "010",
            ReservationStatus::Cancelled => "020",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "010" => Some(ReservationStatus::Reserved),
            "020" => Some(ReservationStatus::Cancelled),
            _ => None,
        }
    }
}

/// The reservation created when a quote is paid for.
///
/// A `SelectedQuote` exists for a quote iff that quote has been paid;
/// storage enforces at most one per quote with a unique key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectedQuote {
    pub id: SelectedQuoteId,
    pub quote_id: QuoteId,
    pub customer_id: CustomerId,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_status_codes() {
        assert_eq!(ReservationStatus::Reserved.code(), "010");
        assert_eq!(
            ReservationStatus::from_code("020"),
            Some(ReservationStatus::Cancelled)
        );
        assert_eq!(ReservationStatus::from_code("030"), None);
    }
}
