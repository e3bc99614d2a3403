//! Quote request and quote domain models.
//!
//! Status enums carry the two-digit codes used by the shared status-code
//! table so display names can be resolved via the `(code, group)` lookup.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::ids::{DogId, GroomerId, QuoteId, QuoteRequestId};

/// Whether a grooming request was published to every groomer or sent to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestScope {
    /// Open call: any groomer may bid. Accepting a quote closes the request.
    All,
    /// Sent to a single groomer; the request stays untouched on acceptance.
    Targeted,
}

impl RequestScope {
    pub fn code(&self) -> &'static str {
        match self {
            RequestScope::All => "010",
            RequestScope::Targeted => "020",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "010" => Some(RequestScope::All),
            "020" => Some(RequestScope::Targeted),
            _ => None,
        }
    }
}

/// Lifecycle of a quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteRequestStatus {
    Open,
    DeadlineClosed,
}

impl QuoteRequestStatus {
    pub fn code(&self) -> &'static str {
        match self {
            QuoteRequestStatus::Open => "010",
            QuoteRequestStatus::DeadlineClosed => "030",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "010" => Some(QuoteRequestStatus::Open),
            "030" => Some(QuoteRequestStatus::DeadlineClosed),
            _ => None,
        }
    }
}

/// Lifecycle of a groomer's quote. Exactly one quote per request may ever
/// reach `Accepted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Pending,
    Accepted,
}

impl QuoteStatus {
    pub fn code(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "010",
            QuoteStatus::Accepted => "020",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "010" => Some(QuoteStatus::Pending),
            "020" => Some(QuoteStatus::Accepted),
            _ => None,
        }
    }
}

/// A customer's grooming request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub id: QuoteRequestId,
    pub dog_id: DogId,
    pub content: String,
    /// Desired grooming date.
    pub beauty_date: NaiveDateTime,
    pub scope: RequestScope,
    pub status: QuoteRequestStatus,
}

/// A groomer's priced bid against a quote request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub request_id: QuoteRequestId,
    pub groomer_id: GroomerId,
    pub dog_id: DogId,
    pub content: String,
    /// Quoted cost in won.
    pub cost: i64,
    /// Proposed grooming date.
    pub beauty_date: NaiveDateTime,
    pub status: QuoteStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_roundtrip() {
        assert_eq!(QuoteStatus::from_code("020"), Some(QuoteStatus::Accepted));
        assert_eq!(QuoteStatus::Accepted.code(), "020");
        assert_eq!(
            QuoteRequestStatus::from_code("030"),
            Some(QuoteRequestStatus::DeadlineClosed)
        );
        assert_eq!(RequestScope::from_code("010"), Some(RequestScope::All));
    }

    #[test]
    fn test_unknown_code_is_rejected() {
        assert_eq!(QuoteStatus::from_code("999"), None);
        assert_eq!(RequestScope::from_code(""), None);
    }
}
