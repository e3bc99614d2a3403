//! Notification domain model.
//!
//! Notifications are an append-only log: the core writes them and never
//! mutates them afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{NotificationId, UserId};

/// Which side of the reservation receives a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientRole {
    Customer,
    Groomer,
}

impl RecipientRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientRole::Customer => "customer",
            RecipientRole::Groomer => "groomer",
        }
    }
}

impl std::fmt::Display for RecipientRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Category of a notification; the description is the value persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Reservation,
    Cancellation,
}

impl NotificationType {
    pub fn description(&self) -> &'static str {
        match self {
            NotificationType::Reservation => "예약",
            NotificationType::Cancellation => "예약 취소",
        }
    }
}

/// A delivered message for one recipient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub role: RecipientRole,
    pub notification_type: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_strings() {
        assert_eq!(RecipientRole::Customer.as_str(), "customer");
        assert_eq!(RecipientRole::Groomer.to_string(), "groomer");
    }

    #[test]
    fn test_type_descriptions() {
        assert_eq!(NotificationType::Reservation.description(), "예약");
        assert_eq!(NotificationType::Cancellation.description(), "예약 취소");
    }
}
