//! Reservation domain events.
//!
//! Published by the payment workflow strictly after its transaction
//! commits; consumed out-of-band by the notification worker. Events are
//! plain values - they carry every field the message templates need so
//! the consumer never has to reach back into the aggregates.

use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Emitted when a payment is confirmed and the reservation is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfirmed {
    pub customer_user_id: UserId,
    pub groomer_user_id: UserId,
    pub customer_name: String,
    pub groomer_nickname: String,
    pub dog_name: String,
    /// Paid amount in won.
    pub amount: i64,
    /// Grooming date pre-formatted as `YYYY-MM-DD HH:mm`.
    pub beauty_date: String,
}

/// Emitted when a payment and its reservation are cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCancelled {
    pub customer_user_id: UserId,
    pub groomer_user_id: UserId,
    pub customer_name: String,
    pub groomer_nickname: String,
    pub dog_name: String,
    /// Original quoted cost in won.
    pub cost: i64,
    pub cancel_reason: String,
}

/// Union of reservation lifecycle events handed to the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReservationEvent {
    Confirmed(ReservationConfirmed),
    Cancelled(ReservationCancelled),
}
