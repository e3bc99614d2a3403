//! Repository port trait.
//!
//! This is the primary port in our hexagonal architecture.
//! Adapters (SQLite, in-memory test doubles) implement this trait.

use chrono::{DateTime, Utc};

use crate::domain::{
    CancellationView, GroomerId, Notification, NotificationType, Payment, QuoteId,
    QuotePaymentView, RecipientRole, SelectedQuote, SelectedQuoteId, UserId,
};
use crate::dto::ConfirmReservationRecord;
use crate::error::RepoError;

/// The main repository port for reservation payment operations.
///
/// `confirm_reservation` and `cancel_reservation` MUST be atomic: every
/// state transition of one workflow happens in a single database
/// transaction. The one-reservation-per-quote and one-payment-per-
/// reservation invariants are enforced by unique keys at the storage
/// layer - callers treat pre-checks as optimizations only.
#[async_trait::async_trait]
pub trait ReservationRepository: Send + Sync + 'static {
    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// Loads the joined projection the confirmation workflow needs.
    async fn find_quote_for_payment(
        &self,
        id: QuoteId,
    ) -> Result<Option<QuotePaymentView>, RepoError>;

    /// Finds the reservation for a quote, if one exists.
    async fn find_selected_quote_by_quote(
        &self,
        quote_id: QuoteId,
    ) -> Result<Option<SelectedQuote>, RepoError>;

    /// Resolves the groomer's shop name.
    async fn find_shop_name_by_groomer(
        &self,
        groomer_id: GroomerId,
    ) -> Result<Option<String>, RepoError>;

    /// Finds a payment by the provider-issued payment key.
    async fn find_payment_by_key(&self, payment_key: &str)
    -> Result<Option<Payment>, RepoError>;

    /// Resolves a status code to its display name via the `(code, group)`
    /// lookup table.
    async fn status_display_name(
        &self,
        code: &str,
        group: &str,
    ) -> Result<Option<String>, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Atomic workflow writes (MUST be single transactions)
    // ─────────────────────────────────────────────────────────────────────────

    /// Applies every write of a confirmed payment: insert the reservation,
    /// accept the quote, deadline-close an all-groomers request, insert
    /// the payment row. Returns `RepoError::Conflict` when a unique key
    /// shows the quote is already reserved or paid.
    async fn confirm_reservation(
        &self,
        record: ConfirmReservationRecord,
    ) -> Result<SelectedQuoteId, RepoError>;

    /// Marks the payment and its reservation cancelled, recording the
    /// reason. Returns `RepoError::NotFound` (without mutating anything)
    /// when no payment exists for the key.
    async fn cancel_reservation(
        &self,
        payment_key: &str,
        cancel_reason: &str,
    ) -> Result<CancellationView, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Retention
    // ─────────────────────────────────────────────────────────────────────────

    /// Flags a payment as logically deleted, stamping `updated_at`.
    async fn mark_payment_deleted(&self, payment_key: &str) -> Result<(), RepoError>;

    /// Physically removes payments flagged deleted whose last update is
    /// older than `cutoff`. Returns the number of purged rows.
    async fn purge_expired_payments(&self, cutoff: DateTime<Utc>) -> Result<u64, RepoError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Notifications (append-only)
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends one notification row for a recipient.
    async fn save_notification(
        &self,
        user_id: UserId,
        role: RecipientRole,
        kind: NotificationType,
        message: &str,
    ) -> Result<(), RepoError>;

    /// Lists notifications for a user, newest first.
    async fn list_notifications_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, RepoError>;
}
