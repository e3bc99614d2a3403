//! Notification dispatch.
//!
//! The payment workflows publish value-type reservation events strictly
//! after their transactions commit; this worker consumes them off the
//! request path and appends one notification row per counterparty.
//! Delivery is at-least-once per recipient: a failed save for one
//! recipient is logged and does not undo the other - there is no
//! cross-recipient atomicity.

use tokio::sync::mpsc;
use tracing::{error, info, instrument};

use groomy_types::{
    NotificationType, RecipientRole, ReservationCancelled, ReservationConfirmed,
    ReservationEvent, ReservationRepository, UserId,
};

/// Sending half handed to the orchestrator.
///
/// `publish` is fire-and-forget: it never blocks the caller and holds no
/// lock owned by the payment transaction.
#[derive(Clone)]
pub struct EventPublisher {
    tx: mpsc::UnboundedSender<ReservationEvent>,
}

impl EventPublisher {
    pub fn new(tx: mpsc::UnboundedSender<ReservationEvent>) -> Self {
        Self { tx }
    }

    pub fn publish(&self, event: ReservationEvent) {
        if self.tx.send(event).is_err() {
            error!("notification worker is gone, dropping reservation event");
        }
    }
}

/// Creates a connected publisher/worker pair.
pub fn channel<R: ReservationRepository>(repo: R) -> (EventPublisher, NotificationWorker<R>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventPublisher::new(tx), NotificationWorker { repo, rx })
}

/// Consumes reservation events and persists notifications.
pub struct NotificationWorker<R: ReservationRepository> {
    repo: R,
    rx: mpsc::UnboundedReceiver<ReservationEvent>,
}

impl<R: ReservationRepository> NotificationWorker<R> {
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!("Starting notification worker");
        while let Some(event) = self.rx.recv().await {
            match event {
                ReservationEvent::Confirmed(event) => self.handle_confirmed(event).await,
                ReservationEvent::Cancelled(event) => self.handle_cancelled(event).await,
            }
        }
        info!("Notification channel closed, stopping worker");
    }

    async fn handle_confirmed(&self, event: ReservationConfirmed) {
        info!(
            customer = %event.customer_user_id,
            groomer = %event.groomer_user_id,
            "handling reservation-confirmed event"
        );

        let (customer_message, groomer_message) = confirmed_messages(&event);
        self.save(
            event.customer_user_id,
            RecipientRole::Customer,
            NotificationType::Reservation,
            &customer_message,
        )
        .await;
        self.save(
            event.groomer_user_id,
            RecipientRole::Groomer,
            NotificationType::Reservation,
            &groomer_message,
        )
        .await;
    }

    async fn handle_cancelled(&self, event: ReservationCancelled) {
        info!(
            customer = %event.customer_user_id,
            groomer = %event.groomer_user_id,
            "handling reservation-cancelled event"
        );

        let (customer_message, groomer_message) = cancelled_messages(&event);
        self.save(
            event.customer_user_id,
            RecipientRole::Customer,
            NotificationType::Cancellation,
            &customer_message,
        )
        .await;
        self.save(
            event.groomer_user_id,
            RecipientRole::Groomer,
            NotificationType::Cancellation,
            &groomer_message,
        )
        .await;
    }

    async fn save(
        &self,
        user_id: UserId,
        role: RecipientRole,
        kind: NotificationType,
        message: &str,
    ) {
        if let Err(err) = self.repo.save_notification(user_id, role, kind, message).await {
            error!(%user_id, role = %role, error = %err, "failed to persist notification");
        }
    }
}

fn confirmed_messages(event: &ReservationConfirmed) -> (String, String) {
    let customer = format!(
        "예약이 완료되었습니다. 미용사: {}, 강아지: {}, 비용: {}원, 미용 날짜: {}",
        event.groomer_nickname, event.dog_name, event.amount, event.beauty_date
    );
    let groomer = format!(
        "예약이 완료되었습니다. 고객: {}, 강아지: {}, 비용: {}원, 미용 날짜: {}",
        event.customer_name, event.dog_name, event.amount, event.beauty_date
    );
    (customer, groomer)
}

fn cancelled_messages(event: &ReservationCancelled) -> (String, String) {
    let customer = format!(
        "예약이 취소되었습니다. 미용사: {}, 강아지: {}, 취소 비용: {}원, 취소 사유: {}",
        event.groomer_nickname, event.dog_name, event.cost, event.cancel_reason
    );
    let groomer = format!(
        "예약이 취소되었습니다. 고객: {}, 강아지: {}, 취소 비용: {}원, 취소 사유: {}",
        event.customer_name, event.dog_name, event.cost, event.cancel_reason
    );
    (customer, groomer)
}
