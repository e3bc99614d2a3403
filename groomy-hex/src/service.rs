//! Reservation Payment Application Service
//!
//! Orchestrates the payment confirmation/cancellation workflows through
//! the repository and gateway ports. Contains NO infrastructure logic -
//! pure business orchestration.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::Value;
use tracing::info;

use groomy_types::{
    AppError, ConfirmReservationRecord, PAYMENT_STATUS_GROUP, PaymentCancelRequest,
    PaymentCancelResponse, PaymentConfirmRequest, PaymentGateway, PaymentResponse, PaymentStatus,
    RepoError, ReservationCancelled, ReservationConfirmed, ReservationEvent,
    ReservationRepository,
};

use crate::notifier::EventPublisher;

/// Retention window (days) for logically deleted payments.
pub const RETENTION_DAYS: i64 = 30;

const UNKNOWN_STATUS_NAME: &str = "알 수 없는 상태";

/// Application service for reservation payments.
///
/// Generic over `R: ReservationRepository` and `G: PaymentGateway` - the
/// adapters are injected at compile time. This enables:
/// - Swapping adapters without code changes
/// - Testing with in-memory repo and scripted gateway
/// - Compile-time checks for port implementation
pub struct ReservationPaymentService<R: ReservationRepository, G: PaymentGateway> {
    repo: R,
    gateway: G,
    events: EventPublisher,
}

impl<R: ReservationRepository, G: PaymentGateway> ReservationPaymentService<R, G> {
    /// Creates a new service with the given adapters and event publisher.
    pub fn new(repo: R, gateway: G, events: EventPublisher) -> Self {
        Self {
            repo,
            gateway,
            events,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Confirmation workflow
    // ─────────────────────────────────────────────────────────────────────────

    /// Confirms a checkout payment and creates the reservation.
    ///
    /// The repository applies every state transition in one transaction;
    /// the reservation-confirmed event is published only after that
    /// transaction has committed, so a failure anywhere leaves no state
    /// change and no notification.
    pub async fn confirm_payment(
        &self,
        request: PaymentConfirmRequest,
    ) -> Result<PaymentResponse, AppError> {
        let quote = self
            .repo
            .find_quote_for_payment(request.quote_id)
            .await?
            .ok_or_else(|| AppError::entity_not_found("견적 데이터"))?;

        if quote.customer_id != request.customer_id {
            return Err(AppError::entity_not_found("고객 데이터"));
        }

        // Fast-path duplicate guard. The unique keys on the reservation and
        // payment tables stay the real arbiter for concurrent attempts.
        if self
            .repo
            .find_selected_quote_by_quote(request.quote_id)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest(
                "해당 견적서는 이미 예약되었습니다.".into(),
            ));
        }

        let shop_name = self
            .repo
            .find_shop_name_by_groomer(quote.groomer_id)
            .await?
            .ok_or_else(|| AppError::entity_not_found("샵 정보"))?;

        let payload = self
            .gateway
            .confirm(&request.payment_key, &request.order_id, request.amount)
            .await?;

        let (approved_at, method) = parse_confirmation(&payload)
            .ok_or_else(|| AppError::Internal("결제 승인 응답이 유효하지 않음".into()))?;

        let selected_quote_id = self
            .repo
            .confirm_reservation(ConfirmReservationRecord {
                quote_id: quote.quote_id,
                request_id: quote.request_id,
                customer_id: quote.customer_id,
                request_scope: quote.request_scope,
                payment_key: request.payment_key.clone(),
                order_id: request.order_id.clone(),
                amount: request.amount,
                method: method.clone(),
                approved_at: approved_at.naive_local(),
                payment_title: shop_name.clone(),
            })
            .await?;

        self.events
            .publish(ReservationEvent::Confirmed(ReservationConfirmed {
                customer_user_id: quote.customer_user_id,
                groomer_user_id: quote.groomer_user_id,
                customer_name: quote.customer_name,
                groomer_nickname: quote.groomer_nickname,
                dog_name: quote.dog_name,
                amount: request.amount,
                beauty_date: quote.beauty_date.format("%Y-%m-%d %H:%M").to_string(),
            }));

        let status = self.payment_status_name(PaymentStatus::Completed).await?;

        Ok(PaymentResponse {
            payment_key: request.payment_key,
            order_id: request.order_id,
            status,
            method,
            approved_at,
            amount: request.amount,
            selected_quote_id,
            payment_title: shop_name,
            message: "결제 승인 성공".into(),
            cancel_reason: None,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cancellation workflow
    // ─────────────────────────────────────────────────────────────────────────

    /// Cancels an approved payment and its reservation.
    ///
    /// NotFound/BadRequest surface unchanged; every other failure in the
    /// workflow is an internal error carrying the original message.
    pub async fn cancel_payment(
        &self,
        request: PaymentCancelRequest,
    ) -> Result<PaymentCancelResponse, AppError> {
        let payload = self
            .gateway
            .cancel(&request.payment_key, &request.cancel_reason)
            .await?;

        if !payload.is_object() {
            return Err(AppError::Internal("결제 취소 응답이 유효하지 않음".into()));
        }

        let view = self
            .repo
            .cancel_reservation(&request.payment_key, &request.cancel_reason)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => AppError::entity_not_found("결제 정보"),
                other => other.into(),
            })?;

        self.events
            .publish(ReservationEvent::Cancelled(ReservationCancelled {
                customer_user_id: view.customer_user_id,
                groomer_user_id: view.groomer_user_id,
                customer_name: view.customer_name,
                groomer_nickname: view.groomer_nickname,
                dog_name: view.dog_name,
                cost: view.cost,
                cancel_reason: request.cancel_reason.clone(),
            }));

        let status = self.payment_status_name(PaymentStatus::Cancelled).await?;

        Ok(PaymentCancelResponse {
            payment_key: request.payment_key,
            status,
            method: view.payment.method,
            cancel_reason: request.cancel_reason,
            selected_quote_id: view.selected_quote_id,
            message: "결제 취소 성공".into(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Payment history
    // ─────────────────────────────────────────────────────────────────────────

    /// Read-only payment detail lookup.
    pub async fn get_payment(&self, payment_key: &str) -> Result<PaymentResponse, AppError> {
        let payment = self
            .repo
            .find_payment_by_key(payment_key)
            .await?
            .ok_or_else(|| AppError::entity_not_found("결제 정보"))?;

        let status = self.payment_status_name(payment.status).await?;

        Ok(PaymentResponse {
            payment_key: payment.payment_key,
            order_id: payment.order_id,
            status,
            method: payment.method,
            approved_at: payment.approved_at.and_utc().fixed_offset(),
            amount: payment.amount,
            selected_quote_id: payment.selected_quote_id,
            payment_title: payment.payment_title,
            message: "결제 내역 조회 성공".into(),
            cancel_reason: payment.cancel_reason,
        })
    }

    /// Flags a payment as logically deleted; the retention sweep purges it
    /// after [`RETENTION_DAYS`].
    pub async fn delete_payment(&self, payment_key: &str) -> Result<(), AppError> {
        self.repo
            .mark_payment_deleted(payment_key)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => AppError::entity_not_found("결제 정보"),
                other => other.into(),
            })
    }

    /// Physically removes logically deleted payments past retention.
    pub async fn purge_expired_payments(&self) -> Result<u64, AppError> {
        purge_expired_payments(&self.repo).await
    }

    async fn payment_status_name(&self, status: PaymentStatus) -> Result<String, AppError> {
        Ok(self
            .repo
            .status_display_name(status.code(), PAYMENT_STATUS_GROUP)
            .await?
            .unwrap_or_else(|| UNKNOWN_STATUS_NAME.into()))
    }
}

/// Purges payments flagged deleted before the retention cutoff.
///
/// Shared between the service and the scheduled sweeper.
pub async fn purge_expired_payments<R: ReservationRepository>(repo: &R) -> Result<u64, AppError> {
    let cutoff = Utc::now() - chrono::Duration::days(RETENTION_DAYS);
    let purged = repo.purge_expired_payments(cutoff).await?;
    if purged > 0 {
        info!(purged, "purged expired logically deleted payments");
    }
    Ok(purged)
}

fn parse_confirmation(payload: &Value) -> Option<(DateTime<FixedOffset>, String)> {
    let approved_at = payload.get("approvedAt")?.as_str()?;
    let approved_at = DateTime::parse_from_rfc3339(approved_at).ok()?;
    let method = payload.get("method")?.as_str()?.to_string();
    Some((approved_at, method))
}
