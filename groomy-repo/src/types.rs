//! Database row structs and domain conversions.
//!
//! SQLite stores uuids and timestamps as TEXT; rows parse them back on the
//! way out. Status columns hold the two-digit legacy codes.

use sqlx::FromRow;

use groomy_types::{
    CancellationView, CustomerId, DogId, DomainError, GroomerId, Notification, NotificationId,
    Payment, PaymentId, PaymentStatus, Quote, QuoteId, QuotePaymentView, QuoteRequestId,
    QuoteRequestStatus, QuoteStatus, RecipientRole, RepoError, RequestScope, ReservationStatus,
    SelectedQuote, SelectedQuoteId, UserId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Parsing helpers
// ─────────────────────────────────────────────────────────────────────────────

pub fn parse_uuid(s: &str) -> Result<uuid::Uuid, RepoError> {
    uuid::Uuid::parse_str(s).map_err(|e| RepoError::Database(e.to_string()))
}

pub fn parse_utc(s: &str) -> Result<chrono::DateTime<chrono::Utc>, RepoError> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| RepoError::Database(e.to_string()))
}

/// Naive datetimes (beauty_date, approved_at) are stored as
/// `YYYY-MM-DD HH:MM:SS`.
pub fn parse_naive(s: &str) -> Result<chrono::NaiveDateTime, RepoError> {
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| RepoError::Database(e.to_string()))
}

pub fn format_naive(dt: chrono::NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn unknown_code(code: &str, group: &str) -> RepoError {
    RepoError::Domain(DomainError::UnknownStatusCode {
        code: code.to_string(),
        group: group.to_string(),
    })
}

pub fn parse_payment_status(code: &str) -> Result<PaymentStatus, RepoError> {
    PaymentStatus::from_code(code).ok_or_else(|| unknown_code(code, "payment"))
}

pub fn parse_reservation_status(code: &str) -> Result<ReservationStatus, RepoError> {
    ReservationStatus::from_code(code).ok_or_else(|| unknown_code(code, "reservation"))
}

pub fn parse_quote_status(code: &str) -> Result<QuoteStatus, RepoError> {
    QuoteStatus::from_code(code).ok_or_else(|| unknown_code(code, "quote"))
}

pub fn parse_request_status(code: &str) -> Result<QuoteRequestStatus, RepoError> {
    QuoteRequestStatus::from_code(code).ok_or_else(|| unknown_code(code, "quote_request"))
}

pub fn parse_request_scope(code: &str) -> Result<RequestScope, RepoError> {
    RequestScope::from_code(code).ok_or_else(|| unknown_code(code, "request_type"))
}

fn parse_role(s: &str) -> Result<RecipientRole, RepoError> {
    match s {
        "customer" => Ok(RecipientRole::Customer),
        "groomer" => Ok(RecipientRole::Groomer),
        _ => Err(RepoError::Database(format!("Unknown recipient role: {s}"))),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Row structs
// ─────────────────────────────────────────────────────────────────────────────

/// Joined projection row for the confirmation workflow.
#[derive(FromRow)]
pub struct DbQuotePaymentView {
    pub quote_id: String,
    pub request_id: String,
    pub groomer_id: String,
    pub customer_id: String,
    pub customer_user_id: String,
    pub customer_name: String,
    pub groomer_user_id: String,
    pub groomer_nickname: String,
    pub dog_name: String,
    pub cost: i64,
    pub beauty_date: String,
    pub quote_status: String,
    pub request_scope: String,
    pub request_status: String,
}

impl DbQuotePaymentView {
    pub fn into_domain(self) -> Result<QuotePaymentView, RepoError> {
        Ok(QuotePaymentView {
            quote_id: QuoteId::from_uuid(parse_uuid(&self.quote_id)?),
            request_id: QuoteRequestId::from_uuid(parse_uuid(&self.request_id)?),
            groomer_id: GroomerId::from_uuid(parse_uuid(&self.groomer_id)?),
            customer_id: CustomerId::from_uuid(parse_uuid(&self.customer_id)?),
            customer_user_id: UserId::from_uuid(parse_uuid(&self.customer_user_id)?),
            customer_name: self.customer_name,
            groomer_user_id: UserId::from_uuid(parse_uuid(&self.groomer_user_id)?),
            groomer_nickname: self.groomer_nickname,
            dog_name: self.dog_name,
            cost: self.cost,
            beauty_date: parse_naive(&self.beauty_date)?,
            quote_status: parse_quote_status(&self.quote_status)?,
            request_scope: parse_request_scope(&self.request_scope)?,
            request_status: parse_request_status(&self.request_status)?,
        })
    }
}

/// Quote row (fixture and verification queries).
#[derive(FromRow)]
pub struct DbQuote {
    pub id: String,
    pub request_id: String,
    pub groomer_id: String,
    pub dog_id: String,
    pub content: String,
    pub cost: i64,
    pub beauty_date: String,
    pub status: String,
}

impl DbQuote {
    pub fn into_domain(self) -> Result<Quote, RepoError> {
        Ok(Quote {
            id: QuoteId::from_uuid(parse_uuid(&self.id)?),
            request_id: QuoteRequestId::from_uuid(parse_uuid(&self.request_id)?),
            groomer_id: GroomerId::from_uuid(parse_uuid(&self.groomer_id)?),
            dog_id: DogId::from_uuid(parse_uuid(&self.dog_id)?),
            content: self.content,
            cost: self.cost,
            beauty_date: parse_naive(&self.beauty_date)?,
            status: parse_quote_status(&self.status)?,
        })
    }
}

/// Reservation row.
#[derive(FromRow)]
pub struct DbSelectedQuote {
    pub id: String,
    pub quote_id: String,
    pub customer_id: String,
    pub status: String,
    pub created_at: String,
}

impl DbSelectedQuote {
    pub fn into_domain(self) -> Result<SelectedQuote, RepoError> {
        Ok(SelectedQuote {
            id: SelectedQuoteId::from_uuid(parse_uuid(&self.id)?),
            quote_id: QuoteId::from_uuid(parse_uuid(&self.quote_id)?),
            customer_id: CustomerId::from_uuid(parse_uuid(&self.customer_id)?),
            status: parse_reservation_status(&self.status)?,
            created_at: parse_utc(&self.created_at)?,
        })
    }
}

/// Payment row.
#[derive(FromRow)]
pub struct DbPayment {
    pub id: String,
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
    pub method: String,
    pub status: String,
    pub approved_at: String,
    pub cancel_reason: Option<String>,
    pub payment_title: String,
    pub selected_quote_id: String,
    pub is_deleted: i64,
    pub updated_at: String,
}

impl DbPayment {
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        Ok(Payment {
            id: PaymentId::from_uuid(parse_uuid(&self.id)?),
            payment_key: self.payment_key,
            order_id: self.order_id,
            amount: self.amount,
            method: self.method,
            status: parse_payment_status(&self.status)?,
            approved_at: parse_naive(&self.approved_at)?,
            cancel_reason: self.cancel_reason,
            payment_title: self.payment_title,
            selected_quote_id: SelectedQuoteId::from_uuid(parse_uuid(&self.selected_quote_id)?),
            is_deleted: self.is_deleted != 0,
            updated_at: parse_utc(&self.updated_at)?,
        })
    }
}

/// Joined row for the cancellation workflow: payment plus counterparty
/// identity.
#[derive(FromRow)]
pub struct DbCancellationRow {
    // payment columns
    pub id: String,
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
    pub method: String,
    pub status: String,
    pub approved_at: String,
    pub cancel_reason: Option<String>,
    pub payment_title: String,
    pub selected_quote_id: String,
    pub is_deleted: i64,
    pub updated_at: String,
    // counterparty columns
    pub customer_user_id: String,
    pub customer_name: String,
    pub groomer_user_id: String,
    pub groomer_nickname: String,
    pub dog_name: String,
    pub cost: i64,
}

impl DbCancellationRow {
    pub fn into_domain(self) -> Result<CancellationView, RepoError> {
        let payment = DbPayment {
            id: self.id,
            payment_key: self.payment_key,
            order_id: self.order_id,
            amount: self.amount,
            method: self.method,
            status: self.status,
            approved_at: self.approved_at,
            cancel_reason: self.cancel_reason,
            payment_title: self.payment_title,
            selected_quote_id: self.selected_quote_id,
            is_deleted: self.is_deleted,
            updated_at: self.updated_at,
        }
        .into_domain()?;

        let selected_quote_id = payment.selected_quote_id;
        Ok(CancellationView {
            payment,
            selected_quote_id,
            customer_user_id: UserId::from_uuid(parse_uuid(&self.customer_user_id)?),
            customer_name: self.customer_name,
            groomer_user_id: UserId::from_uuid(parse_uuid(&self.groomer_user_id)?),
            groomer_nickname: self.groomer_nickname,
            dog_name: self.dog_name,
            cost: self.cost,
        })
    }
}

/// Notification row.
#[derive(FromRow)]
pub struct DbNotification {
    pub id: String,
    pub user_id: String,
    pub role: String,
    pub notification_type: String,
    pub message: String,
    pub created_at: String,
}

impl DbNotification {
    pub fn into_domain(self) -> Result<Notification, RepoError> {
        Ok(Notification {
            id: NotificationId::from_uuid(parse_uuid(&self.id)?),
            user_id: UserId::from_uuid(parse_uuid(&self.user_id)?),
            role: parse_role(&self.role)?,
            notification_type: self.notification_type,
            message: self.message,
            created_at: parse_utc(&self.created_at)?,
        })
    }
}

/// Display-name-only row for the common-code lookup.
#[derive(FromRow)]
pub struct DbCommonName {
    pub common_name: String,
}
