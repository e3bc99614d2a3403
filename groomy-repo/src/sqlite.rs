//! SQLite repository adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use uuid::Uuid;

use groomy_types::{
    CancellationView, ConfirmReservationRecord, CustomerId, DogId, GroomerId, Notification,
    NotificationType, Payment, PaymentStatus, Quote, QuoteId, QuotePaymentView, QuoteRequest,
    QuoteStatus, QuoteRequestStatus, RecipientRole, RepoError, RequestScope, ReservationRepository,
    ReservationStatus, SelectedQuote, SelectedQuoteId, UserId,
};

use crate::types::{
    DbCancellationRow, DbCommonName, DbNotification, DbPayment, DbQuote, DbQuotePaymentView,
    DbSelectedQuote, format_naive,
};

// ─────────────────────────────────────────────────────────────────────────────
// SQLite Repository
// ─────────────────────────────────────────────────────────────────────────────

/// SQLite repository implementation.
#[derive(Clone)]
pub struct SqliteRepo {
    pool: SqlitePool,
}

impl SqliteRepo {
    /// Creates a new SQLite repository with automatic migration.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        // Ensure on-disk SQLite target directory exists (no-op for in-memory).
        if let Some(path) = database_url.strip_prefix("sqlite://") {
            // Remove query parameters
            let path = path.split('?').next().unwrap_or(path);
            if path != ":memory:" {
                let p = std::path::Path::new(path);
                if let Some(parent) = p.parent() {
                    if !parent.as_os_str().is_empty() {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        // An in-memory SQLite database exists per connection, so the pool
        // must stay on a single connection to see one database.
        let pool = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await?
        } else {
            SqlitePool::connect_with(options).await?
        };

        // Run migration from migration file
        let ddl = include_str!("../migrations/0001_create_tables.sql");
        sqlx::raw_sql(ddl).execute(&pool).await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn map_unique_violation(e: sqlx::Error, conflict_message: &str) -> RepoError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepoError::Conflict(conflict_message.to_string())
        }
        _ => RepoError::Database(e.to_string()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl ReservationRepository for SqliteRepo {
    async fn find_quote_for_payment(
        &self,
        id: QuoteId,
    ) -> Result<Option<QuotePaymentView>, RepoError> {
        let row: Option<DbQuotePaymentView> = sqlx::query_as(
            r#"SELECT q.id AS quote_id, q.request_id, q.groomer_id, d.customer_id,
                      c.user_id AS customer_user_id, cu.user_name AS customer_name,
                      g.user_id AS groomer_user_id, gu.nickname AS groomer_nickname,
                      d.dog_name, q.cost, q.beauty_date, q.status AS quote_status,
                      r.request_type AS request_scope, r.status AS request_status
               FROM quotes q
               JOIN quote_requests r ON r.id = q.request_id
               JOIN dogs d ON d.id = q.dog_id
               JOIN customers c ON c.id = d.customer_id
               JOIN users cu ON cu.id = c.user_id
               JOIN groomers g ON g.id = q.groomer_id
               JOIN users gu ON gu.id = g.user_id
               WHERE q.id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbQuotePaymentView::into_domain).transpose()
    }

    async fn find_selected_quote_by_quote(
        &self,
        quote_id: QuoteId,
    ) -> Result<Option<SelectedQuote>, RepoError> {
        let row: Option<DbSelectedQuote> = sqlx::query_as(
            r#"SELECT id, quote_id, customer_id, status, created_at
               FROM selected_quotes WHERE quote_id = ?"#,
        )
        .bind(quote_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbSelectedQuote::into_domain).transpose()
    }

    async fn find_shop_name_by_groomer(
        &self,
        groomer_id: GroomerId,
    ) -> Result<Option<String>, RepoError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT shop_name FROM shops WHERE groomer_id = ?"#)
                .bind(groomer_id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.map(|(name,)| name))
    }

    async fn find_payment_by_key(
        &self,
        payment_key: &str,
    ) -> Result<Option<Payment>, RepoError> {
        let row: Option<DbPayment> = sqlx::query_as(
            r#"SELECT id, payment_key, order_id, amount, method, status, approved_at,
                      cancel_reason, payment_title, selected_quote_id, is_deleted, updated_at
               FROM payments WHERE payment_key = ?"#,
        )
        .bind(payment_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbPayment::into_domain).transpose()
    }

    async fn status_display_name(
        &self,
        code: &str,
        group: &str,
    ) -> Result<Option<String>, RepoError> {
        let row: Option<DbCommonName> = sqlx::query_as(
            r#"SELECT common_name FROM common_codes WHERE code = ? AND group_code = ?"#,
        )
        .bind(code)
        .bind(group)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(row.map(|r| r.common_name))
    }

    async fn confirm_reservation(
        &self,
        record: ConfirmReservationRecord,
    ) -> Result<SelectedQuoteId, RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let selected_quote_id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        // The unique key on quote_id is the real duplicate-reservation
        // guard; the service-level pre-check is only a fast path.
        sqlx::query(
            r#"INSERT INTO selected_quotes (id, quote_id, customer_id, status, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(selected_quote_id.to_string())
        .bind(record.quote_id.to_string())
        .bind(record.customer_id.to_string())
        .bind(ReservationStatus::Reserved.code())
        .bind(&now)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| map_unique_violation(e, "해당 견적서는 이미 예약되었습니다."))?;

        sqlx::query(r#"UPDATE quotes SET status = ? WHERE id = ?"#)
            .bind(QuoteStatus::Accepted.code())
            .bind(record.quote_id.to_string())
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        // Only an all-groomers request is deadline-closed; a targeted one
        // stays open since a single groomer could respond anyway.
        if record.request_scope == RequestScope::All {
            sqlx::query(r#"UPDATE quote_requests SET status = ? WHERE id = ?"#)
                .bind(QuoteRequestStatus::DeadlineClosed.code())
                .bind(record.request_id.to_string())
                .execute(&mut *db_tx)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;
        }

        sqlx::query(
            r#"INSERT INTO payments (id, payment_key, order_id, amount, method, status,
                                     approved_at, cancel_reason, payment_title,
                                     selected_quote_id, is_deleted, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, NULL, ?, ?, 0, ?)"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&record.payment_key)
        .bind(&record.order_id)
        .bind(record.amount)
        .bind(&record.method)
        .bind(PaymentStatus::Completed.code())
        .bind(format_naive(record.approved_at))
        .bind(&record.payment_title)
        .bind(selected_quote_id.to_string())
        .bind(&now)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| map_unique_violation(e, "이미 결제된 견적서입니다."))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        Ok(SelectedQuoteId::from_uuid(selected_quote_id))
    }

    async fn cancel_reservation(
        &self,
        payment_key: &str,
        cancel_reason: &str,
    ) -> Result<CancellationView, RepoError> {
        let mut db_tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        let row: Option<DbCancellationRow> = sqlx::query_as(
            r#"SELECT p.id, p.payment_key, p.order_id, p.amount, p.method, p.status,
                      p.approved_at, p.cancel_reason, p.payment_title, p.selected_quote_id,
                      p.is_deleted, p.updated_at,
                      c.user_id AS customer_user_id, cu.user_name AS customer_name,
                      g.user_id AS groomer_user_id, gu.nickname AS groomer_nickname,
                      d.dog_name, q.cost
               FROM payments p
               JOIN selected_quotes sq ON sq.id = p.selected_quote_id
               JOIN quotes q ON q.id = sq.quote_id
               JOIN dogs d ON d.id = q.dog_id
               JOIN customers c ON c.id = sq.customer_id
               JOIN users cu ON cu.id = c.user_id
               JOIN groomers g ON g.id = q.groomer_id
               JOIN users gu ON gu.id = g.user_id
               WHERE p.payment_key = ?"#,
        )
        .bind(payment_key)
        .fetch_optional(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        let mut view = row.ok_or(RepoError::NotFound)?.into_domain()?;

        let now = Utc::now();
        sqlx::query(
            r#"UPDATE payments SET status = ?, cancel_reason = ?, updated_at = ?
               WHERE payment_key = ?"#,
        )
        .bind(PaymentStatus::Cancelled.code())
        .bind(cancel_reason)
        .bind(now.to_rfc3339())
        .bind(payment_key)
        .execute(&mut *db_tx)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        sqlx::query(r#"UPDATE selected_quotes SET status = ? WHERE id = ?"#)
            .bind(ReservationStatus::Cancelled.code())
            .bind(view.selected_quote_id.to_string())
            .execute(&mut *db_tx)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;

        db_tx
            .commit()
            .await
            .map_err(|e| RepoError::Transaction(e.to_string()))?;

        view.payment.status = PaymentStatus::Cancelled;
        view.payment.cancel_reason = Some(cancel_reason.to_string());
        view.payment.updated_at = now;

        Ok(view)
    }

    async fn mark_payment_deleted(&self, payment_key: &str) -> Result<(), RepoError> {
        let result = sqlx::query(
            r#"UPDATE payments SET is_deleted = 1, updated_at = ? WHERE payment_key = ?"#,
        )
        .bind(Utc::now().to_rfc3339())
        .bind(payment_key)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }

    async fn purge_expired_payments(&self, cutoff: DateTime<Utc>) -> Result<u64, RepoError> {
        let result =
            sqlx::query(r#"DELETE FROM payments WHERE is_deleted = 1 AND updated_at < ?"#)
                .bind(cutoff.to_rfc3339())
                .execute(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn save_notification(
        &self,
        user_id: UserId,
        role: RecipientRole,
        kind: NotificationType,
        message: &str,
    ) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO notifications (id, user_id, role, notification_type, message, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id.to_string())
        .bind(role.as_str())
        .bind(kind.description())
        .bind(message)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(())
    }

    async fn list_notifications_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<Notification>, RepoError> {
        let rows: Vec<DbNotification> = sqlx::query_as(
            r#"SELECT id, user_id, role, notification_type, message, created_at
               FROM notifications WHERE user_id = ? ORDER BY created_at DESC"#,
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        rows.into_iter().map(DbNotification::into_domain).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixture helpers (seeding and verification; used by tests and local setup)
// ─────────────────────────────────────────────────────────────────────────────

impl SqliteRepo {
    pub async fn seed_user(
        &self,
        id: UserId,
        user_name: &str,
        nickname: &str,
    ) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO users (id, user_name, nickname) VALUES (?, ?, ?)"#)
            .bind(id.to_string())
            .bind(user_name)
            .bind(nickname)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn seed_customer(&self, id: CustomerId, user_id: UserId) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO customers (id, user_id) VALUES (?, ?)"#)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn seed_groomer(&self, id: GroomerId, user_id: UserId) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO groomers (id, user_id) VALUES (?, ?)"#)
            .bind(id.to_string())
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn seed_shop(
        &self,
        groomer_id: GroomerId,
        shop_name: &str,
    ) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO shops (id, groomer_id, shop_name) VALUES (?, ?, ?)"#)
            .bind(Uuid::new_v4().to_string())
            .bind(groomer_id.to_string())
            .bind(shop_name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn seed_dog(
        &self,
        id: DogId,
        customer_id: CustomerId,
        dog_name: &str,
    ) -> Result<(), RepoError> {
        sqlx::query(r#"INSERT INTO dogs (id, customer_id, dog_name) VALUES (?, ?, ?)"#)
            .bind(id.to_string())
            .bind(customer_id.to_string())
            .bind(dog_name)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn seed_quote_request(&self, request: &QuoteRequest) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO quote_requests (id, dog_id, content, beauty_date, request_type, status)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(request.id.to_string())
        .bind(request.dog_id.to_string())
        .bind(&request.content)
        .bind(format_naive(request.beauty_date))
        .bind(request.scope.code())
        .bind(request.status.code())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn seed_quote(&self, quote: &Quote) -> Result<(), RepoError> {
        sqlx::query(
            r#"INSERT INTO quotes (id, request_id, groomer_id, dog_id, content, cost, beauty_date, status)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(quote.id.to_string())
        .bind(quote.request_id.to_string())
        .bind(quote.groomer_id.to_string())
        .bind(quote.dog_id.to_string())
        .bind(&quote.content)
        .bind(quote.cost)
        .bind(format_naive(quote.beauty_date))
        .bind(quote.status.code())
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }

    /// Fetches a quote row, for post-workflow assertions.
    pub async fn find_quote(&self, id: QuoteId) -> Result<Option<Quote>, RepoError> {
        let row: Option<DbQuote> = sqlx::query_as(
            r#"SELECT id, request_id, groomer_id, dog_id, content, cost, beauty_date, status
               FROM quotes WHERE id = ?"#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(DbQuote::into_domain).transpose()
    }

    /// Fetches a quote request's status code, for post-workflow assertions.
    pub async fn find_request_status(
        &self,
        id: groomy_types::QuoteRequestId,
    ) -> Result<Option<QuoteRequestStatus>, RepoError> {
        let row: Option<(String,)> =
            sqlx::query_as(r#"SELECT status FROM quote_requests WHERE id = ?"#)
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| RepoError::Database(e.to_string()))?;

        row.map(|(code,)| crate::types::parse_request_status(&code))
            .transpose()
    }

    /// Backdates a payment's `updated_at`, for retention-sweep tests.
    pub async fn backdate_payment(
        &self,
        payment_key: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        sqlx::query(r#"UPDATE payments SET updated_at = ? WHERE payment_key = ?"#)
            .bind(updated_at.to_rfc3339())
            .bind(payment_key)
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::Database(e.to_string()))?;
        Ok(())
    }
}
