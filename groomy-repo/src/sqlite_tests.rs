//! SQLite repository integration tests.

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

    use groomy_types::{
        ConfirmReservationRecord, CustomerId, DogId, GroomerId, NotificationType, PaymentStatus,
        Quote, QuoteId, QuoteRequest, QuoteRequestId, QuoteRequestStatus, QuoteStatus,
        RecipientRole, RepoError, RequestScope, ReservationRepository, ReservationStatus, UserId,
    };

    use crate::SqliteRepo;

    async fn setup_repo() -> SqliteRepo {
        SqliteRepo::new("sqlite::memory:").await.unwrap()
    }

    fn beauty_date() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    /// One complete customer/groomer/dog/request/quote line.
    struct Line {
        quote: Quote,
        request_id: QuoteRequestId,
        customer_id: CustomerId,
        customer_user_id: UserId,
        groomer_user_id: UserId,
    }

    async fn seed_line(repo: &SqliteRepo, scope: RequestScope) -> Line {
        let customer_user_id = UserId::new();
        let groomer_user_id = UserId::new();
        let customer_id = CustomerId::new();
        let groomer_id = GroomerId::new();
        let dog_id = DogId::new();

        repo.seed_user(customer_user_id, "김철수", "철수네").await.unwrap();
        repo.seed_user(groomer_user_id, "박영희", "멍멍살롱").await.unwrap();
        repo.seed_customer(customer_id, customer_user_id).await.unwrap();
        repo.seed_groomer(groomer_id, groomer_user_id).await.unwrap();
        repo.seed_shop(groomer_id, "멍멍살롱 강남점").await.unwrap();
        repo.seed_dog(dog_id, customer_id, "초코").await.unwrap();

        let request = QuoteRequest {
            id: QuoteRequestId::new(),
            dog_id,
            content: "여름맞이 전체 미용".into(),
            beauty_date: beauty_date(),
            scope,
            status: QuoteRequestStatus::Open,
        };
        repo.seed_quote_request(&request).await.unwrap();

        let quote = Quote {
            id: QuoteId::new(),
            request_id: request.id,
            groomer_id,
            dog_id,
            content: "전체 미용 + 목욕".into(),
            cost: 55000,
            beauty_date: beauty_date(),
            status: QuoteStatus::Pending,
        };
        repo.seed_quote(&quote).await.unwrap();

        Line {
            quote,
            request_id: request.id,
            customer_id,
            customer_user_id,
            groomer_user_id,
        }
    }

    fn confirm_record(line: &Line, scope: RequestScope, payment_key: &str) -> ConfirmReservationRecord {
        ConfirmReservationRecord {
            quote_id: line.quote.id,
            request_id: line.request_id,
            customer_id: line.customer_id,
            request_scope: scope,
            payment_key: payment_key.to_string(),
            order_id: format!("order_{payment_key}"),
            amount: 55000,
            method: "카드".into(),
            approved_at: beauty_date(),
            payment_title: "멍멍살롱 강남점".into(),
        }
    }

    #[tokio::test]
    async fn test_find_quote_for_payment_projection() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::All).await;

        let view = repo
            .find_quote_for_payment(line.quote.id)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(view.quote_id, line.quote.id);
        assert_eq!(view.customer_id, line.customer_id);
        assert_eq!(view.customer_name, "김철수");
        assert_eq!(view.groomer_nickname, "멍멍살롱");
        assert_eq!(view.dog_name, "초코");
        assert_eq!(view.cost, 55000);
        assert_eq!(view.request_scope, RequestScope::All);
        assert_eq!(view.quote_status, QuoteStatus::Pending);
    }

    #[tokio::test]
    async fn test_find_quote_for_payment_missing() {
        let repo = setup_repo().await;

        let view = repo.find_quote_for_payment(QuoteId::new()).await.unwrap();

        assert!(view.is_none());
    }

    #[tokio::test]
    async fn test_confirm_reservation_applies_all_transitions() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::All).await;

        let selected_quote_id = repo
            .confirm_reservation(confirm_record(&line, RequestScope::All, "pay_1"))
            .await
            .unwrap();

        let selected = repo
            .find_selected_quote_by_quote(line.quote.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(selected.id, selected_quote_id);
        assert_eq!(selected.status, ReservationStatus::Reserved);

        let quote = repo.find_quote(line.quote.id).await.unwrap().unwrap();
        assert_eq!(quote.status, QuoteStatus::Accepted);

        let request_status = repo.find_request_status(line.request_id).await.unwrap().unwrap();
        assert_eq!(request_status, QuoteRequestStatus::DeadlineClosed);

        let payment = repo.find_payment_by_key("pay_1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.selected_quote_id, selected_quote_id);
        assert_eq!(payment.payment_title, "멍멍살롱 강남점");
        assert!(!payment.is_deleted);
    }

    #[tokio::test]
    async fn test_confirm_reservation_leaves_targeted_request_open() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::Targeted).await;

        repo.confirm_reservation(confirm_record(&line, RequestScope::Targeted, "pay_1"))
            .await
            .unwrap();

        let request_status = repo.find_request_status(line.request_id).await.unwrap().unwrap();
        assert_eq!(request_status, QuoteRequestStatus::Open);
    }

    #[tokio::test]
    async fn test_confirm_reservation_twice_conflicts() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::All).await;

        repo.confirm_reservation(confirm_record(&line, RequestScope::All, "pay_1"))
            .await
            .unwrap();

        let err = repo
            .confirm_reservation(confirm_record(&line, RequestScope::All, "pay_2"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Conflict(_)));
        // The losing attempt must not leave a second payment behind.
        assert!(repo.find_payment_by_key("pay_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_confirmations_exactly_one_wins() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::All).await;

        let record_a = confirm_record(&line, RequestScope::All, "pay_a");
        let record_b = confirm_record(&line, RequestScope::All, "pay_b");

        let repo_a = repo.clone();
        let repo_b = repo.clone();
        let (result_a, result_b) = tokio::join!(
            tokio::spawn(async move { repo_a.confirm_reservation(record_a).await }),
            tokio::spawn(async move { repo_b.confirm_reservation(record_b).await }),
        );

        let results = [result_a.unwrap(), result_b.unwrap()];
        let wins = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        assert!(
            results
                .iter()
                .any(|r| matches!(r, Err(RepoError::Conflict(_))))
        );
    }

    #[tokio::test]
    async fn test_cancel_reservation_updates_both_rows() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::All).await;
        repo.confirm_reservation(confirm_record(&line, RequestScope::All, "pay_1"))
            .await
            .unwrap();

        let view = repo.cancel_reservation("pay_1", "미용사 사정").await.unwrap();

        assert_eq!(view.payment.status, PaymentStatus::Cancelled);
        assert_eq!(view.payment.cancel_reason.as_deref(), Some("미용사 사정"));
        assert_eq!(view.dog_name, "초코");
        assert_eq!(view.cost, 55000);
        assert_eq!(view.customer_user_id, line.customer_user_id);
        assert_eq!(view.groomer_user_id, line.groomer_user_id);

        let selected = repo
            .find_selected_quote_by_quote(line.quote.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(selected.status, ReservationStatus::Cancelled);

        let payment = repo.find_payment_by_key("pay_1").await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_cancel_reservation_unknown_key_mutates_nothing() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::All).await;
        repo.confirm_reservation(confirm_record(&line, RequestScope::All, "pay_1"))
            .await
            .unwrap();

        let err = repo.cancel_reservation("missing", "사유").await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));

        let selected = repo
            .find_selected_quote_by_quote(line.quote.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(selected.status, ReservationStatus::Reserved);
    }

    #[tokio::test]
    async fn test_purge_only_removes_expired_deleted_payments() {
        let repo = setup_repo().await;

        let old_line = seed_line(&repo, RequestScope::All).await;
        repo.confirm_reservation(confirm_record(&old_line, RequestScope::All, "pay_old"))
            .await
            .unwrap();
        repo.mark_payment_deleted("pay_old").await.unwrap();
        repo.backdate_payment("pay_old", Utc::now() - Duration::days(40))
            .await
            .unwrap();

        let recent_line = seed_line(&repo, RequestScope::All).await;
        repo.confirm_reservation(confirm_record(&recent_line, RequestScope::All, "pay_recent"))
            .await
            .unwrap();
        repo.mark_payment_deleted("pay_recent").await.unwrap();
        repo.backdate_payment("pay_recent", Utc::now() - Duration::days(10))
            .await
            .unwrap();

        let live_line = seed_line(&repo, RequestScope::All).await;
        repo.confirm_reservation(confirm_record(&live_line, RequestScope::All, "pay_live"))
            .await
            .unwrap();
        repo.backdate_payment("pay_live", Utc::now() - Duration::days(40))
            .await
            .unwrap();

        let purged = repo
            .purge_expired_payments(Utc::now() - Duration::days(30))
            .await
            .unwrap();

        assert_eq!(purged, 1);
        assert!(repo.find_payment_by_key("pay_old").await.unwrap().is_none());
        assert!(repo.find_payment_by_key("pay_recent").await.unwrap().is_some());
        assert!(repo.find_payment_by_key("pay_live").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_mark_payment_deleted_unknown_key() {
        let repo = setup_repo().await;

        let err = repo.mark_payment_deleted("missing").await.unwrap_err();

        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_status_display_name_lookup() {
        let repo = setup_repo().await;

        let name = repo.status_display_name("020", "300").await.unwrap();
        assert_eq!(name.as_deref(), Some("결제 완료"));

        let name = repo.status_display_name("030", "300").await.unwrap();
        assert_eq!(name.as_deref(), Some("결제 취소"));

        let name = repo.status_display_name("999", "300").await.unwrap();
        assert!(name.is_none());
    }

    #[tokio::test]
    async fn test_notifications_append_and_list() {
        let repo = setup_repo().await;
        let user_id = UserId::new();

        repo.save_notification(
            user_id,
            RecipientRole::Customer,
            NotificationType::Reservation,
            "예약이 완료되었습니다.",
        )
        .await
        .unwrap();
        repo.save_notification(
            user_id,
            RecipientRole::Customer,
            NotificationType::Cancellation,
            "예약이 취소되었습니다.",
        )
        .await
        .unwrap();

        let notifications = repo.list_notifications_for_user(user_id).await.unwrap();

        assert_eq!(notifications.len(), 2);
        assert!(
            notifications
                .iter()
                .any(|n| n.notification_type == NotificationType::Reservation.description())
        );

        let other = repo
            .list_notifications_for_user(UserId::new())
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_shop_lookup() {
        let repo = setup_repo().await;
        let line = seed_line(&repo, RequestScope::All).await;

        let view = repo
            .find_quote_for_payment(line.quote.id)
            .await
            .unwrap()
            .unwrap();
        let shop = repo
            .find_shop_name_by_groomer(view.groomer_id)
            .await
            .unwrap();

        assert_eq!(shop.as_deref(), Some("멍멍살롱 강남점"));

        let missing = repo.find_shop_name_by_groomer(GroomerId::new()).await.unwrap();
        assert!(missing.is_none());
    }
}
