use biblioteca::db;
use biblioteca::domain::DomainError;
use biblioteca::models::LoanStatus;
use biblioteca::models::loan::{CheckoutRequest, LoanUpdate};
use biblioteca::services::{inventory, loan_service};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

// Helper to create a test book with `copies` on the shelf
async fn create_test_book(db: &DatabaseConnection, title: &str, copies: i32) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let book = biblioteca::models::book::ActiveModel {
        title: Set(title.to_string()),
        author: Set("Test Author".to_string()),
        total_copies: Set(copies),
        available_copies: Set(copies),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = biblioteca::models::book::Entity::insert(book)
        .exec(db)
        .await
        .expect("Failed to create book");
    res.last_insert_id
}

// Helper to create a test member
async fn create_test_member(db: &DatabaseConnection, email: &str) -> i32 {
    let now = chrono::Utc::now().to_rfc3339();
    let member = biblioteca::models::member::ActiveModel {
        name: Set("Test Member".to_string()),
        email: Set(email.to_string()),
        member_type: Set("aluno".to_string()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let res = biblioteca::models::member::Entity::insert(member)
        .exec(db)
        .await
        .expect("Failed to create member");
    res.last_insert_id
}

async fn available_copies(db: &DatabaseConnection, book_id: i32) -> i32 {
    biblioteca::models::book::Entity::find_by_id(book_id)
        .one(db)
        .await
        .expect("Failed to load book")
        .expect("Book missing")
        .available_copies
}

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, 0, 0))
        .expect("valid date")
}

fn request(book_id: i32, member_id: i32, days: Option<i64>) -> CheckoutRequest {
    CheckoutRequest {
        book_id: Some(book_id),
        member_id: Some(member_id),
        loan_days: days,
    }
}

#[tokio::test]
async fn test_checkout_late_return_and_revert() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Dom Casmurro", 2).await;
    let member_id = create_test_member(&db, "ana@example.org").await;

    let loan = loan_service::checkout_at(&db, request(book_id, member_id, Some(7)), at(2024, 3, 1, 10))
        .await
        .expect("checkout");
    assert_eq!(loan.status, LoanStatus::Active);
    assert_eq!(loan.due_date, at(2024, 3, 8, 10));
    assert_eq!(loan.fine, 0.0);
    assert_eq!(available_copies(&db, book_id).await, 1);

    // Returned three days after the due date
    let receipt = loan_service::return_loan_at(&db, loan.id, at(2024, 3, 11, 10))
        .await
        .expect("return");
    assert_eq!(receipt.days_late, 3);
    assert_eq!(receipt.fine, 6.0);
    assert_eq!(receipt.loan.status, LoanStatus::Returned);
    assert_eq!(receipt.loan.return_date, Some(at(2024, 3, 11, 10)));
    assert_eq!(available_copies(&db, book_id).await, 2);

    let reverted = loan_service::revert_return(&db, loan.id)
        .await
        .expect("revert");
    assert_eq!(reverted.status, LoanStatus::Active);
    assert_eq!(reverted.return_date, None);
    assert_eq!(reverted.fine, 0.0);
    assert_eq!(available_copies(&db, book_id).await, 1);

    let discrepancies = inventory::audit(&db).await.expect("audit");
    assert!(discrepancies.is_empty(), "ledger drifted: {:?}", discrepancies);
}

#[tokio::test]
async fn test_return_on_time_has_no_fine() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Vidas Secas", 1).await;
    let member_id = create_test_member(&db, "bruno@example.org").await;

    let loan = loan_service::checkout_at(&db, request(book_id, member_id, None), at(2024, 5, 1, 9))
        .await
        .expect("checkout");
    assert_eq!(loan.due_date, at(2024, 5, 8, 9));

    let receipt = loan_service::return_loan_at(&db, loan.id, at(2024, 5, 8, 20))
        .await
        .expect("return");
    assert_eq!(receipt.days_late, 0);
    assert_eq!(receipt.fine, 0.0);

    // Second return is refused and leaves the counter alone
    let err = loan_service::return_loan_at(&db, loan.id, at(2024, 5, 9, 9))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(available_copies(&db, book_id).await, 1);
}

#[tokio::test]
async fn test_checkout_rejects_unavailable_book() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Single Copy", 1).await;
    let member_id = create_test_member(&db, "carla@example.org").await;

    loan_service::checkout(&db, request(book_id, member_id, None))
        .await
        .expect("first checkout");

    let err = loan_service::checkout(&db, request(book_id, member_id, None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(available_copies(&db, book_id).await, 0);
}

#[tokio::test]
async fn test_checkout_validation_and_missing_references() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Any Book", 1).await;
    let member_id = create_test_member(&db, "dora@example.org").await;

    let err = loan_service::checkout(&db, CheckoutRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = loan_service::checkout(&db, request(book_id, member_id, Some(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = loan_service::checkout(&db, request(9999, member_id, None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    // Unknown member: the copy taken inside the transaction is rolled back
    let err = loan_service::checkout(&db, request(book_id, 9999, None))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert_eq!(available_copies(&db, book_id).await, 1);
}

#[tokio::test]
async fn test_revert_requires_returned_loan_and_free_copy() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Contested", 1).await;
    let first = create_test_member(&db, "one@example.org").await;
    let second = create_test_member(&db, "two@example.org").await;

    let loan = loan_service::checkout(&db, request(book_id, first, None))
        .await
        .expect("checkout");

    let err = loan_service::revert_return(&db, loan.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    loan_service::return_loan(&db, loan.id).await.expect("return");
    // Someone else takes the copy before the reversal
    loan_service::checkout(&db, request(book_id, second, None))
        .await
        .expect("second checkout");

    let err = loan_service::revert_return(&db, loan.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
    assert_eq!(available_copies(&db, book_id).await, 0);

    let stored = loan_service::get_loan(&db, loan.id).await.expect("get");
    assert_eq!(stored.loan.status, LoanStatus::Returned);
}

#[tokio::test]
async fn test_cancel_restores_copy_only_for_outstanding_loans() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Cancellable", 2).await;
    let member_id = create_test_member(&db, "eva@example.org").await;

    let outstanding = loan_service::checkout(&db, request(book_id, member_id, None))
        .await
        .expect("checkout");
    let returned = loan_service::checkout(&db, request(book_id, member_id, None))
        .await
        .expect("checkout");
    assert_eq!(available_copies(&db, book_id).await, 0);

    loan_service::return_loan(&db, returned.id).await.expect("return");
    assert_eq!(available_copies(&db, book_id).await, 1);

    loan_service::cancel_loan(&db, returned.id).await.expect("cancel returned");
    assert_eq!(available_copies(&db, book_id).await, 1);

    loan_service::cancel_loan(&db, outstanding.id).await.expect("cancel outstanding");
    assert_eq!(available_copies(&db, book_id).await, 2);

    let err = loan_service::cancel_loan(&db, outstanding.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert!(loan_service::list_loans(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_overdue_sweep_uses_start_of_day() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Sweep", 3).await;
    let member_id = create_test_member(&db, "fabio@example.org").await;

    let loan = loan_service::checkout_at(&db, request(book_id, member_id, Some(7)), at(2024, 3, 1, 10))
        .await
        .expect("checkout");

    // Due later today: not overdue yet
    let changed = loan_service::mark_overdue_at(&db, at(2024, 3, 8, 23)).await.unwrap();
    assert_eq!(changed, 0);

    let changed = loan_service::mark_overdue_at(&db, at(2024, 3, 9, 0)).await.unwrap();
    assert_eq!(changed, 1);
    let stored = loan_service::get_loan(&db, loan.id).await.unwrap();
    assert_eq!(stored.loan.status, LoanStatus::Overdue);

    // Already overdue loans are not counted again
    let changed = loan_service::mark_overdue_at(&db, at(2024, 3, 10, 0)).await.unwrap();
    assert_eq!(changed, 0);

    // Overdue loans can still be returned, restoring the copy
    let receipt = loan_service::return_loan_at(&db, loan.id, at(2024, 3, 10, 10))
        .await
        .unwrap();
    assert_eq!(receipt.fine, 4.0);
    assert_eq!(available_copies(&db, book_id).await, 3);
}

#[tokio::test]
async fn test_list_loans_joins_book_and_member() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Joined", 2).await;
    let member_id = create_test_member(&db, "gil@example.org").await;

    let older = loan_service::checkout_at(&db, request(book_id, member_id, None), at(2024, 1, 1, 8))
        .await
        .unwrap();
    let newer = loan_service::checkout_at(&db, request(book_id, member_id, None), at(2024, 2, 1, 8))
        .await
        .unwrap();

    let loans = loan_service::list_loans(&db).await.unwrap();
    assert_eq!(loans.len(), 2);
    assert_eq!(loans[0].loan.id, newer.id);
    assert_eq!(loans[1].loan.id, older.id);
    assert_eq!(loans[0].book_title, "Joined");
    assert_eq!(loans[0].member_email, "gil@example.org");
    assert_eq!(loans[0].member_type, "aluno");
}

#[tokio::test]
async fn test_admin_edit_rules() {
    let db = setup_test_db().await;
    let book_id = create_test_book(&db, "Editable", 1).await;
    let member_id = create_test_member(&db, "hugo@example.org").await;

    let loan = loan_service::checkout(&db, request(book_id, member_id, None))
        .await
        .unwrap();

    let edited = loan_service::update_loan(
        &db,
        loan.id,
        LoanUpdate {
            due_date: Some("2030-01-15".to_string()),
            status: Some(LoanStatus::Overdue),
            fine: Some(3.5),
            ..Default::default()
        },
    )
    .await
    .expect("edit");
    assert_eq!(edited.due_date, at(2030, 1, 15, 0));
    assert_eq!(edited.status, LoanStatus::Overdue);
    assert_eq!(edited.fine, 3.5);
    // No inventory side effects
    assert_eq!(available_copies(&db, book_id).await, 0);

    let err = loan_service::update_loan(
        &db,
        loan.id,
        LoanUpdate {
            status: Some(LoanStatus::Returned),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = loan_service::update_loan(
        &db,
        loan.id,
        LoanUpdate {
            fine: Some(-1.0),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = loan_service::update_loan(
        &db,
        loan.id,
        LoanUpdate {
            loan_date: Some("yesterday".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = loan_service::update_loan(&db, 4242, LoanUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}
