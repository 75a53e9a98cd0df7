//! Inventory ledger
//!
//! Owns `books.available_copies`. Loan transitions move copies on and off the
//! shelf only through `take_copy` and `restore_copy`, both of which are single
//! guarded `UPDATE`s so the check and the write happen atomically inside the
//! caller's transaction.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::DomainError;
use crate::models::LoanStatus;
use crate::models::book::{Column as BookColumn, Entity as BookEntity};
use crate::models::loan::{Column as LoanColumn, Entity as LoanEntity};

/// A book whose counter disagrees with its outstanding loans
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LedgerDiscrepancy {
    #[serde(rename = "livro_id")]
    pub book_id: i32,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "quantidade_total")]
    pub total_copies: i32,
    #[serde(rename = "quantidade_disponivel")]
    pub available_copies: i32,
    #[serde(rename = "quantidade_esperada")]
    pub expected_available: i32,
    #[serde(rename = "emprestimos_em_aberto")]
    pub outstanding_loans: i32,
}

/// Remove one copy of `book_id` from the shelf.
///
/// Fails with NotFound when the book does not exist and with Conflict when no
/// copy is available.
pub async fn take_copy<C: ConnectionTrait>(conn: &C, book_id: i32) -> Result<(), DomainError> {
    let result = BookEntity::update_many()
        .col_expr(
            BookColumn::AvailableCopies,
            Expr::col(BookColumn::AvailableCopies).sub(1),
        )
        .col_expr(
            BookColumn::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .filter(BookColumn::Id.eq(book_id))
        .filter(BookColumn::AvailableCopies.gt(0))
        .exec(conn)
        .await?;

    if result.rows_affected > 0 {
        return Ok(());
    }

    match BookEntity::find_by_id(book_id).one(conn).await? {
        None => Err(DomainError::not_found("Book")),
        Some(_) => Err(DomainError::Conflict(
            "Book is not available for loan".to_string(),
        )),
    }
}

/// Put one copy of `book_id` back on the shelf.
///
/// Never raises the counter above `total_copies`; returns whether a copy was
/// actually restored.
pub async fn restore_copy<C: ConnectionTrait>(conn: &C, book_id: i32) -> Result<bool, DomainError> {
    let result = BookEntity::update_many()
        .col_expr(
            BookColumn::AvailableCopies,
            Expr::col(BookColumn::AvailableCopies).add(1),
        )
        .col_expr(
            BookColumn::UpdatedAt,
            Expr::value(chrono::Utc::now().to_rfc3339()),
        )
        .filter(BookColumn::Id.eq(book_id))
        .filter(Expr::col(BookColumn::AvailableCopies).lt(Expr::col(BookColumn::TotalCopies)))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!(book_id, "Ledger already at capacity; copy not restored");
        return Ok(false);
    }

    Ok(true)
}

/// Compare every book's counter with `total - outstanding loans`.
pub async fn audit<C: ConnectionTrait>(conn: &C) -> Result<Vec<LedgerDiscrepancy>, DomainError> {
    let books = BookEntity::find()
        .order_by_asc(BookColumn::Id)
        .all(conn)
        .await?;

    let outstanding = LoanEntity::find()
        .filter(LoanColumn::Status.is_in([
            LoanStatus::Active.label(),
            LoanStatus::Overdue.label(),
        ]))
        .all(conn)
        .await?;

    let mut per_book: HashMap<i32, i32> = HashMap::new();
    for loan in outstanding {
        *per_book.entry(loan.book_id).or_insert(0) += 1;
    }

    let discrepancies = books
        .into_iter()
        .filter_map(|book| {
            let outstanding_loans = per_book.get(&book.id).copied().unwrap_or(0);
            let expected_available = book.total_copies - outstanding_loans;
            (expected_available != book.available_copies).then(|| LedgerDiscrepancy {
                book_id: book.id,
                title: book.title,
                total_copies: book.total_copies,
                available_copies: book.available_copies,
                expected_available,
                outstanding_loans,
            })
        })
        .collect();

    Ok(discrepancies)
}
