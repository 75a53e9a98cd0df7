//! Loan Service - the loan state machine, without HTTP layer
//!
//! Every transition that touches the inventory (checkout, return, reversal,
//! cancellation) runs in one transaction: the loan row and the book counter
//! commit together or not at all.

use chrono::{Local, NaiveDateTime};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::collections::HashMap;

use crate::domain::DomainError;
use crate::domain::loan_policy;
use crate::models::book::{self, Entity as Book};
use crate::models::loan::{self, CheckoutRequest, Entity as Loan, LoanUpdate};
use crate::models::member::{self, Entity as Member};
use crate::models::{LoanDto, LoanStatus, LoanWithDetails};
use crate::services::inventory;
use crate::utils::dates::parse_datetime;

/// Outcome of returning a loan
#[derive(Debug, Clone)]
pub struct ReturnReceipt {
    pub loan: LoanDto,
    pub days_late: i64,
    pub fine: f64,
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn with_details(
    loan: loan::Model,
    book: Option<book::Model>,
    member: Option<&member::Model>,
) -> LoanWithDetails {
    let (book_title, book_author) = book
        .map(|b| (b.title, b.author))
        .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string()));
    let (member_name, member_email, member_type) = member
        .map(|m| (m.name.clone(), m.email.clone(), m.member_type.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new(), String::new()));

    LoanWithDetails {
        loan: LoanDto::from(loan),
        book_title,
        book_author,
        member_name,
        member_email,
        member_type,
    }
}

async fn find_loan<C: ConnectionTrait>(conn: &C, id: i32) -> Result<loan::Model, DomainError> {
    Loan::find_by_id(id)
        .one(conn)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan"))
}

/// Load a loan for a state transition inside `txn`.
///
/// The row is touched before it is read so the transaction's first statement
/// is a write: SQLite then takes the write lock up front and concurrent
/// transitions wait on the busy timeout instead of failing with "database is
/// locked" when a read transaction tries to upgrade.
async fn claim_loan(txn: &DatabaseTransaction, id: i32) -> Result<loan::Model, DomainError> {
    let touched = Loan::update_many()
        .col_expr(loan::Column::UpdatedAt, Expr::value(timestamp()))
        .filter(loan::Column::Id.eq(id))
        .exec(txn)
        .await?;

    if touched.rows_affected == 0 {
        return Err(DomainError::not_found("Loan"));
    }
    find_loan(txn, id).await
}

/// List all loans with book and member info, most recent first
pub async fn list_loans(db: &DatabaseConnection) -> Result<Vec<LoanWithDetails>, DomainError> {
    let loans_with_books = Loan::find()
        .order_by_desc(loan::Column::LoanDate)
        .order_by_desc(loan::Column::Id)
        .find_also_related(Book)
        .all(db)
        .await?;

    // Collect member IDs to fetch names
    let member_ids: Vec<i32> = loans_with_books.iter().map(|(l, _)| l.member_id).collect();

    let mut members: HashMap<i32, member::Model> = HashMap::new();
    if !member_ids.is_empty() {
        for m in Member::find()
            .filter(member::Column::Id.is_in(member_ids))
            .all(db)
            .await?
        {
            members.insert(m.id, m);
        }
    }

    Ok(loans_with_books
        .into_iter()
        .map(|(loan, book)| {
            let member = members.get(&loan.member_id);
            with_details(loan, book, member)
        })
        .collect())
}

/// Get one loan with book and member info
pub async fn get_loan(db: &DatabaseConnection, id: i32) -> Result<LoanWithDetails, DomainError> {
    let (loan, book) = Loan::find_by_id(id)
        .find_also_related(Book)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Loan"))?;

    let member = Member::find_by_id(loan.member_id).one(db).await?;
    Ok(with_details(loan, book, member.as_ref()))
}

/// Check a book out to a member
pub async fn checkout(
    db: &DatabaseConnection,
    request: CheckoutRequest,
) -> Result<LoanDto, DomainError> {
    checkout_at(db, request, now()).await
}

pub async fn checkout_at(
    db: &DatabaseConnection,
    request: CheckoutRequest,
    now: NaiveDateTime,
) -> Result<LoanDto, DomainError> {
    let (Some(book_id), Some(member_id)) = (request.book_id, request.member_id) else {
        return Err(DomainError::Validation(
            "Book and member are required".to_string(),
        ));
    };
    let due_date = loan_policy::due_date(now, request.loan_days)?;

    let txn = db.begin().await?;

    // Guarded decrement: re-checks availability atomically with the write
    inventory::take_copy(&txn, book_id).await?;

    if Member::find_by_id(member_id).one(&txn).await?.is_none() {
        return Err(DomainError::not_found("Member"));
    }

    let stamp = timestamp();
    let new_loan = loan::ActiveModel {
        book_id: Set(book_id),
        member_id: Set(member_id),
        loan_date: Set(now),
        due_date: Set(due_date),
        return_date: Set(None),
        status: Set(LoanStatus::Active),
        fine: Set(0.0),
        created_at: Set(stamp.clone()),
        updated_at: Set(stamp),
        ..Default::default()
    };
    let saved = new_loan.insert(&txn).await?;

    txn.commit().await?;

    tracing::info!(loan_id = saved.id, book_id, member_id, %due_date, "Loan checked out");
    Ok(LoanDto::from(saved))
}

/// Return a loan, computing the late fine
pub async fn return_loan(db: &DatabaseConnection, id: i32) -> Result<ReturnReceipt, DomainError> {
    return_loan_at(db, id, now()).await
}

pub async fn return_loan_at(
    db: &DatabaseConnection,
    id: i32,
    now: NaiveDateTime,
) -> Result<ReturnReceipt, DomainError> {
    let txn = db.begin().await?;

    let loan = claim_loan(&txn, id).await?;
    loan_policy::ensure_returnable(loan.status)?;

    let days_late = loan_policy::days_late(loan.due_date, now);
    let fine = loan_policy::fine_for(days_late);
    let book_id = loan.book_id;

    let mut active: loan::ActiveModel = loan.into();
    active.return_date = Set(Some(now));
    active.status = Set(LoanStatus::Returned);
    active.fine = Set(fine);
    active.updated_at = Set(timestamp());
    let updated = active.update(&txn).await?;

    // The copy is back on the shelf
    inventory::restore_copy(&txn, book_id).await?;

    txn.commit().await?;

    tracing::info!(loan_id = id, book_id, days_late, fine, "Loan returned");
    Ok(ReturnReceipt {
        loan: LoanDto::from(updated),
        days_late,
        fine,
    })
}

/// Undo a return: the loan becomes active again and its copy leaves the shelf
pub async fn revert_return(db: &DatabaseConnection, id: i32) -> Result<LoanDto, DomainError> {
    let txn = db.begin().await?;

    let loan = claim_loan(&txn, id).await?;
    loan_policy::ensure_reversible(loan.status)?;

    inventory::take_copy(&txn, loan.book_id).await?;

    let mut active: loan::ActiveModel = loan.into();
    active.return_date = Set(None);
    active.status = Set(LoanStatus::Active);
    active.fine = Set(0.0);
    active.updated_at = Set(timestamp());
    let updated = active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(loan_id = id, book_id = updated.book_id, "Loan return reverted");
    Ok(LoanDto::from(updated))
}

/// Cancel (delete) a loan, restoring its copy if it was still out
pub async fn cancel_loan(db: &DatabaseConnection, id: i32) -> Result<(), DomainError> {
    let txn = db.begin().await?;

    let loan = claim_loan(&txn, id).await?;
    if loan.status.holds_copy() {
        inventory::restore_copy(&txn, loan.book_id).await?;
    }

    Loan::delete_by_id(loan.id).exec(&txn).await?;

    txn.commit().await?;

    tracing::info!(loan_id = id, book_id = loan.book_id, status = loan.status.label(), "Loan cancelled");
    Ok(())
}

/// Administrative edit: overwrite dates, status or fine without inventory
/// side effects. Omitted fields keep their value.
pub async fn update_loan(
    db: &DatabaseConnection,
    id: i32,
    update: LoanUpdate,
) -> Result<LoanDto, DomainError> {
    let loan = find_loan(db, id).await?;

    if let Some(status) = update.status {
        loan_policy::ensure_admin_status_change(loan.status, status)?;
    }
    if let Some(fine) = update.fine {
        loan_policy::ensure_valid_fine(fine)?;
    }

    let loan_date = update
        .loan_date
        .as_deref()
        .map(|s| parse_field(s, "data_emprestimo"))
        .transpose()?;
    let due_date = update
        .due_date
        .as_deref()
        .map(|s| parse_field(s, "data_devolucao_prevista"))
        .transpose()?;
    let return_date = match update.return_date {
        Some(Some(s)) => Some(Some(parse_field(&s, "data_devolucao_real")?)),
        Some(None) => Some(None),
        None => None,
    };

    let mut active: loan::ActiveModel = loan.into();
    if let Some(loan_date) = loan_date {
        active.loan_date = Set(loan_date);
    }
    if let Some(due_date) = due_date {
        active.due_date = Set(due_date);
    }
    if let Some(return_date) = return_date {
        active.return_date = Set(return_date);
    }
    if let Some(status) = update.status {
        active.status = Set(status);
    }
    if let Some(fine) = update.fine {
        active.fine = Set(fine);
    }
    active.updated_at = Set(timestamp());

    let updated = active.update(db).await?;
    tracing::info!(loan_id = id, "Loan edited");
    Ok(LoanDto::from(updated))
}

fn parse_field(value: &str, field: &str) -> Result<NaiveDateTime, DomainError> {
    parse_datetime(value)
        .ok_or_else(|| DomainError::Validation(format!("Invalid date for {}: {}", field, value)))
}

/// Flip every active loan whose due date is before today to overdue.
/// Returns the number of loans changed.
pub async fn mark_overdue(db: &DatabaseConnection) -> Result<u64, DomainError> {
    mark_overdue_at(db, now()).await
}

pub async fn mark_overdue_at(db: &DatabaseConnection, now: NaiveDateTime) -> Result<u64, DomainError> {
    let cutoff = loan_policy::overdue_cutoff(now);

    let result = Loan::update_many()
        .col_expr(loan::Column::Status, Expr::value(LoanStatus::Overdue.label()))
        .col_expr(loan::Column::UpdatedAt, Expr::value(timestamp()))
        .filter(loan::Column::Status.eq(LoanStatus::Active.label()))
        .filter(loan::Column::DueDate.lt(cutoff))
        .exec(db)
        .await?;

    if result.rows_affected > 0 {
        tracing::info!(count = result.rows_affected, "Loans marked overdue");
    }
    Ok(result.rows_affected)
}

/// Count loans currently holding a copy
pub async fn count_outstanding_loans(db: &DatabaseConnection) -> Result<u64, DomainError> {
    let count = Loan::find()
        .filter(loan::Column::Status.is_in([
            LoanStatus::Active.label(),
            LoanStatus::Overdue.label(),
        ]))
        .count(db)
        .await?;
    Ok(count)
}
