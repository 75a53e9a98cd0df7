//! Loan lifecycle rules
//!
//! Pure functions: due dates, lateness, fines and the guards that decide which
//! transitions a loan in a given state may take. The service layer applies them
//! inside a transaction.

use chrono::{Duration, NaiveDateTime, NaiveTime};

use super::DomainError;
use crate::models::LoanStatus;

/// Fine charged per full day past the due date, in currency units.
pub const FINE_PER_DAY: f64 = 2.00;

/// Loan period used when checkout does not specify one.
pub const DEFAULT_LOAN_DAYS: i64 = 7;

/// Compute the due date for a loan starting at `loan_date`.
pub fn due_date(loan_date: NaiveDateTime, days: Option<i64>) -> Result<NaiveDateTime, DomainError> {
    let days = days.unwrap_or(DEFAULT_LOAN_DAYS);
    if days <= 0 {
        return Err(DomainError::Validation(
            "Loan period must be a positive number of days".to_string(),
        ));
    }

    Duration::try_days(days)
        .and_then(|period| loan_date.checked_add_signed(period))
        .ok_or_else(|| DomainError::Validation("Loan period is too long".to_string()))
}

/// Whole days between the due date and the return, never negative.
pub fn days_late(due_date: NaiveDateTime, returned_at: NaiveDateTime) -> i64 {
    (returned_at - due_date).num_days().max(0)
}

pub fn fine_for(days_late: i64) -> f64 {
    days_late as f64 * FINE_PER_DAY
}

/// Loans due strictly before this instant are overdue.
pub fn overdue_cutoff(now: NaiveDateTime) -> NaiveDateTime {
    now.date().and_time(NaiveTime::MIN)
}

pub fn ensure_returnable(status: LoanStatus) -> Result<(), DomainError> {
    if status == LoanStatus::Returned {
        return Err(DomainError::Conflict(
            "Loan has already been returned".to_string(),
        ));
    }
    Ok(())
}

pub fn ensure_reversible(status: LoanStatus) -> Result<(), DomainError> {
    if status != LoanStatus::Returned {
        return Err(DomainError::Conflict(
            "Only returned loans can be reverted".to_string(),
        ));
    }
    Ok(())
}

/// Administrative edits may move a loan between active and overdue, but never
/// across the returned boundary: that would change who holds the copy without
/// touching the inventory.
pub fn ensure_admin_status_change(from: LoanStatus, to: LoanStatus) -> Result<(), DomainError> {
    if from == to || (from.holds_copy() && to.holds_copy()) {
        return Ok(());
    }
    Err(DomainError::Conflict(
        "Use the return or revert endpoints to change whether a loan is returned".to_string(),
    ))
}

pub fn ensure_valid_fine(fine: f64) -> Result<(), DomainError> {
    if !fine.is_finite() || fine < 0.0 {
        return Err(DomainError::Validation(
            "Fine must be a non-negative amount".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn due_date_defaults_to_a_week() {
        let start = at(2026, 3, 1, 10);
        assert_eq!(due_date(start, None).unwrap(), at(2026, 3, 8, 10));
        assert_eq!(due_date(start, Some(14)).unwrap(), at(2026, 3, 15, 10));
    }

    #[test]
    fn due_date_rejects_non_positive_periods() {
        let start = at(2026, 3, 1, 10);
        assert!(matches!(
            due_date(start, Some(0)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            due_date(start, Some(-3)),
            Err(DomainError::Validation(_))
        ));
        assert!(due_date(start, Some(i64::MAX)).is_err());
    }

    #[test]
    fn lateness_counts_whole_days_only() {
        let due = at(2026, 3, 8, 10);
        assert_eq!(days_late(due, at(2026, 3, 7, 10)), 0);
        assert_eq!(days_late(due, at(2026, 3, 8, 23)), 0);
        assert_eq!(days_late(due, at(2026, 3, 9, 9)), 0);
        assert_eq!(days_late(due, at(2026, 3, 9, 10)), 1);
        assert_eq!(days_late(due, at(2026, 3, 11, 12)), 3);
    }

    #[test]
    fn fine_is_two_per_late_day() {
        assert_eq!(fine_for(0), 0.0);
        assert_eq!(fine_for(3), 6.0);
    }

    #[test]
    fn cutoff_is_start_of_today() {
        assert_eq!(overdue_cutoff(at(2026, 3, 8, 15)), at(2026, 3, 8, 0));
    }

    #[test]
    fn return_and_revert_guards() {
        assert!(ensure_returnable(LoanStatus::Active).is_ok());
        assert!(ensure_returnable(LoanStatus::Overdue).is_ok());
        assert!(ensure_returnable(LoanStatus::Returned).is_err());

        assert!(ensure_reversible(LoanStatus::Returned).is_ok());
        assert!(ensure_reversible(LoanStatus::Active).is_err());
        assert!(ensure_reversible(LoanStatus::Overdue).is_err());
    }

    #[test]
    fn admin_edit_stays_inside_the_holding_states() {
        use LoanStatus::*;
        assert!(ensure_admin_status_change(Active, Overdue).is_ok());
        assert!(ensure_admin_status_change(Overdue, Active).is_ok());
        assert!(ensure_admin_status_change(Returned, Returned).is_ok());
        assert!(ensure_admin_status_change(Active, Returned).is_err());
        assert!(ensure_admin_status_change(Returned, Overdue).is_err());
    }

    #[test]
    fn fines_must_be_non_negative() {
        assert!(ensure_valid_fine(0.0).is_ok());
        assert!(ensure_valid_fine(12.5).is_ok());
        assert!(ensure_valid_fine(-1.0).is_err());
        assert!(ensure_valid_fine(f64::NAN).is_err());
    }
}
