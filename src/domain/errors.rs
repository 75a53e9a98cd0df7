//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

use sea_orm::{DbErr, SqlErr};

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found, with a message naming the resource
    NotFound(String),
    /// Missing or malformed input
    Validation(String),
    /// Business rule violation (no copies left, invalid loan transition, ...)
    Conflict(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl DomainError {
    pub fn not_found(what: &str) -> Self {
        DomainError::NotFound(format!("{} not found", what))
    }

    /// Map a write error, turning unique-key violations into a validation
    /// error carrying `duplicate_msg`.
    pub fn from_write(e: DbErr, duplicate_msg: &str) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                DomainError::Validation(duplicate_msg.to_string())
            }
            _ => DomainError::from(e),
        }
    }

    /// Map a delete error, turning foreign-key violations into a conflict.
    pub fn from_delete(e: DbErr, referenced_msg: &str) -> Self {
        match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                DomainError::Conflict(referenced_msg.to_string())
            }
            _ => DomainError::from(e),
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(msg) => write!(f, "{}", msg),
            DomainError::Validation(msg) => write!(f, "{}", msg),
            DomainError::Conflict(msg) => write!(f, "{}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_user_facing_messages_bare() {
        assert_eq!(
            DomainError::not_found("Loan").to_string(),
            "Loan not found"
        );
        assert_eq!(
            DomainError::Conflict("Book is not available for loan".into()).to_string(),
            "Book is not available for loan"
        );
        assert!(
            DomainError::Database("disk I/O".into())
                .to_string()
                .starts_with("Database error")
        );
    }

    #[test]
    fn non_constraint_write_errors_stay_database_errors() {
        let err = DomainError::from_write(DbErr::Custom("boom".into()), "dup");
        assert!(matches!(err, DomainError::Database(_)));
    }
}
