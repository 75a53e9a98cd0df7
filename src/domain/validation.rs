//! Input checks for catalog and directory records.

use super::DomainError;
use crate::models::{Book, MemberDto};

/// Validated book fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub total_copies: i32,
    /// `None` keeps the stored value on update (or mirrors the total on create)
    pub available_copies: Option<i32>,
}

/// Validated member fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct MemberFields {
    pub name: String,
    pub email: String,
    pub member_type: String,
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_ref()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub fn validate_book(book: &Book) -> Result<BookFields, DomainError> {
    let (Some(title), Some(author)) = (present(&book.title), present(&book.author)) else {
        return Err(DomainError::Validation(
            "Title and author are required".to_string(),
        ));
    };

    let total_copies = book.total_copies.unwrap_or(1);
    if total_copies < 1 {
        return Err(DomainError::Validation(
            "Total copies must be at least 1".to_string(),
        ));
    }

    if let Some(available) = book.available_copies {
        check_available(available, total_copies)?;
    }

    Ok(BookFields {
        title,
        author,
        total_copies,
        available_copies: book.available_copies,
    })
}

/// Available copies must stay within `0..=total`.
pub fn check_available(available: i32, total: i32) -> Result<(), DomainError> {
    if available < 0 || available > total {
        return Err(DomainError::Validation(format!(
            "Available copies must be between 0 and {}",
            total
        )));
    }
    Ok(())
}

pub fn validate_member(member: &MemberDto) -> Result<MemberFields, DomainError> {
    match (
        present(&member.name),
        present(&member.email),
        present(&member.member_type),
    ) {
        (Some(name), Some(email), Some(member_type)) => Ok(MemberFields {
            name,
            email,
            member_type,
        }),
        _ => Err(DomainError::Validation(
            "Name, email and type are required".to_string(),
        )),
    }
}
