//! Domain layer - Pure business abstractions
//!
//! Trait definitions, domain error types and the loan lifecycle rules.
//! No Axum types in here.

pub mod errors;
pub mod loan_policy;
pub mod repositories;
pub mod validation;

pub use errors::DomainError;
pub use repositories::*;
