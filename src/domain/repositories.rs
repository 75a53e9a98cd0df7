//! Repository trait definitions
//!
//! These traits define the contract for data access to the catalog (books)
//! and the member directory. Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{Book, MemberDto};

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all books ordered by title
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;

    /// Find books whose title or author contains `term`, ordered by title
    async fn search(&self, term: &str) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by ID
    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError>;

    /// Create a new book; available copies start equal to the total
    async fn create(&self, book: Book) -> Result<Book, DomainError>;

    /// Update an existing book
    async fn update(&self, id: i32, book: Book) -> Result<Book, DomainError>;

    /// Delete a book by ID
    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

/// Repository trait for Member entity
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find all members ordered by name
    async fn find_all(&self) -> Result<Vec<MemberDto>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<MemberDto>, DomainError>;

    async fn create(&self, member: MemberDto) -> Result<MemberDto, DomainError>;

    async fn update(&self, id: i32, member: MemberDto) -> Result<MemberDto, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}
