//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
    sea_query::{Expr, LikeExpr},
};

use crate::domain::validation::{check_available, validate_book};
use crate::domain::{BookRepository, DomainError};
use crate::models::Book;
use crate::models::book::{ActiveModel, Column, Entity as BookEntity, blank_to_none};
use crate::models::loan::{Column as LoanColumn, Entity as LoanEntity};

const DUPLICATE_ISBN: &str = "ISBN already registered";

/// Escape LIKE wildcards so the search term matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like(term))).escape('\\')
}

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find()
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<Book>, DomainError> {
        let cond = Condition::any()
            .add(Expr::col((BookEntity, Column::Title)).like(contains_pattern(term)))
            .add(Expr::col((BookEntity, Column::Author)).like(contains_pattern(term)));

        let books = BookEntity::find()
            .filter(cond)
            .order_by_asc(Column::Title)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_by_id(id).one(&self.db).await?;
        Ok(book.map(Book::from))
    }

    async fn create(&self, book: Book) -> Result<Book, DomainError> {
        let fields = validate_book(&book)?;
        let now = chrono::Utc::now().to_rfc3339();

        // New titles start fully on the shelf
        let new_book = ActiveModel {
            title: Set(fields.title),
            author: Set(fields.author),
            isbn: Set(blank_to_none(book.isbn)),
            publisher: Set(blank_to_none(book.publisher)),
            publication_year: Set(book.publication_year),
            category: Set(blank_to_none(book.category)),
            total_copies: Set(fields.total_copies),
            available_copies: Set(fields.total_copies),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = new_book
            .insert(&self.db)
            .await
            .map_err(|e| DomainError::from_write(e, DUPLICATE_ISBN))?;

        tracing::info!(book_id = result.id, "Book created");
        Ok(Book::from(result))
    }

    async fn update(&self, id: i32, book: Book) -> Result<Book, DomainError> {
        let existing = BookEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found("Book"))?;

        let fields = validate_book(&book)?;

        // Available copies are caller-supplied; when omitted the stored value
        // is kept, but it must still fit under the (possibly new) total.
        let available = fields.available_copies.unwrap_or(existing.available_copies);
        check_available(available, fields.total_copies)?;

        let mut active: ActiveModel = existing.into();
        active.title = Set(fields.title);
        active.author = Set(fields.author);
        active.isbn = Set(blank_to_none(book.isbn));
        active.publisher = Set(blank_to_none(book.publisher));
        active.publication_year = Set(book.publication_year);
        active.category = Set(blank_to_none(book.category));
        active.total_copies = Set(fields.total_copies);
        active.available_copies = Set(available);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active
            .update(&self.db)
            .await
            .map_err(|e| DomainError::from_write(e, DUPLICATE_ISBN))?;

        Ok(Book::from(result))
    }

    async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let loans = LoanEntity::find()
            .filter(LoanColumn::BookId.eq(id))
            .count(&self.db)
            .await?;
        if loans > 0 {
            return Err(DomainError::Conflict(
                "Book has loans on record and cannot be deleted".to_string(),
            ));
        }

        let result = BookEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                DomainError::from_delete(e, "Book has loans on record and cannot be deleted")
            })?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Book"));
        }

        Ok(())
    }
}
