//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, MemberRepository};
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmMemberRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Connection pool; loan transitions open their transactions on it
    db: DatabaseConnection,
    /// Catalog
    pub book_repo: Arc<dyn BookRepository>,
    /// Member directory
    pub member_repo: Arc<dyn MemberRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let member_repo = Arc::new(SeaOrmMemberRepository::new(db.clone()));

        Self {
            db,
            book_repo,
            member_repo,
        }
    }
}

// Lets handlers that only need the pool extract it directly
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}
