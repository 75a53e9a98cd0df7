use sea_orm::entity::prelude::*;
use sea_orm::{NotSet, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub author: String,
    #[sea_orm(unique)]
    pub isbn: Option<String>,
    pub publisher: Option<String>,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::loan::Entity")]
    Loans,
}

impl Related<super::loan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Loans.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API requests and responses
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Option<i32>,
    #[serde(rename = "titulo")]
    pub title: Option<String>,
    #[serde(rename = "autor")]
    pub author: Option<String>,
    pub isbn: Option<String>,
    #[serde(rename = "editora")]
    pub publisher: Option<String>,
    #[serde(rename = "ano_publicacao")]
    pub publication_year: Option<i32>,
    #[serde(rename = "categoria")]
    pub category: Option<String>,
    #[serde(rename = "quantidade_total")]
    pub total_copies: Option<i32>,
    #[serde(rename = "quantidade_disponivel")]
    pub available_copies: Option<i32>,
}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        Self {
            id: Some(model.id),
            title: Some(model.title),
            author: Some(model.author),
            isbn: model.isbn,
            publisher: model.publisher,
            publication_year: model.publication_year,
            category: model.category,
            total_copies: Some(model.total_copies),
            available_copies: Some(model.available_copies),
        }
    }
}

impl From<Book> for ActiveModel {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.map_or(NotSet, Set),
            title: book.title.map_or(NotSet, Set),
            author: book.author.map_or(NotSet, Set),
            isbn: Set(blank_to_none(book.isbn)),
            publisher: Set(blank_to_none(book.publisher)),
            publication_year: Set(book.publication_year),
            category: Set(blank_to_none(book.category)),
            total_copies: book.total_copies.map_or(NotSet, Set),
            available_copies: book.available_copies.map_or(NotSet, Set),
            created_at: NotSet,
            updated_at: NotSet,
        }
    }
}

/// Forms post empty strings for untouched optional inputs; store them as NULL
/// so the unique index on isbn is not tripped by two blank values.
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
