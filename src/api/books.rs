use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::{Value, json};

use super::error::ApiResult;
use super::{ListQuery, listing};
use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::models::Book;

#[utoipa::path(
    get,
    path = "/api/livros",
    params(ListQuery),
    responses(
        (status = 200, description = "Books ordered by title", body = [Book])
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let books = state.book_repo.find_all().await?;
    listing(books, &query)
}

#[utoipa::path(
    get,
    path = "/api/livros/busca/{termo}",
    params(("termo" = String, Path, description = "Substring of title or author")),
    responses(
        (status = 200, description = "Matching books ordered by title", body = [Book])
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Path(term) = path?;
    let Query(query) = query?;
    let books = state.book_repo.search(&term).await?;
    listing(books, &query)
}

#[utoipa::path(
    get,
    path = "/api/livros/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book found", body = Book),
        (status = 404, description = "Book not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Book>> {
    let Path(id) = path?;
    let book = state
        .book_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Book"))?;
    Ok(Json(book))
}

#[utoipa::path(
    post,
    path = "/api/livros",
    request_body = Book,
    responses(
        (status = 201, description = "Book created"),
        (status = 400, description = "Missing title/author or duplicate ISBN", body = crate::api::error::ErrorBody)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<Book>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(book) = payload?;
    let created = state.book_repo.create(book).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": created.id,
            "message": "Book created successfully",
            "livro": created
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/livros/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = Book,
    responses(
        (status = 200, description = "Book updated"),
        (status = 400, description = "Invalid fields", body = crate::api::error::ErrorBody),
        (status = 404, description = "Book not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Book>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    let Json(book) = payload?;
    let updated = state.book_repo.update(id, book).await?;

    Ok(Json(json!({
        "message": "Book updated successfully",
        "livro": updated
    })))
}

#[utoipa::path(
    delete,
    path = "/api/livros/{id}",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 400, description = "Book has loans on record", body = crate::api::error::ErrorBody),
        (status = 404, description = "Book not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    state.book_repo.delete(id).await?;
    Ok(Json(json!({ "message": "Book deleted successfully" })))
}
