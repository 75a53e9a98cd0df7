pub mod books;
pub mod error;
pub mod health;
pub mod inventory;
pub mod loan;
pub mod members;

use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::IntoParams;

use crate::domain::DomainError;
use crate::infrastructure::AppState;
use crate::utils::sort::{SortDirection, sort_records};
use error::ApiResult;

/// Optional ordering for list endpoints, by any JSON key of the listed records
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// JSON key to order by (e.g. `titulo`, `quantidade_disponivel`)
    pub sort: Option<String>,
    /// `asc` (default) or `desc`
    #[param(value_type = Option<String>)]
    pub direction: Option<SortDirection>,
}

/// Serialize `items` and apply the requested ordering, if any. Without a
/// `sort` key the repository order is kept.
pub(crate) fn listing<T: Serialize>(items: Vec<T>, query: &ListQuery) -> ApiResult<Json<Vec<Value>>> {
    let records = items
        .into_iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| DomainError::Internal(e.to_string()))?;

    let records = match query.sort.as_deref().map(str::trim) {
        Some(field) if !field.is_empty() => {
            sort_records(records, field, query.direction.unwrap_or_default())
        }
        _ => records,
    };

    Ok(Json(records))
}

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Books
        .route("/livros", get(books::list_books).post(books::create_book))
        .route("/livros/busca/:termo", get(books::search_books))
        .route(
            "/livros/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Members
        .route(
            "/usuarios",
            get(members::list_members).post(members::create_member),
        )
        .route(
            "/usuarios/:id",
            get(members::get_member)
                .put(members::update_member)
                .delete(members::delete_member),
        )
        // Loans
        .route("/emprestimos", get(loan::list_loans).post(loan::create_loan))
        .route(
            "/emprestimos/atualizar-status",
            post(loan::refresh_statuses),
        )
        .route(
            "/emprestimos/:id",
            get(loan::get_loan)
                .put(loan::update_loan)
                .delete(loan::cancel_loan),
        )
        .route("/emprestimos/:id/devolver", put(loan::return_loan))
        .route("/emprestimos/:id/reverter", put(loan::revert_return))
        // Inventory ledger
        .route("/inventario", get(inventory::audit_inventory))
        .with_state(state)
}
