use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use super::error::ApiResult;
use super::{ListQuery, listing};
use crate::models::loan::{CheckoutRequest, LoanUpdate};
use crate::models::LoanWithDetails;
use crate::services::loan_service;

#[utoipa::path(
    get,
    path = "/api/emprestimos",
    params(ListQuery),
    responses(
        (status = 200, description = "Loans with book and member, newest first", body = [LoanWithDetails])
    )
)]
pub async fn list_loans(
    State(db): State<DatabaseConnection>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let loans = loan_service::list_loans(&db).await?;
    listing(loans, &query)
}

#[utoipa::path(
    get,
    path = "/api/emprestimos/{id}",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan found", body = LoanWithDetails),
        (status = 404, description = "Loan not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn get_loan(
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<LoanWithDetails>> {
    let Path(id) = path?;
    let loan = loan_service::get_loan(&db, id).await?;
    Ok(Json(loan))
}

#[utoipa::path(
    post,
    path = "/api/emprestimos",
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Loan created"),
        (status = 400, description = "Missing fields, bad loan period or no copies available", body = crate::api::error::ErrorBody),
        (status = 404, description = "Book or member not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn create_loan(
    State(db): State<DatabaseConnection>,
    payload: Result<Json<CheckoutRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(request) = payload?;
    let loan = loan_service::checkout(&db, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": loan.id,
            "message": "Loan created successfully",
            "emprestimo": loan
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/emprestimos/{id}/devolver",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan returned; body carries multa and dias_atraso"),
        (status = 400, description = "Loan already returned", body = crate::api::error::ErrorBody),
        (status = 404, description = "Loan not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn return_loan(
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    let receipt = loan_service::return_loan(&db, id).await?;

    Ok(Json(json!({
        "message": "Loan returned successfully",
        "multa": receipt.fine,
        "dias_atraso": receipt.days_late,
        "emprestimo": receipt.loan
    })))
}

#[utoipa::path(
    put,
    path = "/api/emprestimos/{id}/reverter",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Return reverted", body = crate::models::LoanDto),
        (status = 400, description = "Loan is not returned or no copy is available", body = crate::api::error::ErrorBody),
        (status = 404, description = "Loan not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn revert_return(
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    let loan = loan_service::revert_return(&db, id).await?;

    Ok(Json(json!({
        "message": "Return reverted successfully",
        "emprestimo": loan
    })))
}

#[utoipa::path(
    put,
    path = "/api/emprestimos/{id}",
    params(("id" = i32, Path, description = "Loan ID")),
    request_body = LoanUpdate,
    responses(
        (status = 200, description = "Loan edited", body = crate::models::LoanDto),
        (status = 400, description = "Invalid date, fine or status change", body = crate::api::error::ErrorBody),
        (status = 404, description = "Loan not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn update_loan(
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<LoanUpdate>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    let Json(update) = payload?;
    let loan = loan_service::update_loan(&db, id, update).await?;

    Ok(Json(json!({
        "message": "Loan updated successfully",
        "emprestimo": loan
    })))
}

#[utoipa::path(
    delete,
    path = "/api/emprestimos/{id}",
    params(("id" = i32, Path, description = "Loan ID")),
    responses(
        (status = 200, description = "Loan cancelled"),
        (status = 404, description = "Loan not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn cancel_loan(
    State(db): State<DatabaseConnection>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    loan_service::cancel_loan(&db, id).await?;
    Ok(Json(json!({ "message": "Loan cancelled successfully" })))
}

#[utoipa::path(
    post,
    path = "/api/emprestimos/atualizar-status",
    responses((status = 200, description = "Active loans past due marked overdue"))
)]
pub async fn refresh_statuses(State(db): State<DatabaseConnection>) -> ApiResult<Json<Value>> {
    let updated = loan_service::mark_overdue(&db).await?;

    Ok(Json(json!({
        "message": "Statuses updated successfully",
        "atualizados": updated
    })))
}
