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
use crate::models::MemberDto;

#[utoipa::path(
    get,
    path = "/api/usuarios",
    params(ListQuery),
    responses((status = 200, description = "Members ordered by name", body = [MemberDto]))
)]
pub async fn list_members(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Value>>> {
    let Query(query) = query?;
    let members = state.member_repo.find_all().await?;
    listing(members, &query)
}

#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member found", body = MemberDto),
        (status = 404, description = "Member not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn get_member(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<MemberDto>> {
    let Path(id) = path?;
    let member = state
        .member_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Member"))?;
    Ok(Json(member))
}

#[utoipa::path(
    post,
    path = "/api/usuarios",
    request_body = MemberDto,
    responses(
        (status = 201, description = "Member registered"),
        (status = 400, description = "Missing fields or duplicate email/membership number", body = crate::api::error::ErrorBody)
    )
)]
pub async fn create_member(
    State(state): State<AppState>,
    payload: Result<Json<MemberDto>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(member) = payload?;
    let created = state.member_repo.create(member).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": created.id,
            "message": "Member registered successfully",
            "usuario": created
        })),
    ))
}

#[utoipa::path(
    put,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "Member ID")),
    request_body = MemberDto,
    responses(
        (status = 200, description = "Member updated"),
        (status = 400, description = "Invalid fields", body = crate::api::error::ErrorBody),
        (status = 404, description = "Member not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn update_member(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MemberDto>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    let Json(member) = payload?;
    let updated = state.member_repo.update(id, member).await?;

    Ok(Json(json!({
        "message": "Member updated successfully",
        "usuario": updated
    })))
}

#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    params(("id" = i32, Path, description = "Member ID")),
    responses(
        (status = 200, description = "Member deleted"),
        (status = 400, description = "Member has loans on record", body = crate::api::error::ErrorBody),
        (status = 404, description = "Member not found", body = crate::api::error::ErrorBody)
    )
)]
pub async fn delete_member(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Value>> {
    let Path(id) = path?;
    state.member_repo.delete(id).await?;
    Ok(Json(json!({ "message": "Member deleted successfully" })))
}
