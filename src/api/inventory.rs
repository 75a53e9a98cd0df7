use axum::{Json, extract::State};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

use super::error::ApiResult;
use crate::services::inventory;

#[utoipa::path(
    get,
    path = "/api/inventario",
    responses(
        (status = 200, description = "Books whose available count disagrees with their outstanding loans")
    )
)]
pub async fn audit_inventory(State(db): State<DatabaseConnection>) -> ApiResult<Json<Value>> {
    let discrepancies = inventory::audit(&db).await?;

    Ok(Json(json!({
        "consistente": discrepancies.is_empty(),
        "divergencias": discrepancies
    })))
}
