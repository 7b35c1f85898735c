use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::middleware::{CatalogJson, CatalogPath};
use crate::router::CatalogState;
use crate::types::payloads::{DatabasePayload, WriteMode};
use crate::types::views::DatabaseView;
use crate::CatalogError;

/// GET /databases/
pub async fn list_databases(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<DatabaseView>>, CatalogError> {
    Ok(Json(state.ops.list_databases().await?))
}

/// POST /databases/ -> 201 with the stored record (password already hashed).
pub async fn create_database(
    State(state): State<CatalogState>,
    CatalogJson(payload): CatalogJson<DatabasePayload>,
) -> Result<(StatusCode, Json<DatabaseView>), CatalogError> {
    let created = state.ops.create_database(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /databases/{id}/
pub async fn retrieve_database(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
) -> Result<Json<DatabaseView>, CatalogError> {
    Ok(Json(state.ops.get_database(id).await?))
}

/// PUT /databases/{id}/
pub async fn replace_database(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
    CatalogJson(payload): CatalogJson<DatabasePayload>,
) -> Result<Json<DatabaseView>, CatalogError> {
    let updated = state
        .ops
        .update_database(id, payload, WriteMode::Replace)
        .await?;
    Ok(Json(updated))
}

/// PATCH /databases/{id}/
pub async fn patch_database(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
    CatalogJson(payload): CatalogJson<DatabasePayload>,
) -> Result<Json<DatabaseView>, CatalogError> {
    let updated = state
        .ops
        .update_database(id, payload, WriteMode::Partial)
        .await?;
    Ok(Json(updated))
}

/// DELETE /databases/{id}/ -> 204, cascading to owned tables and columns.
pub async fn delete_database(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
) -> Result<StatusCode, CatalogError> {
    state.ops.delete_database(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
