use axum::{
    Json,
    extract::State,
    http::StatusCode,
};

use crate::middleware::{CatalogJson, CatalogPath};
use crate::router::CatalogState;
use crate::types::payloads::{ColumnPayload, WriteMode};
use crate::types::views::ColumnView;
use crate::CatalogError;

pub async fn list_columns(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<ColumnView>>, CatalogError> {
    Ok(Json(state.ops.list_columns().await?))
}

pub async fn create_column(
    State(state): State<CatalogState>,
    CatalogJson(payload): CatalogJson<ColumnPayload>,
) -> Result<(StatusCode, Json<ColumnView>), CatalogError> {
    let created = state.ops.create_column(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn retrieve_column(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
) -> Result<Json<ColumnView>, CatalogError> {
    Ok(Json(state.ops.get_column(id).await?))
}

pub async fn replace_column(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
    CatalogJson(payload): CatalogJson<ColumnPayload>,
) -> Result<Json<ColumnView>, CatalogError> {
    let updated = state
        .ops
        .update_column(id, payload, WriteMode::Replace)
        .await?;
    Ok(Json(updated))
}

pub async fn patch_column(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
    CatalogJson(payload): CatalogJson<ColumnPayload>,
) -> Result<Json<ColumnView>, CatalogError> {
    let updated = state
        .ops
        .update_column(id, payload, WriteMode::Partial)
        .await?;
    Ok(Json(updated))
}

pub async fn delete_column(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
) -> Result<StatusCode, CatalogError> {
    state.ops.delete_column(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
