use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::middleware::{CatalogJson, CatalogPath};
use crate::router::CatalogState;
use crate::types::payloads::{NameSearch, TablePayload, WriteMode};
use crate::types::views::TableView;
use crate::CatalogError;

pub async fn list_tables(
    State(state): State<CatalogState>,
) -> Result<Json<Vec<TableView>>, CatalogError> {
    Ok(Json(state.ops.list_tables().await?))
}

pub async fn create_table(
    State(state): State<CatalogState>,
    CatalogJson(payload): CatalogJson<TablePayload>,
) -> Result<(StatusCode, Json<TableView>), CatalogError> {
    let created = state.ops.create_table(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn retrieve_table(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
) -> Result<Json<TableView>, CatalogError> {
    Ok(Json(state.ops.get_table(id).await?))
}

pub async fn replace_table(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
    CatalogJson(payload): CatalogJson<TablePayload>,
) -> Result<Json<TableView>, CatalogError> {
    let updated = state
        .ops
        .update_table(id, payload, WriteMode::Replace)
        .await?;
    Ok(Json(updated))
}

pub async fn patch_table(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
    CatalogJson(payload): CatalogJson<TablePayload>,
) -> Result<Json<TableView>, CatalogError> {
    let updated = state
        .ops
        .update_table(id, payload, WriteMode::Partial)
        .await?;
    Ok(Json(updated))
}

pub async fn delete_table(
    State(state): State<CatalogState>,
    CatalogPath(id): CatalogPath<i64>,
) -> Result<StatusCode, CatalogError> {
    state.ops.delete_table(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /tables/search_by_name/?name=<substring>
/// Missing `name` searches for the empty string; no hits is an empty 200.
/// Matching ignores case for ASCII letters only, so `übersicht` does not
/// find `Übersicht`.
pub async fn search_tables_by_name(
    State(state): State<CatalogState>,
    Query(query): Query<NameSearch>,
) -> Result<Json<Vec<TableView>>, CatalogError> {
    Ok(Json(state.ops.search_tables(&query.name).await?))
}
