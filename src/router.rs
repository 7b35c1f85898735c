use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::get,
};

use crate::handlers::{api_root, columns, databases, tables};
use crate::service::CatalogOps;

/// Request bodies above this size are rejected with 413.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Clone)]
pub struct CatalogState {
    pub ops: CatalogOps,
}

impl CatalogState {
    pub fn new(ops: CatalogOps) -> Self {
        Self { ops }
    }
}

pub fn catalog_router(state: CatalogState) -> Router {
    Router::new()
        .route("/", get(api_root))
        .route(
            "/databases/",
            get(databases::list_databases).post(databases::create_database),
        )
        .route(
            "/databases/{id}/",
            get(databases::retrieve_database)
                .put(databases::replace_database)
                .patch(databases::patch_database)
                .delete(databases::delete_database),
        )
        .route(
            "/tables/",
            get(tables::list_tables).post(tables::create_table),
        )
        .route("/tables/search_by_name/", get(tables::search_tables_by_name))
        .route(
            "/tables/{id}/",
            get(tables::retrieve_table)
                .put(tables::replace_table)
                .patch(tables::patch_table)
                .delete(tables::delete_table),
        )
        .route(
            "/columns/",
            get(columns::list_columns).post(columns::create_column),
        )
        .route(
            "/columns/{id}/",
            get(columns::retrieve_column)
                .put(columns::replace_column)
                .patch(columns::patch_column)
                .delete(columns::delete_column),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .with_state(state)
}
