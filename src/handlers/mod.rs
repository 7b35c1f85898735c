pub mod columns;
pub mod databases;
pub mod tables;

use axum::Json;
use serde_json::{Value, json};

/// GET / -> list endpoint of every resource.
pub async fn api_root() -> Json<Value> {
    Json(json!({
        "databases": "/databases/",
        "tables": "/tables/",
        "columns": "/columns/",
    }))
}
