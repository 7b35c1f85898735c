#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::{
    fs,
    path::PathBuf,
    sync::atomic::{AtomicUsize, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceExt;

use schema_catalog::db::{CatalogStorage, connect};
use schema_catalog::router::{CatalogState, catalog_router};
use schema_catalog::service::CatalogOps;

static NEXT_DB: AtomicUsize = AtomicUsize::new(0);

/// Router backed by a throwaway SQLite file, removed on drop.
pub struct TestApp {
    pub app: Router,
    pub storage: CatalogStorage,
    path: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
        for suffix in ["-wal", "-shm"] {
            let mut side = self.path.clone().into_os_string();
            side.push(suffix);
            let _ = fs::remove_file(side);
        }
    }
}

pub async fn spawn_app() -> TestApp {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();

    let mut path = std::env::temp_dir();
    path.push(format!(
        "schema-catalog-{}-{}-{}.sqlite",
        std::process::id(),
        nanos,
        NEXT_DB.fetch_add(1, Ordering::SeqCst)
    ));

    let database_url = format!("sqlite:{}", path.display());
    let pool = connect(&database_url, 1)
        .await
        .expect("failed to open test database");
    let storage = CatalogStorage::new(pool);
    storage.init_schema().await.expect("failed to init schema");

    let app = catalog_router(CatalogState::new(CatalogOps::new(storage.clone())));
    TestApp { app, storage, path }
}

impl TestApp {
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        self.dispatch(request).await
    }

    pub async fn send_raw(&self, method: &str, uri: &str, raw: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(raw.to_string()))
            .expect("failed to build request");
        self.dispatch(request).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let resp = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("request failed");
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    pub async fn create_database(&self, name: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/databases/",
                Some(serde_json::json!({
                    "name": name,
                    "host": "localhost",
                    "user": "testuser",
                    "password": "testpassword",
                    "engine": "postgresql",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("database id")
    }

    pub async fn create_table(&self, database: i64, name: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/tables/",
                Some(serde_json::json!({ "database": database, "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("table id")
    }

    pub async fn create_column(&self, table: i64, name: &str) -> i64 {
        let (status, body) = self
            .send(
                "POST",
                "/columns/",
                Some(serde_json::json!({ "table": table, "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().expect("column id")
    }
}
