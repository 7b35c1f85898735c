mod common;

use axum::http::StatusCode;
use schema_catalog::service::password::verify_password;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn create_then_retrieve_database_roundtrip() {
    let t = spawn_app().await;

    let (status, created) = t
        .send(
            "POST",
            "/databases/",
            Some(json!({
                "name": "TestDB",
                "host": "localhost",
                "user": "u",
                "password": "p",
                "engine": "postgresql",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["tables"], json!([]));

    let (status, detail) = t.send("GET", &format!("/databases/{id}/"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["name"], "TestDB");
    assert_eq!(detail["host"], "localhost");
    assert_eq!(detail["user"], "u");
    assert_eq!(detail["engine"], "postgresql");

    let stored = detail["password"].as_str().unwrap();
    assert_ne!(stored, "p");
    assert!(stored.starts_with("$argon2id$"));
    assert!(verify_password("p", stored));
}

#[tokio::test]
async fn same_password_is_salted_per_record() {
    let t = spawn_app().await;
    let a = t.create_database("a").await;
    let b = t.create_database("b").await;

    let (_, first) = t.send("GET", &format!("/databases/{a}/"), None).await;
    let (_, second) = t.send("GET", &format!("/databases/{b}/"), None).await;
    let first = first["password"].as_str().unwrap();
    let second = second["password"].as_str().unwrap();

    assert_ne!(first, second);
    assert!(verify_password("testpassword", first));
    assert!(verify_password("testpassword", second));
}

#[tokio::test]
async fn engine_token_is_case_insensitive() {
    let t = spawn_app().await;
    for token in ["MySQL", "MYSQL", "mysql"] {
        let (status, body) = t
            .send(
                "POST",
                "/databases/",
                Some(json!({
                    "name": "NewDatabase",
                    "host": "newhost",
                    "user": "newuser",
                    "password": "newpassword",
                    "engine": token,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{token}: {body}");
        assert_eq!(body["engine"], "mysql");
    }
}

#[tokio::test]
async fn unknown_engine_is_a_field_error() {
    let t = spawn_app().await;
    let (status, body) = t
        .send(
            "POST",
            "/databases/",
            Some(json!({
                "name": "x",
                "host": "h",
                "user": "u",
                "password": "p",
                "engine": "oracle",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(
        body["error"]["fields"]["engine"],
        json!(["Invalid value for engine: oracle"])
    );

    let (_, list) = t.send("GET", "/databases/", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn create_reports_all_missing_fields() {
    let t = spawn_app().await;
    let (status, body) = t
        .send("POST", "/databases/", Some(json!({ "name": "only" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["error"]["fields"];
    for field in ["host", "user", "password", "engine"] {
        assert_eq!(fields[field], json!(["This field is required."]), "{field}");
    }
    assert!(fields.get("name").is_none());
}

#[tokio::test]
async fn list_databases_nests_tables_and_columns() {
    let t = spawn_app().await;
    let db = t.create_database("TestDatabase").await;
    let table = t.create_table(db, "TestTable").await;
    let column = t.create_column(table, "TestColumn").await;

    let (status, list) = t.send("GET", "/databases/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "TestDatabase");
    assert_eq!(
        list[0]["tables"],
        json!([{
            "id": table,
            "name": "TestTable",
            "columns": [{ "id": column, "name": "TestColumn" }],
        }])
    );
}

#[tokio::test]
async fn patch_updates_only_supplied_fields() {
    let t = spawn_app().await;
    let id = t.create_database("TestDatabase").await;
    let (_, before) = t.send("GET", &format!("/databases/{id}/"), None).await;

    let (status, patched) = t
        .send(
            "PATCH",
            &format!("/databases/{id}/"),
            Some(json!({ "name": "UpdatedDatabase" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["name"], "UpdatedDatabase");
    assert_eq!(patched["host"], before["host"]);
    assert_eq!(patched["password"], before["password"]);

    let (status, rehashed) = t
        .send(
            "PATCH",
            &format!("/databases/{id}/"),
            Some(json!({ "password": "rotated" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let stored = rehashed["password"].as_str().unwrap();
    assert_ne!(stored, before["password"].as_str().unwrap());
    assert!(verify_password("rotated", stored));
    assert!(!verify_password("testpassword", stored));
}

#[tokio::test]
async fn put_requires_every_field() {
    let t = spawn_app().await;
    let id = t.create_database("TestDatabase").await;

    let (status, body) = t
        .send(
            "PUT",
            &format!("/databases/{id}/"),
            Some(json!({ "name": "Renamed" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["fields"]["engine"], json!(["This field is required."]));

    let (status, body) = t
        .send(
            "PUT",
            &format!("/databases/{id}/"),
            Some(json!({
                "name": "Renamed",
                "host": "db.internal",
                "user": "admin",
                "password": "new-secret",
                "engine": "MYSQL",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Renamed");
    assert_eq!(body["engine"], "mysql");
    assert!(verify_password("new-secret", body["password"].as_str().unwrap()));
}

#[tokio::test]
async fn delete_database_cascades_to_tables_and_columns() {
    let t = spawn_app().await;
    let keep = t.create_database("keep").await;
    let kept_table = t.create_table(keep, "kept").await;

    let doomed = t.create_database("doomed").await;
    let tables = [
        t.create_table(doomed, "a").await,
        t.create_table(doomed, "b").await,
    ];
    let mut columns = Vec::new();
    for table in tables {
        columns.push(t.create_column(table, "id").await);
        columns.push(t.create_column(table, "name").await);
    }

    let (status, body) = t.send("DELETE", &format!("/databases/{doomed}/"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = t.send("GET", &format!("/databases/{doomed}/"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    for table in tables {
        let (status, _) = t.send("GET", &format!("/tables/{table}/"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
    for column in columns {
        let (status, _) = t.send("GET", &format!("/columns/{column}/"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let (_, remaining) = t.send("GET", "/tables/", None).await;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
    assert_eq!(remaining[0]["id"], kept_table);
    let (_, remaining) = t.send("GET", "/columns/", None).await;
    assert_eq!(remaining, json!([]));
}

#[tokio::test]
async fn unknown_database_id_is_not_found() {
    let t = spawn_app().await;
    for method in ["GET", "DELETE"] {
        let (status, body) = t.send(method, "/databases/999/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
    for method in ["PUT", "PATCH"] {
        let (status, _) = t
            .send(method, "/databases/999/", Some(json!({ "name": "x" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
    }
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let t = spawn_app().await;
    let (status, body) = t.send_raw("POST", "/databases/", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_BODY");
}

#[tokio::test]
async fn non_numeric_id_uses_error_format() {
    let t = spawn_app().await;
    for uri in ["/databases/abc/", "/tables/abc/", "/columns/1.5/"] {
        let (status, body) = t.send("GET", uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "INVALID_PATH", "{uri}");
        assert!(body["error"]["message"].is_string());
    }
    let (status, body) = t
        .send("PATCH", "/databases/abc/", Some(json!({ "name": "x" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_PATH");
}

#[tokio::test]
async fn list_keeps_children_with_their_own_database() {
    let t = spawn_app().await;
    let first = t.create_database("first").await;
    let second = t.create_database("second").await;
    let a = t.create_table(first, "a").await;
    let b = t.create_table(second, "b").await;
    t.create_table(first, "c").await;
    t.create_column(a, "a_id").await;
    t.create_column(b, "b_id").await;

    let (status, body) = t.send("GET", "/databases/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], first);
    assert_eq!(body[0]["tables"][0]["name"], "a");
    assert_eq!(body[0]["tables"][0]["columns"][0]["name"], "a_id");
    assert_eq!(body[0]["tables"][1]["name"], "c");
    assert_eq!(body[0]["tables"][1]["columns"], json!([]));
    assert_eq!(body[1]["id"], second);
    assert_eq!(body[1]["tables"].as_array().map(Vec::len), Some(1));
    assert_eq!(body[1]["tables"][0]["columns"][0]["name"], "b_id");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let t = spawn_app().await;
    let huge = "a".repeat(schema_catalog::router::BODY_LIMIT_BYTES + 1024);
    let (status, body) = t
        .send("POST", "/databases/", Some(json!({ "name": huge })))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn api_root_lists_resources() {
    let t = spawn_app().await;
    let (status, body) = t.send("GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["databases"], "/databases/");
    assert_eq!(body["tables"], "/tables/");
    assert_eq!(body["columns"], "/columns/");
}
