//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and their writable fields
//! - `schema.rs`: SQL DDL for initializing the database (SQLite)
//! - `sqlite.rs`: `CatalogStorage`, the only place that issues SQL

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{CascadeReport, DbColumn, DbDatabase, DbTable};
pub use schema::SQLITE_INIT;
pub use sqlite::{CatalogStorage, SqlitePool, connect};
