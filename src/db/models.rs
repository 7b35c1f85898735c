use crate::types::engine::Engine;
use serde::Serialize;
use sqlx::FromRow;

/// Row of `databases`. Built by hand in `CatalogStorage` since `engine`
/// is stored as its lowercase token.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DbDatabase {
    pub id: i64,
    pub name: String,
    pub host: String,
    pub user: String,
    /// Argon2 PHC string, never plaintext.
    pub password: String,
    pub engine: Engine,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbTable {
    pub id: i64,
    pub name: String,
    pub database_id: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq, FromRow)]
pub struct DbColumn {
    pub id: i64,
    pub name: String,
    pub table_id: i64,
}

/// Writable fields of a database row.
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseRecord {
    pub name: String,
    pub host: String,
    pub user: String,
    pub password: String,
    pub engine: Engine,
}

impl Default for DatabaseRecord {
    fn default() -> Self {
        Self {
            name: String::new(),
            host: String::new(),
            user: String::new(),
            password: String::new(),
            engine: Engine::Postgresql,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRecord {
    pub name: String,
    pub database_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnRecord {
    pub name: String,
    pub table_id: i64,
}

impl From<DbDatabase> for DatabaseRecord {
    fn from(d: DbDatabase) -> Self {
        Self {
            name: d.name,
            host: d.host,
            user: d.user,
            password: d.password,
            engine: d.engine,
        }
    }
}

impl From<DbTable> for TableRecord {
    fn from(t: DbTable) -> Self {
        Self {
            name: t.name,
            database_id: t.database_id,
        }
    }
}

impl From<DbColumn> for ColumnRecord {
    fn from(c: DbColumn) -> Self {
        Self {
            name: c.name,
            table_id: c.table_id,
        }
    }
}

/// Rows removed alongside a cascaded parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub tables: u64,
    pub columns: u64,
}
