//! Outbound representations.
//!
//! A database is rendered with a simplified `tables -> columns` tree
//! ([`database_view`]); a table fetched on its own carries full column
//! records and its parent id ([`table_view`]). The two shapes differ on
//! purpose and are kept as separate projections.

use crate::db::models::{DbColumn, DbDatabase, DbTable};
use crate::types::engine::Engine;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DatabaseView {
    pub id: i64,
    pub name: String,
    pub host: String,
    pub user: String,
    pub password: String,
    pub engine: Engine,
    pub tables: Vec<NestedTableView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NestedTableView {
    pub id: i64,
    pub name: String,
    pub columns: Vec<NestedColumnView>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NestedColumnView {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TableView {
    pub id: i64,
    pub name: String,
    pub columns: Vec<ColumnView>,
    pub database: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnView {
    pub id: i64,
    pub name: String,
    pub table: i64,
}

pub fn column_view(column: DbColumn) -> ColumnView {
    ColumnView {
        id: column.id,
        name: column.name,
        table: column.table_id,
    }
}

/// Full table record. `columns` must already belong to `table`.
pub fn table_view(table: DbTable, columns: Vec<DbColumn>) -> TableView {
    TableView {
        id: table.id,
        name: table.name,
        columns: columns.into_iter().map(column_view).collect(),
        database: table.database_id,
    }
}

/// Database record with its simplified child tree. Rows in `tables` and
/// `columns` not owned by `database` are ignored, and retrieval order is kept.
pub fn database_view(
    database: DbDatabase,
    tables: Vec<DbTable>,
    columns: Vec<DbColumn>,
) -> DatabaseView {
    let mut by_table = group_columns(columns);
    let owned = tables
        .into_iter()
        .filter(|t| t.database_id == database.id)
        .collect();
    nest(database, owned, &mut by_table)
}

/// [`database_view`] for many databases, grouping children in one pass.
pub fn database_views(
    databases: Vec<DbDatabase>,
    tables: Vec<DbTable>,
    columns: Vec<DbColumn>,
) -> Vec<DatabaseView> {
    let mut by_table = group_columns(columns);
    let mut by_database: HashMap<i64, Vec<DbTable>> = HashMap::new();
    for table in tables {
        by_database.entry(table.database_id).or_default().push(table);
    }
    databases
        .into_iter()
        .map(|db| {
            let owned = by_database.remove(&db.id).unwrap_or_default();
            nest(db, owned, &mut by_table)
        })
        .collect()
}

fn nest(
    database: DbDatabase,
    tables: Vec<DbTable>,
    by_table: &mut HashMap<i64, Vec<NestedColumnView>>,
) -> DatabaseView {
    let tables = tables
        .into_iter()
        .map(|t| NestedTableView {
            columns: by_table.remove(&t.id).unwrap_or_default(),
            id: t.id,
            name: t.name,
        })
        .collect();

    DatabaseView {
        id: database.id,
        name: database.name,
        host: database.host,
        user: database.user,
        password: database.password,
        engine: database.engine,
        tables,
    }
}

/// Groups rows by owning table, preserving retrieval order.
pub fn table_views(tables: Vec<DbTable>, columns: Vec<DbColumn>) -> Vec<TableView> {
    let mut by_table: HashMap<i64, Vec<DbColumn>> = HashMap::new();
    for column in columns {
        by_table.entry(column.table_id).or_default().push(column);
    }
    tables
        .into_iter()
        .map(|t| {
            let owned = by_table.remove(&t.id).unwrap_or_default();
            table_view(t, owned)
        })
        .collect()
}

fn group_columns(columns: Vec<DbColumn>) -> HashMap<i64, Vec<NestedColumnView>> {
    let mut grouped: HashMap<i64, Vec<NestedColumnView>> = HashMap::new();
    for c in columns {
        grouped.entry(c.table_id).or_default().push(NestedColumnView {
            id: c.id,
            name: c.name,
        });
    }
    grouped
}
