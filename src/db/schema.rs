//! SQL DDL for initializing the catalog storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT on every entity
/// - `engine` restricted to the lowercase engine tokens
/// - parent references NOT NULL with ON DELETE CASCADE
/// - an index on each parent reference for child lookups
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS databases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    host TEXT NOT NULL,
    user_name TEXT NOT NULL,
    password TEXT NOT NULL, -- argon2 PHC string
    engine TEXT NOT NULL CHECK (engine IN ('postgresql', 'mysql'))
);

CREATE TABLE IF NOT EXISTS catalog_tables (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    database_id INTEGER NOT NULL REFERENCES databases(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_catalog_tables_database_id ON catalog_tables(database_id);

CREATE TABLE IF NOT EXISTS catalog_columns (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    table_id INTEGER NOT NULL REFERENCES catalog_tables(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_catalog_columns_table_id ON catalog_columns(table_id);
"#;
