use crate::db::models::{
    CascadeReport, ColumnRecord, DatabaseRecord, DbColumn, DbDatabase, DbTable, TableRecord,
};
use crate::db::schema::SQLITE_INIT;
use crate::error::CatalogError;
use crate::types::engine::Engine;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool with foreign keys enforced, creating the file if needed.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, CatalogError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

/// Escape `%`, `_` and `\` and wrap in wildcards for `LIKE ... ESCAPE '\'`.
pub fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[derive(Clone)]
pub struct CatalogStorage {
    pool: SqlitePool,
}

impl CatalogStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), CatalogError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // ---- databases ----

    pub async fn list_databases(&self) -> Result<Vec<DbDatabase>, CatalogError> {
        let rows = sqlx::query(
            r#"SELECT id, name, host, user_name, password, engine
               FROM databases ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_database).collect()
    }

    pub async fn get_database(&self, id: i64) -> Result<Option<DbDatabase>, CatalogError> {
        let row = sqlx::query(
            r#"SELECT id, name, host, user_name, password, engine
               FROM databases WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_database).transpose()
    }

    pub async fn database_exists(&self, id: i64) -> Result<bool, CatalogError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM databases WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn insert_database(&self, rec: &DatabaseRecord) -> Result<DbDatabase, CatalogError> {
        let id = sqlx::query(
            r#"INSERT INTO databases (name, host, user_name, password, engine)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&rec.name)
        .bind(&rec.host)
        .bind(&rec.user)
        .bind(&rec.password)
        .bind(rec.engine.as_str())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        Ok(Self::database_from_record(id, rec.clone()))
    }

    /// Overwrite every writable field. `None` when `id` does not exist.
    pub async fn update_database(
        &self,
        id: i64,
        rec: &DatabaseRecord,
    ) -> Result<Option<DbDatabase>, CatalogError> {
        let affected = sqlx::query(
            r#"UPDATE databases SET
                name = ?,
                host = ?,
                user_name = ?,
                password = ?,
                engine = ?
              WHERE id = ?"#,
        )
        .bind(&rec.name)
        .bind(&rec.host)
        .bind(&rec.user)
        .bind(&rec.password)
        .bind(rec.engine.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok((affected > 0).then(|| Self::database_from_record(id, rec.clone())))
    }

    /// Delete a database and everything it owns in one transaction.
    pub async fn delete_database(&self, id: i64) -> Result<Option<CascadeReport>, CatalogError> {
        let mut tx = self.pool.begin().await?;

        let columns = sqlx::query(
            r#"DELETE FROM catalog_columns WHERE table_id IN
               (SELECT id FROM catalog_tables WHERE database_id = ?)"#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let tables = sqlx::query("DELETE FROM catalog_tables WHERE database_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM databases WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        tx.commit().await?;
        Ok(Some(CascadeReport { tables, columns }))
    }

    // ---- tables ----

    pub async fn list_tables(&self) -> Result<Vec<DbTable>, CatalogError> {
        let rows = sqlx::query_as::<_, DbTable>(
            "SELECT id, name, database_id FROM catalog_tables ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_table(&self, id: i64) -> Result<Option<DbTable>, CatalogError> {
        let row = sqlx::query_as::<_, DbTable>(
            "SELECT id, name, database_id FROM catalog_tables WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn table_exists(&self, id: i64) -> Result<bool, CatalogError> {
        let found: Option<(i64,)> = sqlx::query_as("SELECT id FROM catalog_tables WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    pub async fn tables_of_database(&self, database_id: i64) -> Result<Vec<DbTable>, CatalogError> {
        let rows = sqlx::query_as::<_, DbTable>(
            "SELECT id, name, database_id FROM catalog_tables WHERE database_id = ? ORDER BY id",
        )
        .bind(database_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Tables whose name contains `needle`, ignoring ASCII case.
    pub async fn search_tables(&self, needle: &str) -> Result<Vec<DbTable>, CatalogError> {
        let rows = sqlx::query_as::<_, DbTable>(
            r#"SELECT id, name, database_id FROM catalog_tables
               WHERE name LIKE ? ESCAPE '\' ORDER BY id"#,
        )
        .bind(like_pattern(needle))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_table(&self, rec: &TableRecord) -> Result<DbTable, CatalogError> {
        let id = sqlx::query("INSERT INTO catalog_tables (name, database_id) VALUES (?, ?)")
            .bind(&rec.name)
            .bind(rec.database_id)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(DbTable {
            id,
            name: rec.name.clone(),
            database_id: rec.database_id,
        })
    }

    pub async fn update_table(
        &self,
        id: i64,
        rec: &TableRecord,
    ) -> Result<Option<DbTable>, CatalogError> {
        let affected =
            sqlx::query("UPDATE catalog_tables SET name = ?, database_id = ? WHERE id = ?")
                .bind(&rec.name)
                .bind(rec.database_id)
                .bind(id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok((affected > 0).then(|| DbTable {
            id,
            name: rec.name.clone(),
            database_id: rec.database_id,
        }))
    }

    /// Delete a table and its columns in one transaction.
    pub async fn delete_table(&self, id: i64) -> Result<Option<CascadeReport>, CatalogError> {
        let mut tx = self.pool.begin().await?;

        let columns = sqlx::query("DELETE FROM catalog_columns WHERE table_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let removed = sqlx::query("DELETE FROM catalog_tables WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if removed == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        tx.commit().await?;
        Ok(Some(CascadeReport { tables: 0, columns }))
    }

    // ---- columns ----

    pub async fn list_columns(&self) -> Result<Vec<DbColumn>, CatalogError> {
        let rows = sqlx::query_as::<_, DbColumn>(
            "SELECT id, name, table_id FROM catalog_columns ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_column(&self, id: i64) -> Result<Option<DbColumn>, CatalogError> {
        let row = sqlx::query_as::<_, DbColumn>(
            "SELECT id, name, table_id FROM catalog_columns WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn columns_of_table(&self, table_id: i64) -> Result<Vec<DbColumn>, CatalogError> {
        let rows = sqlx::query_as::<_, DbColumn>(
            "SELECT id, name, table_id FROM catalog_columns WHERE table_id = ? ORDER BY id",
        )
        .bind(table_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Columns of every table [`search_tables`](Self::search_tables) returns
    /// for the same `needle`.
    pub async fn columns_matching(&self, needle: &str) -> Result<Vec<DbColumn>, CatalogError> {
        let rows = sqlx::query_as::<_, DbColumn>(
            r#"SELECT c.id, c.name, c.table_id
               FROM catalog_columns c
               JOIN catalog_tables t ON t.id = c.table_id
               WHERE t.name LIKE ? ESCAPE '\'
               ORDER BY c.id"#,
        )
        .bind(like_pattern(needle))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn columns_of_database(
        &self,
        database_id: i64,
    ) -> Result<Vec<DbColumn>, CatalogError> {
        let rows = sqlx::query_as::<_, DbColumn>(
            r#"SELECT c.id, c.name, c.table_id
               FROM catalog_columns c
               JOIN catalog_tables t ON t.id = c.table_id
               WHERE t.database_id = ?
               ORDER BY c.id"#,
        )
        .bind(database_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_column(&self, rec: &ColumnRecord) -> Result<DbColumn, CatalogError> {
        let id = sqlx::query("INSERT INTO catalog_columns (name, table_id) VALUES (?, ?)")
            .bind(&rec.name)
            .bind(rec.table_id)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(DbColumn {
            id,
            name: rec.name.clone(),
            table_id: rec.table_id,
        })
    }

    pub async fn update_column(
        &self,
        id: i64,
        rec: &ColumnRecord,
    ) -> Result<Option<DbColumn>, CatalogError> {
        let affected =
            sqlx::query("UPDATE catalog_columns SET name = ?, table_id = ? WHERE id = ?")
                .bind(&rec.name)
                .bind(rec.table_id)
                .bind(id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok((affected > 0).then(|| DbColumn {
            id,
            name: rec.name.clone(),
            table_id: rec.table_id,
        }))
    }

    /// `false` when nothing was deleted.
    pub async fn delete_column(&self, id: i64) -> Result<bool, CatalogError> {
        let removed = sqlx::query("DELETE FROM catalog_columns WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(removed > 0)
    }

    fn database_from_record(id: i64, rec: DatabaseRecord) -> DbDatabase {
        DbDatabase {
            id,
            name: rec.name,
            host: rec.host,
            user: rec.user,
            password: rec.password,
            engine: rec.engine,
        }
    }

    fn row_to_database(row: SqliteRow) -> Result<DbDatabase, CatalogError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let host: String = row.try_get("host")?;
        let user: String = row.try_get("user_name")?;
        let password: String = row.try_get("password")?;
        let engine_str: String = row.try_get("engine")?;

        let engine = Engine::from_str(&engine_str).map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(DbDatabase {
            id,
            name,
            host,
            user,
            password,
            engine,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("user"), "%user%");
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
