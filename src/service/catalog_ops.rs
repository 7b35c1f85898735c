use crate::db::models::{ColumnRecord, DatabaseRecord, TableRecord};
use crate::db::sqlite::CatalogStorage;
use crate::error::CatalogError;
use crate::service::password::hash_password_blocking;
use crate::types::payloads::{
    ColumnPayload, DatabasePayload, TablePayload, WriteMode, dangling_reference,
};
use crate::types::views::{
    ColumnView, DatabaseView, TableView, column_view, database_view, database_views, table_view,
    table_views,
};
use tracing::{debug, info};

/// CRUD and search over the catalog, one method per resource operation.
///
/// Validation happens here; persistence and cascade atomicity are left
/// to [`CatalogStorage`].
#[derive(Clone)]
pub struct CatalogOps {
    storage: CatalogStorage,
}

impl CatalogOps {
    pub fn new(storage: CatalogStorage) -> Self {
        Self { storage }
    }

    // ---- databases ----

    pub async fn list_databases(&self) -> Result<Vec<DatabaseView>, CatalogError> {
        let databases = self.storage.list_databases().await?;
        let tables = self.storage.list_tables().await?;
        let columns = self.storage.list_columns().await?;
        Ok(database_views(databases, tables, columns))
    }

    pub async fn get_database(&self, id: i64) -> Result<DatabaseView, CatalogError> {
        let database = self
            .storage
            .get_database(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Database", id))?;
        let tables = self.storage.tables_of_database(id).await?;
        let columns = self.storage.columns_of_database(id).await?;
        Ok(database_view(database, tables, columns))
    }

    pub async fn create_database(
        &self,
        payload: DatabasePayload,
    ) -> Result<DatabaseView, CatalogError> {
        let changes = payload.validate(WriteMode::Create)?;
        let mut record = DatabaseRecord::default();
        changes.apply_to(&mut record);
        if let Some(plain) = changes.password {
            record.password = hash_password_blocking(plain).await?;
        }

        let created = self.storage.insert_database(&record).await?;
        info!(id = created.id, name = %created.name, engine = %created.engine, "database created");
        Ok(database_view(created, Vec::new(), Vec::new()))
    }

    pub async fn update_database(
        &self,
        id: i64,
        payload: DatabasePayload,
        mode: WriteMode,
    ) -> Result<DatabaseView, CatalogError> {
        let existing = self
            .storage
            .get_database(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Database", id))?;
        let changes = payload.validate(mode)?;

        let mut record = DatabaseRecord::from(existing);
        changes.apply_to(&mut record);
        let rehashed = changes.password.is_some();
        if let Some(plain) = changes.password {
            record.password = hash_password_blocking(plain).await?;
        }

        self.storage
            .update_database(id, &record)
            .await?
            .ok_or_else(|| CatalogError::not_found("Database", id))?;
        debug!(id, ?mode, rehashed, "database updated");
        self.get_database(id).await
    }

    pub async fn delete_database(&self, id: i64) -> Result<(), CatalogError> {
        let report = self
            .storage
            .delete_database(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Database", id))?;
        info!(
            id,
            tables = report.tables,
            columns = report.columns,
            "database deleted"
        );
        Ok(())
    }

    // ---- tables ----

    pub async fn list_tables(&self) -> Result<Vec<TableView>, CatalogError> {
        let tables = self.storage.list_tables().await?;
        let columns = self.storage.list_columns().await?;
        Ok(table_views(tables, columns))
    }

    pub async fn get_table(&self, id: i64) -> Result<TableView, CatalogError> {
        let table = self
            .storage
            .get_table(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Table", id))?;
        let columns = self.storage.columns_of_table(id).await?;
        Ok(table_view(table, columns))
    }

    /// Case-insensitive substring match on table name. An empty needle
    /// matches every table. Case folding covers ASCII letters only.
    pub async fn search_tables(&self, needle: &str) -> Result<Vec<TableView>, CatalogError> {
        let tables = self.storage.search_tables(needle).await?;
        let columns = self.storage.columns_matching(needle).await?;
        debug!(needle, hits = tables.len(), "table search");
        Ok(table_views(tables, columns))
    }

    pub async fn create_table(&self, payload: TablePayload) -> Result<TableView, CatalogError> {
        let changes = payload.validate(WriteMode::Create)?;
        if let Some(database_id) = changes.database {
            self.ensure_database(database_id).await?;
        }
        let mut record = TableRecord::default();
        changes.apply_to(&mut record);

        let created = self.storage.insert_table(&record).await?;
        info!(id = created.id, database = created.database_id, name = %created.name, "table created");
        Ok(table_view(created, Vec::new()))
    }

    pub async fn update_table(
        &self,
        id: i64,
        payload: TablePayload,
        mode: WriteMode,
    ) -> Result<TableView, CatalogError> {
        let existing = self
            .storage
            .get_table(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Table", id))?;
        let changes = payload.validate(mode)?;
        if let Some(database_id) = changes.database {
            self.ensure_database(database_id).await?;
        }

        let mut record = TableRecord::from(existing);
        changes.apply_to(&mut record);
        let updated = self
            .storage
            .update_table(id, &record)
            .await?
            .ok_or_else(|| CatalogError::not_found("Table", id))?;
        debug!(id, ?mode, "table updated");

        let columns = self.storage.columns_of_table(id).await?;
        Ok(table_view(updated, columns))
    }

    pub async fn delete_table(&self, id: i64) -> Result<(), CatalogError> {
        let report = self
            .storage
            .delete_table(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Table", id))?;
        info!(id, columns = report.columns, "table deleted");
        Ok(())
    }

    // ---- columns ----

    pub async fn list_columns(&self) -> Result<Vec<ColumnView>, CatalogError> {
        let columns = self.storage.list_columns().await?;
        Ok(columns.into_iter().map(column_view).collect())
    }

    pub async fn get_column(&self, id: i64) -> Result<ColumnView, CatalogError> {
        self.storage
            .get_column(id)
            .await?
            .map(column_view)
            .ok_or_else(|| CatalogError::not_found("Column", id))
    }

    pub async fn create_column(&self, payload: ColumnPayload) -> Result<ColumnView, CatalogError> {
        let changes = payload.validate(WriteMode::Create)?;
        if let Some(table_id) = changes.table {
            self.ensure_table(table_id).await?;
        }
        let mut record = ColumnRecord::default();
        changes.apply_to(&mut record);

        let created = self.storage.insert_column(&record).await?;
        info!(id = created.id, table = created.table_id, name = %created.name, "column created");
        Ok(column_view(created))
    }

    pub async fn update_column(
        &self,
        id: i64,
        payload: ColumnPayload,
        mode: WriteMode,
    ) -> Result<ColumnView, CatalogError> {
        let existing = self
            .storage
            .get_column(id)
            .await?
            .ok_or_else(|| CatalogError::not_found("Column", id))?;
        let changes = payload.validate(mode)?;
        if let Some(table_id) = changes.table {
            self.ensure_table(table_id).await?;
        }

        let mut record = ColumnRecord::from(existing);
        changes.apply_to(&mut record);
        let updated = self
            .storage
            .update_column(id, &record)
            .await?
            .ok_or_else(|| CatalogError::not_found("Column", id))?;
        debug!(id, ?mode, "column updated");
        Ok(column_view(updated))
    }

    pub async fn delete_column(&self, id: i64) -> Result<(), CatalogError> {
        if !self.storage.delete_column(id).await? {
            return Err(CatalogError::not_found("Column", id));
        }
        info!(id, "column deleted");
        Ok(())
    }

    async fn ensure_database(&self, id: i64) -> Result<(), CatalogError> {
        if self.storage.database_exists(id).await? {
            Ok(())
        } else {
            Err(CatalogError::invalid_field("database", dangling_reference(id)))
        }
    }

    async fn ensure_table(&self, id: i64) -> Result<(), CatalogError> {
        if self.storage.table_exists(id).await? {
            Ok(())
        } else {
            Err(CatalogError::invalid_field("table", dangling_reference(id)))
        }
    }
}
