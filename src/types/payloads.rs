//! Inbound request bodies and their field validation.
//!
//! Every payload field is a [`Field`] so that one struct serves create,
//! full replace and partial update. [`WriteMode`] decides which fields must
//! be present; an explicit `null` is always rejected.

use crate::db::models::{ColumnRecord, DatabaseRecord, TableRecord};
use crate::error::{CatalogError, FieldErrors};
use crate::types::engine::Engine;
use serde::{Deserialize, Deserializer};

/// `None` when the key is absent, `Some(None)` when it is `null`.
pub type Field<T> = Option<Option<T>>;

pub const MAX_FIELD_LEN: usize = 255;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NULL: &str = "This field may not be null.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: all writable fields required.
    Create,
    /// PUT: all writable fields required, record fully replaced.
    Replace,
    /// PATCH: only supplied fields change.
    Partial,
}

impl WriteMode {
    fn requires_all(self) -> bool {
        !matches!(self, WriteMode::Partial)
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabasePayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "present")]
    pub host: Field<String>,
    #[serde(default, deserialize_with = "present")]
    pub user: Field<String>,
    #[serde(default, deserialize_with = "present")]
    pub password: Field<String>,
    #[serde(default, deserialize_with = "present")]
    pub engine: Field<String>,
}

/// Validated database fields. `password` is still plaintext here.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DatabaseChanges {
    pub name: Option<String>,
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub engine: Option<Engine>,
}

impl DatabasePayload {
    pub fn validate(self, mode: WriteMode) -> Result<DatabaseChanges, CatalogError> {
        let mut errors = FieldErrors::default();
        let name = text_field(&mut errors, "name", self.name, mode);
        let host = text_field(&mut errors, "host", self.host, mode);
        let user = text_field(&mut errors, "user", self.user, mode);
        let password = text_field(&mut errors, "password", self.password, mode);
        let engine = match supplied(&mut errors, "engine", self.engine, mode) {
            Some(token) => match token.parse::<Engine>() {
                Ok(engine) => Some(engine),
                Err(e) => {
                    errors.add("engine", e.to_string());
                    None
                }
            },
            None => None,
        };
        errors.into_result()?;
        Ok(DatabaseChanges {
            name,
            host,
            user,
            password,
            engine,
        })
    }
}

impl DatabaseChanges {
    /// Copies every supplied field except the password, which the caller
    /// hashes before storing.
    pub fn apply_to(&self, record: &mut DatabaseRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(host) = &self.host {
            record.host = host.clone();
        }
        if let Some(user) = &self.user {
            record.user = user.clone();
        }
        if let Some(engine) = self.engine {
            record.engine = engine;
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct TablePayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "present")]
    pub database: Field<i64>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TableChanges {
    pub name: Option<String>,
    pub database: Option<i64>,
}

impl TablePayload {
    pub fn validate(self, mode: WriteMode) -> Result<TableChanges, CatalogError> {
        let mut errors = FieldErrors::default();
        let name = text_field(&mut errors, "name", self.name, mode);
        let database = supplied(&mut errors, "database", self.database, mode);
        errors.into_result()?;
        Ok(TableChanges { name, database })
    }
}

impl TableChanges {
    pub fn apply_to(&self, record: &mut TableRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(database) = self.database {
            record.database_id = database;
        }
    }
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ColumnPayload {
    #[serde(default, deserialize_with = "present")]
    pub name: Field<String>,
    #[serde(default, deserialize_with = "present")]
    pub table: Field<i64>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ColumnChanges {
    pub name: Option<String>,
    pub table: Option<i64>,
}

impl ColumnPayload {
    pub fn validate(self, mode: WriteMode) -> Result<ColumnChanges, CatalogError> {
        let mut errors = FieldErrors::default();
        let name = text_field(&mut errors, "name", self.name, mode);
        let table = supplied(&mut errors, "table", self.table, mode);
        errors.into_result()?;
        Ok(ColumnChanges { name, table })
    }
}

impl ColumnChanges {
    pub fn apply_to(&self, record: &mut ColumnRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(table) = self.table {
            record.table_id = table;
        }
    }
}

/// Query string of `GET /tables/search_by_name/`.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NameSearch {
    #[serde(default)]
    pub name: String,
}

/// Message used when a parent reference does not resolve.
pub fn dangling_reference(id: i64) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

/// Marks a key as present so that `null` can be told apart from absence.
fn present<'de, D, T>(deserializer: D) -> Result<Field<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Unwraps a field, recording a message when it is null or required but absent.
fn supplied<T>(
    errors: &mut FieldErrors,
    field: &str,
    value: Field<T>,
    mode: WriteMode,
) -> Option<T> {
    match value {
        Some(Some(value)) => Some(value),
        Some(None) => {
            errors.add(field, NULL);
            None
        }
        None => {
            if mode.requires_all() {
                errors.add(field, REQUIRED);
            }
            None
        }
    }
}

fn text_field(
    errors: &mut FieldErrors,
    field: &str,
    value: Field<String>,
    mode: WriteMode,
) -> Option<String> {
    let raw = supplied(errors, field, value, mode)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if trimmed.chars().count() > MAX_FIELD_LEN {
        errors.add(
            field,
            format!("Ensure this field has no more than {MAX_FIELD_LEN} characters."),
        );
        return None;
    }
    Some(trimmed.to_string())
}
