use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;
use tracing::{debug, error};

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid path parameter: {0}")]
    InvalidPath(String),

    #[error("Request body too large")]
    BodyTooLarge,

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl CatalogError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        Self::Validation(errors)
    }
}

/// Per-field validation messages, keyed by wire field name.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise a `Validation` error.
    pub fn into_result(self) -> Result<(), CatalogError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(self))
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            CatalogError::Validation(fields) => {
                debug!(errors = %fields, "request rejected by validation");
                let body = ApiErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: fields.to_string(),
                    fields: Some(fields),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            CatalogError::InvalidBody(reason) => {
                debug!(%reason, "request body rejected");
                let body = ApiErrorBody {
                    code: "INVALID_BODY".to_string(),
                    message: reason,
                    fields: None,
                };
                (StatusCode::BAD_REQUEST, body)
            }
            CatalogError::InvalidPath(reason) => {
                debug!(%reason, "path parameter rejected");
                let body = ApiErrorBody {
                    code: "INVALID_PATH".to_string(),
                    message: reason,
                    fields: None,
                };
                (StatusCode::BAD_REQUEST, body)
            }
            CatalogError::BodyTooLarge => {
                let body = ApiErrorBody {
                    code: "PAYLOAD_TOO_LARGE".to_string(),
                    message: "request body too large".to_string(),
                    fields: None,
                };
                (StatusCode::PAYLOAD_TOO_LARGE, body)
            }
            CatalogError::NotFound { resource, id } => {
                let body = ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{resource} {id} not found."),
                    fields: None,
                };
                (StatusCode::NOT_FOUND, body)
            }
            err @ (CatalogError::DatabaseError(_)
            | CatalogError::PasswordHash(_)
            | CatalogError::TaskJoin(_)) => {
                error!(error = %err, "request failed");
                let body = ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    fields: None,
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_collect_per_field() {
        let mut errors = FieldErrors::default();
        errors.add("name", "This field is required.");
        errors.add("engine", "Invalid value for engine: oracle");
        errors.add("name", "second");

        assert!(errors.contains("engine"));
        assert_eq!(errors.get("name").map(|m| m.len()), Some(2));
        assert_eq!(
            errors.to_string(),
            "engine: Invalid value for engine: oracle; name: This field is required. second"
        );
    }

    #[test]
    fn empty_field_errors_pass() {
        assert!(FieldErrors::default().into_result().is_ok());
    }

    #[test]
    fn status_codes_follow_error_kind() {
        let resp = CatalogError::invalid_field("database", "bad").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = CatalogError::InvalidPath("bad id".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = CatalogError::not_found("Table", 7).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = CatalogError::DatabaseError(SqlxError::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
