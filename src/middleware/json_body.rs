use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;

use crate::error::CatalogError;

/// `Json<T>` whose rejections are reported in the catalog error format
/// instead of axum's plain-text 415/422 responses.
pub struct CatalogJson<T>(pub T);

impl<S, T> FromRequest<S> for CatalogJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = CatalogError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(CatalogJson(value)),
            Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                Err(CatalogError::BodyTooLarge)
            }
            Err(rejection) => Err(CatalogError::InvalidBody(rejection.body_text())),
        }
    }
}
