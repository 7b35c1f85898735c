use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::CatalogError;

/// `Path<T>` whose rejections use the catalog error format, so a
/// non-numeric id is a JSON 400 like any other bad input.
pub struct CatalogPath<T>(pub T);

impl<S, T> FromRequestParts<S> for CatalogPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = CatalogError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| CatalogPath(value))
            .map_err(|rejection| CatalogError::InvalidPath(rejection.body_text()))
    }
}
