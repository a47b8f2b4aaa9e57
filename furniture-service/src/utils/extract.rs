use axum::{
    extract::{FromRequestParts, Path, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;

pub fn item_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("Item not found"))
}

/// Raw `:id` path segment. A segment the router cannot decode names no item,
/// so it rejects with 404 like an unknown id.
pub struct ItemPath(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for ItemPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                tracing::debug!(error = %e.body_text(), "Rejected furniture path");
                item_not_found()
            })?;

        Ok(ItemPath(id))
    }
}

/// Query string deserialized into `T`; malformed input rejects with 400 and a
/// `detail` message.
pub struct QueryParams<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;

        Ok(QueryParams(value))
    }
}
