use super::Filter;
use crate::models::RecordId;
use async_trait::async_trait;
use mongodb::bson::Document;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available")]
    Unavailable,

    #[error("{0}")]
    Write(String),

    #[error("{0}")]
    Operation(String),

    #[error("Failed to encode document: {0}")]
    Encode(String),

    #[error("Failed to decode stored document: {0}")]
    Decode(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable => AppError::StoreUnavailable,
            StoreError::Write(msg) | StoreError::Operation(msg) => {
                AppError::DatabaseError(anyhow::anyhow!(msg))
            }
            err @ (StoreError::Encode(_) | StoreError::Decode(_)) => {
                AppError::InternalError(anyhow::anyhow!(err.to_string()))
            }
        }
    }
}

/// Generic access to named document collections.
///
/// Every call is a single attempt against the backend; no retries, no timeouts
/// beyond what the driver applies.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts `document` and returns the identifier the store assigned to it.
    async fn insert(&self, collection: &str, document: Document) -> Result<RecordId, StoreError>;

    /// Returns matching documents in store-native order, capped at `limit` when
    /// it is positive.
    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError>;

    /// Applies `set` to the first matching document and returns it post-update,
    /// or `None` when nothing matched.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Deletes at most one matching document and returns how many were removed.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn is_connected(&self) -> bool;

    fn database_name(&self) -> Option<String>;
}
