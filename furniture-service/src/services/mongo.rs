use super::{DocumentStore, Filter, StoreError};
use crate::models::RecordId;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, FindOneAndUpdateOptions, FindOptions, ReturnDocument},
    Client as MongoClient, Collection, Database,
};
use std::time::Duration;

const STARTUP_PING_TIMEOUT: Duration = Duration::from_secs(3);

/// MongoDB-backed store. Holds no database when the connection settings were
/// missing or unusable; every operation then fails with [`StoreError::Unavailable`].
#[derive(Clone)]
pub struct MongoStore {
    db: Option<Database>,
}

impl MongoStore {
    /// Never fails: connection problems leave the store disconnected and are logged.
    pub async fn connect(url: Option<&str>, database: Option<&str>) -> Self {
        let (Some(url), Some(database)) = (url, database) else {
            tracing::warn!("DATABASE_URL or DATABASE_NAME not set, running without a database");
            return Self::disconnected();
        };

        tracing::info!(database = %database, "Connecting to MongoDB");
        let mut client_options = match ClientOptions::parse(url).await {
            Ok(options) => options,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to parse MongoDB connection string, running without a database"
                );
                return Self::disconnected();
            }
        };
        client_options.app_name = Some("furniture-service".to_string());

        let client = match MongoClient::with_options(client_options) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to create MongoDB client, running without a database"
                );
                return Self::disconnected();
            }
        };

        // Only the startup ping is bounded; requests keep the driver's selection timeout
        let db = client.database(database);
        let ping = db.run_command(doc! { "ping": 1 }, None);
        match tokio::time::timeout(STARTUP_PING_TIMEOUT, ping).await {
            Ok(Ok(_)) => {
                tracing::info!(database = %database, "Successfully connected to MongoDB database")
            }
            Ok(Err(e)) => tracing::warn!(
                error = %e,
                database = %database,
                "MongoDB did not answer the startup ping, keeping handle"
            ),
            Err(_) => tracing::warn!(
                database = %database,
                timeout_secs = STARTUP_PING_TIMEOUT.as_secs(),
                "MongoDB startup ping timed out, keeping handle"
            ),
        }

        Self { db: Some(db) }
    }

    pub fn disconnected() -> Self {
        Self { db: None }
    }

    fn db(&self) -> Result<&Database, StoreError> {
        self.db.as_ref().ok_or(StoreError::Unavailable)
    }

    fn collection(&self, name: &str) -> Result<Collection<Document>, StoreError> {
        Ok(self.db()?.collection(name))
    }
}

fn operation_error(context: &str, e: mongodb::error::Error) -> StoreError {
    tracing::error!(error = %e, "{}", context);
    StoreError::Operation(e.to_string())
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, collection: &str, document: Document) -> Result<RecordId, StoreError> {
        let result = self
            .collection(collection)?
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!(collection = %collection, error = %e, "Failed to insert document");
                StoreError::Write(e.to_string())
            })?;

        result
            .inserted_id
            .as_object_id()
            .map(RecordId::from)
            .ok_or_else(|| StoreError::Write("Inserted id is not an ObjectId".to_string()))
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        let options = FindOptions::builder()
            .limit(limit.filter(|l| *l > 0))
            .build();

        let cursor = self
            .collection(collection)?
            .find(filter.to_document(), options)
            .await
            .map_err(|e| operation_error("Failed to query documents", e))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| operation_error("Failed to read query cursor", e))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<Option<Document>, StoreError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection(collection)?
            .find_one_and_update(filter.to_document(), doc! { "$set": set }, options)
            .await
            .map_err(|e| operation_error("Failed to update document", e))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)?
            .delete_one(filter.to_document(), None)
            .await
            .map_err(|e| operation_error("Failed to delete document", e))?;
        Ok(result.deleted_count)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        self.db()?
            .list_collection_names(None)
            .await
            .map_err(|e| operation_error("Failed to list collections", e))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db()?
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| operation_error("MongoDB health check failed", e))?;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.db.is_some()
    }

    fn database_name(&self) -> Option<String> {
        self.db.as_ref().map(|db| db.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_settings_leave_store_disconnected() {
        let store = MongoStore::connect(None, Some("furniture_db")).await;
        assert!(!store.is_connected());
        assert!(store.database_name().is_none());
    }

    #[tokio::test]
    async fn invalid_url_leaves_store_disconnected() {
        let store = MongoStore::connect(Some("not a url"), Some("furniture_db")).await;
        assert!(!store.is_connected());
    }

    #[tokio::test]
    async fn unreachable_host_does_not_stall_startup() {
        let started = std::time::Instant::now();
        let store = MongoStore::connect(Some("mongodb://127.0.0.1:1"), Some("furniture_db")).await;

        assert!(started.elapsed() < STARTUP_PING_TIMEOUT + Duration::from_secs(2));
        assert!(store.is_connected());
        assert_eq!(store.database_name().as_deref(), Some("furniture_db"));
    }

    #[tokio::test]
    async fn disconnected_store_reports_unavailable() {
        let store = MongoStore::disconnected();

        assert!(matches!(
            store.insert("furniture", Document::new()).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            store.find("furniture", &Filter::new(), None).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            store.delete_one("furniture", &Filter::new()).await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(
            store.list_collection_names().await,
            Err(StoreError::Unavailable)
        ));
        assert!(matches!(store.ping().await, Err(StoreError::Unavailable)));
    }
}
