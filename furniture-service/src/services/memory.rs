use super::{DocumentStore, Filter, StoreError};
use crate::models::RecordId;
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-process store with the same contract as [`MongoStore`](super::MongoStore).
/// Native order is insertion order.
#[derive(Clone)]
pub struct MemoryStore {
    name: String,
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: Arc::default(),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<RecordId, StoreError> {
        let id = match document.get("_id") {
            Some(Bson::ObjectId(oid)) => RecordId::from(*oid),
            Some(other) => {
                return Err(StoreError::Write(format!(
                    "Unsupported _id value: {}",
                    other
                )))
            }
            None => {
                let id = RecordId::new();
                document.insert("_id", id.as_object_id());
                id
            }
        };

        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();
        if documents
            .iter()
            .any(|d| d.get_object_id("_id").ok() == Some(id.as_object_id()))
        {
            return Err(StoreError::Write(format!("Duplicate key: {}", id)));
        }
        documents.push(document);
        Ok(id)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
        limit: Option<i64>,
    ) -> Result<Vec<Document>, StoreError> {
        let cap = match limit {
            Some(l) if l > 0 => l as usize,
            _ => usize::MAX,
        };

        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .filter(|d| filter.matches(d))
                    .take(cap)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Filter,
        set: Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(target) = collections
            .get_mut(collection)
            .and_then(|documents| documents.iter_mut().find(|d| filter.matches(d)))
        else {
            return Ok(None);
        };

        for (key, value) in set {
            if key == "_id" {
                continue;
            }
            target.insert(key, value);
        }
        Ok(Some(target.clone()))
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match documents.iter().position(|d| filter.matches(d)) {
            Some(index) => {
                documents.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn database_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}
