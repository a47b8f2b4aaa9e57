#![allow(dead_code)]

use furniture_service::config::{DatabaseConfig, FurnitureConfig, StoreBackend};
use furniture_service::services::{DocumentStore, MemoryStore, MongoStore};
use furniture_service::startup::{build_router, AppState, Application};
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub fn test_config() -> FurnitureConfig {
    FurnitureConfig {
        common: CoreConfig { port: 0 },
        database: DatabaseConfig {
            url: None,
            name: Some("furniture_test".to_string()),
        },
        store: StoreBackend::Memory,
    }
}

/// Router over a disconnected Mongo store, as when DATABASE_URL is unset.
pub fn unavailable_router() -> axum::Router {
    let mut config = test_config();
    config.database.name = None;
    config.store = StoreBackend::Mongo;
    build_router(AppState {
        config,
        store: Arc::new(MongoStore::disconnected()),
    })
}

pub fn oak_desk() -> Value {
    json!({
        "name": "Oak Desk",
        "category": "Desks",
        "price": 199.99
    })
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<dyn DocumentStore>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MemoryStore::new("furniture_test"))).await
    }

    pub async fn spawn_with_store(store: Arc<dyn DocumentStore>) -> Self {
        let app = Application::with_store(test_config(), store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Creates a record and returns its id.
    pub async fn create(&self, body: &Value) -> String {
        let response = self
            .client
            .post(self.url("/api/furniture"))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status().as_u16(), 200);

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("id missing").to_string()
    }

    pub async fn list(&self, query: &str) -> Vec<Value> {
        self.client
            .get(self.url(&format!("/api/furniture{}", query)))
            .send()
            .await
            .expect("Failed to execute request")
            .json()
            .await
            .expect("Failed to parse JSON")
    }
}
