//! Live MongoDB checks. Run with `TEST_MONGODB_URI` set and `cargo test -- --ignored`.

mod common;

use common::{oak_desk, TestApp};
use furniture_service::services::{DocumentStore, Filter, MongoStore};
use mongodb::bson::doc;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

async fn live_store() -> MongoStore {
    let uri = std::env::var("TEST_MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let database = format!("furniture_test_{}", Uuid::new_v4().simple());
    MongoStore::connect(Some(&uri), Some(&database)).await
}

#[tokio::test]
#[ignore = "Requires a running MongoDB (TEST_MONGODB_URI)"]
async fn mongo_store_supports_crud_cycle() {
    let store = live_store().await;
    assert!(store.is_connected());
    store.ping().await.expect("MongoDB did not answer ping");

    let id = store
        .insert("furniture", doc! { "name": "Table", "category": "Tables", "price": 10.0 })
        .await
        .unwrap();

    let found = store
        .find("furniture", &Filter::new().contains_ignore_case("name", "TAB"), None)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);

    let updated = store
        .update_one("furniture", &Filter::by_id(id), doc! { "price": 12.5 })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.get_f64("price").unwrap(), 12.5);

    assert_eq!(store.delete_one("furniture", &Filter::by_id(id)).await.unwrap(), 1);
    assert_eq!(store.delete_one("furniture", &Filter::by_id(id)).await.unwrap(), 0);

    let names = store.list_collection_names().await.unwrap();
    assert!(names.contains(&"furniture".to_string()));
}

#[tokio::test]
#[ignore = "Requires a running MongoDB (TEST_MONGODB_URI)"]
async fn api_round_trip_against_mongo() {
    let app = TestApp::spawn_with_store(Arc::new(live_store().await)).await;

    let id = app.create(&oak_desk()).await;
    let body: Value = app
        .client
        .get(app.url(&format!("/api/furniture/{}", id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["name"], "Oak Desk");
    assert_eq!(body["stock"], 0);
}
