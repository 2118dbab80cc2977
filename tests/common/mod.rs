//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use arma_api::catalog::Catalog;
use arma_api::config::{ApiConfig, CatalogConfig};
use arma_api::store::{Document, DocumentStore, MemoryStore, TextSearchable};
use arma_api::{HttpServer, QueryEngine};
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

pub fn doc(value: Value) -> Document {
    Document::try_from(value).unwrap()
}

/// Two mods, four items, text indexes on both collections.
///
/// Scan order: ACE_CableTie, ace_rifle, arifle_MX_F, ItemMap.
pub fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::in_memory("arma-api");
    for name in ["data.ace", "data.vanilla"] {
        store.create_text_index(name).unwrap();
    }
    store
        .insert_many(
            "data.ace",
            vec![
                doc(json!({"class": "ACE_CableTie", "mod": "ace", "type": "Tools", "count": 5})),
                doc(json!({
                    "class": "ace_rifle",
                    "mod": "ace",
                    "type": "Primaries",
                    "weight": 10,
                    "displayName": "Precision Rifle"
                })),
            ],
        )
        .unwrap();
    store
        .insert_many(
            "data.vanilla",
            vec![
                doc(json!({
                    "class": "arifle_MX_F",
                    "mod": "vanilla",
                    "type": "Primaries",
                    "weight": 5,
                    "displayName": "MX Rifle"
                })),
                doc(json!({"class": "ItemMap", "mod": "vanilla", "type": "Maps", "weight": 1})),
            ],
        )
        .unwrap();
    Arc::new(store)
}

pub fn engine(store: Arc<MemoryStore>) -> Arc<QueryEngine<MemoryStore>> {
    let config = CatalogConfig::default();
    Arc::new(QueryEngine::new(store, Catalog::new(config.supported_mods)))
}

pub fn router() -> Router {
    HttpServer::new(ApiConfig::default(), engine(seeded_store())).router()
}

pub async fn get(router: Router, uri: &str) -> Response<Body> {
    router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// The `class` field of every item in a list body, in body order.
pub fn classes(body: &str) -> Vec<String> {
    let items: Vec<Value> = serde_json::from_str(body).unwrap();
    items
        .iter()
        .map(|item| item["class"].as_str().unwrap().to_string())
        .collect()
}
