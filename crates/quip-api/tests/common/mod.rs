#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode};
use bson::oid::ObjectId;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use quip_api::AppStateInner;
use quip_db::{MemoryStore, Store};
use quip_types::{MessageDoc, ResponseKind};

pub const ADMIN_KEY: &str = "test-admin-key";

pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_admin_key(Some(ADMIN_KEY))
    }

    pub fn with_admin_key(key: Option<&str>) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppStateInner::new(store.clone(), key.map(str::to_string));
        Self {
            store,
            router: quip_api::router(state),
        }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn admin(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        self.send(admin_request(method, uri, Some(ADMIN_KEY), body)).await
    }

    pub async fn add_user(&self, id: &str, response: ResponseKind) {
        self.store.upsert_user_response(id, &response).await.unwrap();
    }

    /// Insert a message and link it to its author, as the admin route does.
    pub async fn add_message(
        &self,
        user_id: &str,
        category: &str,
        text: &str,
        active: bool,
    ) -> ObjectId {
        let doc = MessageDoc {
            id: ObjectId::new(),
            user_id: user_id.to_string(),
            message_id: None,
            category: category.to_string(),
            text: text.to_string(),
            active,
            weight: 1.0,
        };
        let id = doc.id;
        self.store.insert_messages(vec![doc]).await.unwrap();
        self.store
            .append_messages_created(user_id, &[id.to_hex()])
            .await
            .unwrap();
        id
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

pub fn admin_request(
    method: Method,
    uri: &str,
    key: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).unwrap()
}
