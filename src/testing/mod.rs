use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::auth::TokenService;
use crate::database::{MemoryStore, ProductStore, StoreError};
use crate::models::{FieldMap, Product};
use crate::state::AppState;

pub const TEST_SECRET: &str = "test-signing-secret";

/// Memory store that counts every call made against it.
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProductStore for CountingStore {
    async fn insert(&self, product: &Product) -> Result<String, StoreError> {
        self.hit();
        self.inner.insert(product).await
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        self.hit();
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        self.hit();
        self.inner.find_by_id(id).await
    }

    async fn replace(&self, id: &str, product: &Product) -> Result<(), StoreError> {
        self.hit();
        self.inner.replace(id, product).await
    }

    async fn update_fields(&self, id: &str, fields: &FieldMap) -> Result<(), StoreError> {
        self.hit();
        self.inner.update_fields(id, fields).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.hit();
        self.inner.delete(id).await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.inner.ping().await
    }
}

/// Store whose every call fails, or hangs past any deadline when `hang` is set.
#[derive(Debug, Default)]
pub struct BrokenStore {
    pub hang: bool,
}

impl BrokenStore {
    async fn fail<T>(&self) -> Result<T, StoreError> {
        if self.hang {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Err(StoreError::Unavailable("connection refused (10.0.0.7:5432)".to_string()))
    }
}

#[async_trait]
impl ProductStore for BrokenStore {
    async fn insert(&self, _product: &Product) -> Result<String, StoreError> {
        self.fail().await
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        self.fail().await
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Product>, StoreError> {
        self.fail().await
    }

    async fn replace(&self, _id: &str, _product: &Product) -> Result<(), StoreError> {
        self.fail().await
    }

    async fn update_fields(&self, _id: &str, _fields: &FieldMap) -> Result<(), StoreError> {
        self.fail().await
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        self.fail().await
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.fail().await
    }
}

/// Router wired to an in-memory store plus helpers for driving it in-process.
pub struct TestContext {
    pub store: Arc<CountingStore>,
    pub tokens: Arc<TokenService>,
    router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(CountingStore::default());
        let state = AppState::new(
            TokenService::new(TEST_SECRET, chrono::Duration::minutes(15)),
            store.clone(),
            Duration::from_secs(5),
        );
        Self {
            store,
            tokens: state.tokens.clone(),
            router: crate::app::router(state),
        }
    }

    /// Router backed by an arbitrary store, for failure-path tests.
    pub fn router_with_store(store: Arc<dyn ProductStore>, timeout: Duration) -> (Router, String) {
        let state = AppState::new(
            TokenService::new(TEST_SECRET, chrono::Duration::minutes(15)),
            store,
            timeout,
        );
        let token = state.tokens.issue().expect("issue token");
        (crate::app::router(state), token)
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn token(&self) -> String {
        self.tokens.issue().expect("issue token")
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token())
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        send(&self.router, method, uri, authorization, body).await
    }

    pub async fn authed(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let bearer = self.bearer();
        self.send(method, uri, Some(&bearer), body).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    authorization: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn counting_store_counts_calls() {
        let ctx = TestContext::new();
        assert_eq!(ctx.store.calls(), 0);
        ctx.store.find_all().await.unwrap();
        assert_eq!(ctx.store.calls(), 1);
    }

    #[tokio::test]
    async fn broken_store_fails() {
        let store = BrokenStore::default();
        assert!(matches!(store.find_all().await, Err(StoreError::Unavailable(_))));
    }
}
