use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{FieldMap, Product};

/// Errors surfaced by a product store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Store operation failed: {0}")]
    OperationFailed(String),

    #[error("Document serialization error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Store operation exceeded {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Document-store contract for the single `productos` collection.
///
/// Write operations never report a missing target: replacing, patching or
/// deleting an id that matches nothing is a successful no-op.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Store a new document and return its identifier.
    async fn insert(&self, product: &Product) -> Result<String, StoreError>;

    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError>;

    /// Overwrite every field of the document stored under `id`.
    async fn replace(&self, id: &str, product: &Product) -> Result<(), StoreError>;

    /// Set only the listed top-level fields; everything else is left as is.
    async fn update_fields(&self, id: &str, fields: &FieldMap) -> Result<(), StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Run a store call under a deadline; running out of time is a store error.
pub async fn with_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(deadline, operation).await {
        Ok(result) => result,
        Err(_) => Err(StoreError::Timeout(deadline)),
    }
}
