use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{ProductStore, StoreError};
use crate::models::{FieldMap, Product};

/// In-process document collection. Documents are kept as raw JSON objects so
/// partial updates behave like a schemaless store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<RwLock<HashMap<String, FieldMap>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn insert(&self, product: &Product) -> Result<String, StoreError> {
        let document = product.to_document()?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(&product.id) {
            return Err(StoreError::OperationFailed(format!("duplicate key: {}", product.id)));
        }
        documents.insert(product.id.clone(), document);
        Ok(product.id.clone())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let documents = self.documents.read().await;
        let mut products = documents
            .values()
            .cloned()
            .map(Product::from_document)
            .collect::<Result<Vec<_>, _>>()?;
        products.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(products)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let documents = self.documents.read().await;
        match documents.get(id) {
            Some(document) => Ok(Some(Product::from_document(document.clone())?)),
            None => Ok(None),
        }
    }

    async fn replace(&self, id: &str, product: &Product) -> Result<(), StoreError> {
        let document = product.to_document()?;
        let mut documents = self.documents.write().await;
        if let Some(existing) = documents.get_mut(id) {
            *existing = document;
        }
        Ok(())
    }

    async fn update_fields(&self, id: &str, fields: &FieldMap) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        if let Some(existing) = documents.get_mut(id) {
            for (key, value) in fields {
                existing.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.documents.write().await.remove(id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
