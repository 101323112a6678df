use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool, Row};
use tracing::info;

use super::store::{ProductStore, StoreError};
use crate::config::StoreConfig;
use crate::models::{FieldMap, Product};

/// Name of the document table holding the product collection.
const COLLECTION: &str = "productos";

/// Product collection stored as JSONB documents in PostgreSQL.
///
/// Each row is `(id TEXT PRIMARY KEY, doc JSONB)`; `doc` carries the whole
/// product including its id so documents round-trip unchanged.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from config and make sure the collection table exists.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| StoreError::Unavailable("DATABASE_URL not configured".to_string()))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.operation_timeout_secs))
            .connect(url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let store = Self::new(pool);
        store.ensure_collection().await?;
        info!("Connected to document table: {}", COLLECTION);
        Ok(store)
    }

    pub async fn ensure_collection(&self) -> Result<(), StoreError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (id TEXT PRIMARY KEY, doc JSONB NOT NULL)",
            COLLECTION
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool for: {}", COLLECTION);
    }

    fn decode_row(row: &sqlx::postgres::PgRow) -> Result<Product, StoreError> {
        let Json(document): Json<FieldMap> = row.try_get("doc")?;
        Ok(Product::from_document(document)?)
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn insert(&self, product: &Product) -> Result<String, StoreError> {
        let sql = format!("INSERT INTO \"{}\" (id, doc) VALUES ($1, $2)", COLLECTION);
        sqlx::query(&sql)
            .bind(&product.id)
            .bind(Json(product.to_document()?))
            .execute(&self.pool)
            .await?;
        Ok(product.id.clone())
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let sql = format!("SELECT doc FROM \"{}\" ORDER BY id", COLLECTION);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(Self::decode_row).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT doc FROM \"{}\" WHERE id = $1", COLLECTION);
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::decode_row).transpose()
    }

    async fn replace(&self, id: &str, product: &Product) -> Result<(), StoreError> {
        let sql = format!("UPDATE \"{}\" SET doc = $2 WHERE id = $1", COLLECTION);
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(product.to_document()?))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_fields(&self, id: &str, fields: &FieldMap) -> Result<(), StoreError> {
        // `||` on jsonb objects is a shallow, top-level merge.
        let sql = format!("UPDATE \"{}\" SET doc = doc || $2 WHERE id = $1", COLLECTION);
        sqlx::query(&sql)
            .bind(id)
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let sql = format!("DELETE FROM \"{}\" WHERE id = $1", COLLECTION);
        sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
