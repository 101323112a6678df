use axum::extract::State;

use crate::database::with_deadline;
use crate::extractors::JsonBody;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Product;
use crate::state::AppState;

/// GET /v1/productos - List every product in the collection
pub async fn get(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = with_deadline(state.store_timeout, state.store.find_all()).await?;
    Ok(ApiResponse::success(products))
}

/// POST /v1/productos - Create a product; any client-supplied id is replaced
pub async fn post(
    State(state): State<AppState>,
    JsonBody(product): JsonBody<Product>,
) -> ApiResult<Product> {
    let product = product.with_new_id();

    with_deadline(state.store_timeout, state.store.insert(&product)).await?;

    tracing::info!("Created product {}", product.id);
    Ok(ApiResponse::created(product))
}
