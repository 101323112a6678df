use axum::extract::{Path, State};

use crate::database::with_deadline;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::middleware::{ApiResponse, ApiResult, Message};
use crate::models::{product::sanitize_update, FieldMap, Product};
use crate::state::AppState;

/// GET /v1/productos/:id - Fetch a single product
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Product> {
    match with_deadline(state.store_timeout, state.store.find_by_id(&id)).await? {
        Some(product) => Ok(ApiResponse::success(product)),
        None => Err(ApiError::not_found("product not found")),
    }
}

/// PUT /v1/productos/:id - Replace every field of a product
///
/// The stored id always comes from the path. An id that matches nothing is
/// not reported: the store treats it as a no-op and the body is echoed back.
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(product): JsonBody<Product>,
) -> ApiResult<Product> {
    let product = product.with_id(id);

    with_deadline(state.store_timeout, state.store.replace(&product.id, &product)).await?;

    Ok(ApiResponse::success(product))
}

/// PATCH /v1/productos/:id - Set only the fields present in the body
///
/// `id` is never written. A body with nothing else left is acknowledged with
/// 200 without touching the store.
pub async fn patch(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(fields): JsonBody<FieldMap>,
) -> ApiResult<Message> {
    let fields = sanitize_update(fields);

    if !fields.is_empty() {
        with_deadline(state.store_timeout, state.store.update_fields(&id, &fields)).await?;
    }

    Ok(ApiResponse::message("product updated successfully"))
}

/// DELETE /v1/productos/:id - Remove a product
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Message> {
    with_deadline(state.store_timeout, state.store.delete(&id)).await?;

    tracing::info!("Deleted product {}", id);
    Ok(ApiResponse::message("product deleted successfully"))
}
