// handlers/public/token.rs - GET /v1/token handler

use axum::extract::State;
use serde::Serialize;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TokenIssued {
    pub token: String,
}

/// GET /v1/token - Issue a short-lived bearer token
///
/// Response: `{"datos": {"token": "<jwt>"}}`
pub async fn get(State(state): State<AppState>) -> ApiResult<TokenIssued> {
    let token = state.tokens.issue().map_err(ApiError::from)?;

    tracing::info!("Issued access token valid for {} minutes", state.tokens.ttl().num_minutes());

    Ok(ApiResponse::success(TokenIssued { token }))
}
