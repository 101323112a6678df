use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Bearer token gate for protected routes.
///
/// Only answers "authenticated or not": nothing is added to the request
/// extensions, the request is forwarded untouched.
pub async fn token_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(&headers).ok_or(ApiError::MissingCredential)?;

    state.tokens.validate(token).map_err(|_| {
        tracing::debug!("{} {} rejected: invalid token", request.method(), request.uri().path());
        ApiError::InvalidCredential
    })?;

    Ok(next.run(request).await)
}

/// Trimmed `Authorization` value with one literal `"Bearer "` prefix removed.
/// A header without the prefix is passed through as the token itself.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .trim();

    if value.is_empty() {
        return None;
    }

    Some(value.strip_prefix(BEARER_PREFIX).unwrap_or(value))
}
