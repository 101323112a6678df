// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::auth::TokenError;
use crate::database::StoreError;
use crate::middleware::response::Envelope;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    MalformedBody(String),

    // 401 Unauthorized
    MissingCredential,
    InvalidCredential,

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingCredential | ApiError::InvalidCredential => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::MalformedBody(msg) => msg,
            ApiError::MissingCredential => "no token provided",
            ApiError::InvalidCredential => "invalid token",
            ApiError::NotFound(msg) => msg,
            ApiError::Internal(msg) => msg,
        }
    }

    pub fn malformed_body(message: impl Into<String>) -> Self {
        ApiError::MalformedBody(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Log the real error but return generic message
        match err {
            StoreError::Unavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                ApiError::internal("store unavailable")
            }
            StoreError::Timeout(deadline) => {
                tracing::error!("Store operation timed out after {:?}", deadline);
                ApiError::internal("store operation timed out")
            }
            StoreError::Decode(e) => {
                tracing::error!("Document serialization error: {}", e);
                ApiError::internal("error decoding products")
            }
            StoreError::OperationFailed(msg) => {
                tracing::error!("Store operation failed: {}", msg);
                ApiError::internal("store operation failed")
            }
            StoreError::Sqlx(e) => {
                tracing::error!("SQLx error: {}", e);
                ApiError::internal("store operation failed")
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(msg) => {
                tracing::error!("Token signing failed: {}", msg);
                ApiError::internal("error generating token")
            }
            TokenError::Invalid => ApiError::InvalidCredential,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let envelope: Envelope<()> = Envelope::Error(self.message().to_string());
        (self.status_code(), Json(envelope)).into_response()
    }
}
