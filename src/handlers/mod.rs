// handlers/mod.rs - HTTP handlers grouped by access level
//
// public/    - reachable without credentials (token issuance)
// protected/ - mounted behind the bearer token gate (product CRUD)
//
// The service descriptor and health probe below are public as well.

pub mod protected;
pub mod public;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::with_deadline;
use crate::middleware::response::Envelope;
use crate::state::AppState;

/// GET / - Service descriptor
pub async fn root() -> Json<Envelope<Value>> {
    let version = env!("CARGO_PKG_VERSION");

    Json(Envelope::Datos(json!({
        "name": "T-Shirt Shop API",
        "version": version,
        "description": "Token-gated product catalogue",
        "endpoints": {
            "token": "GET /v1/token (public)",
            "productos": "GET, POST /v1/productos (bearer token)",
            "producto": "GET, PUT, PATCH, DELETE /v1/productos/:id (bearer token)",
            "health": "GET /health (public)",
        }
    })))
}

/// GET /health - Liveness plus a store round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match with_deadline(state.store_timeout, state.store.ping()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(Envelope::Datos(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            }))),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Envelope::Error("store unavailable".to_string())),
            )
        }
    }
}
