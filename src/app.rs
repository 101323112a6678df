use axum::{
    extract::DefaultBodyLimit, http::HeaderValue, middleware::from_fn_with_state, routing::get, Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::handlers;
use crate::middleware::token_auth_middleware;
use crate::state::AppState;

/// Assemble the full router. `/v1/token`, `/` and `/health` stay outside the
/// token gate; everything under `/v1/productos` goes through it.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = router(state).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(config));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

/// Routes and the auth gate, without the outer middleware stack.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .nest("/v1", token_routes().merge(product_routes(state.clone())))
        .with_state(state)
}

fn token_routes() -> Router<AppState> {
    use handlers::public;

    Router::new().route("/token", get(public::token_get))
}

fn product_routes(state: AppState) -> Router<AppState> {
    use handlers::protected as productos;

    Router::new()
        // Collection-level operations
        .route(
            "/productos",
            get(productos::collection_get).post(productos::collection_post),
        )
        // Record-level operations
        .route(
            "/productos/:id",
            get(productos::record_get)
                .put(productos::record_put)
                .patch(productos::record_patch)
                .delete(productos::record_delete),
        )
        .route_layer(from_fn_with_state(state, token_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.is_development() {
        return CorsLayer::permissive();
    }

    let origins = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
