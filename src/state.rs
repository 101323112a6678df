//! Shared application state handed to every handler and to the auth gate.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::database::ProductStore;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub store: Arc<dyn ProductStore>,
    /// Deadline applied to each store call made on behalf of a request.
    pub store_timeout: Duration,
}

impl AppState {
    pub fn new(tokens: TokenService, store: Arc<dyn ProductStore>, store_timeout: Duration) -> Self {
        Self {
            tokens: Arc::new(tokens),
            store,
            store_timeout,
        }
    }

    pub fn from_config(config: &AppConfig, store: Arc<dyn ProductStore>) -> Self {
        Self::new(
            TokenService::from_config(&config.security),
            store,
            config.store.operation_timeout(),
        )
    }
}
