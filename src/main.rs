use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tshirt_shop_api::config::{AppConfig, StoreBackend};
use tshirt_shop_api::database::{MemoryStore, PgStore, ProductStore};
use tshirt_shop_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "tshirt-shop-api", version, about = "Token-gated product catalogue API")]
struct Cli {
    /// Port to listen on (overrides PORT / SHOP_API_PORT)
    #[arg(long, short)]
    port: Option<u16>,

    /// Address to bind (overrides BIND_ADDRESS)
    #[arg(long)]
    bind: Option<String>,

    /// Document store backend: memory or postgres (overrides STORE_BACKEND)
    #[arg(long)]
    store: Option<StoreBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("invalid configuration")?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(backend) = cli.store {
        config.store.backend = backend;
        config = config.validated().context("invalid configuration")?;
    }
    tracing::info!("Starting T-Shirt Shop API in {:?} mode", config.environment);

    let mut pg_store = None;
    let store: Arc<dyn ProductStore> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; products are lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Postgres => {
            let pg = PgStore::connect(&config.store)
                .await
                .context("failed to connect to document store")?;
            pg_store = Some(pg.clone());
            Arc::new(pg)
        }
    };

    let state = AppState::from_config(&config, store);
    let router = app(state, &config);

    let bind_addr = format!("{}:{}", config.server.bind_address, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(pg) = pg_store {
        pg.close().await;
    }
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
