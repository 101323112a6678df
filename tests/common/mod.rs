#![allow(dead_code)]

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::Value;

use tshirt_shop_api::config::AppConfig;
use tshirt_shop_api::database::MemoryStore;
use tshirt_shop_api::{app, AppState};

pub const SECRET: &str = "integration-test-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    /// Serve the app on its own runtime thread so it outlives any single test's runtime.
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let listener = std::net::TcpListener::bind(("127.0.0.1", port)).context("failed to bind test port")?;
        listener.set_nonblocking(true)?;

        let mut config = AppConfig::development();
        config.security.jwt_secret = SECRET.to_string();
        config.api.enable_request_logging = false;
        let config = config.validated()?;

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("test server runtime");
            runtime.block_on(async move {
                let state = AppState::from_config(&config, Arc::new(MemoryStore::new()));
                let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app(state, &config)).await.expect("test server");
            });
        });

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Fetch a fresh token from the public token route.
pub async fn fetch_token(server: &TestServer) -> Result<String> {
    let body: Value = reqwest::get(server.url("/v1/token")).await?.json().await?;
    body["datos"]["token"]
        .as_str()
        .map(str::to_string)
        .context("token missing from response")
}

/// Client that sends `Authorization: Bearer <token>` on every request.
pub async fn authed_client(server: &TestServer) -> Result<reqwest::Client> {
    let token = fetch_token(server).await?;
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::AUTHORIZATION,
        format!("Bearer {}", token).parse()?,
    );
    Ok(reqwest::Client::builder().default_headers(headers).build()?)
}
