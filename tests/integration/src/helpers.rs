//! Test helpers for integration tests
//!
//! Provides utilities for spawning test gateways and inspecting their state.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response};
use sockmux_common::AppConfig;
use sockmux_core::{Channel, ConnectionMultiplexer};
use sockmux_gateway::{create_app, create_gateway_state, GatewayState};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::client::WsClient;

/// Test gateway instance that manages lifecycle
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: Client,
    state: GatewayState,
    _handle: JoinHandle<()>,
}

impl TestGateway {
    /// Start a new test gateway with default configuration
    pub async fn start() -> Result<Self> {
        let config = test_config()?;
        Self::start_with_config(config).await
    }

    /// Start a test gateway with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        // Create gateway state
        let state = create_gateway_state(config);

        // Build application
        let app = create_app(state.clone());

        // Bind to an ephemeral port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Create HTTP client
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            state,
            _handle: handle,
        })
    }

    /// Get base URL for HTTP requests
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the WebSocket URL of the multiplex endpoint
    pub fn ws_url(&self) -> String {
        format!("ws://{}{}", self.addr, self.state.config().multiplex.path)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Open a WebSocket client on the multiplex endpoint
    pub async fn connect(&self) -> Result<WsClient> {
        WsClient::connect(&self.ws_url()).await
    }

    /// Get the multiplexer serving this gateway
    pub fn multiplexer(&self) -> &Arc<ConnectionMultiplexer> {
        self.state.multiplexer()
    }

    /// Look up a registered channel
    pub fn channel(&self, name: &str) -> Result<Arc<Channel>> {
        self.multiplexer()
            .channel(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Channel not registered: {}", name))
    }
}

/// Create a test configuration from built-in defaults
///
/// The process environment is not consulted so tests behave the same on
/// every machine.
pub fn test_config() -> Result<AppConfig> {
    let config =
        AppConfig::from_lookup(|_| None).map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

