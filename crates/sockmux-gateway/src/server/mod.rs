//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::multiplex_handler;
pub use state::GatewayState;

use crate::channels::demo_multiplexer;
use axum::{routing::get, Router};
use sockmux_common::{AppConfig, AppError, HEALTH_PATH};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router(multiplex_path: &str) -> Router<GatewayState> {
    Router::new()
        .route(multiplex_path, get(multiplex_handler))
        .route(HEALTH_PATH, get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router(&state.config().multiplex.path)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Create `GatewayState` with the demo channels registered
pub fn create_gateway_state(config: AppConfig) -> GatewayState {
    let multiplexer = demo_multiplexer();

    tracing::info!(
        channels = ?multiplexer.channel_names(),
        "Channels registered"
    );

    GatewayState::new(multiplexer, config)
}

/// Serve the application on a bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    axum::serve(listener, app).await.map_err(AppError::server)
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();
    let path = config.multiplex.path.clone();

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::bind(&addr, e))?;

    tracing::info!("Gateway listening on ws://{}{}", addr, path);

    let app = create_app(create_gateway_state(config));
    serve(listener, app).await
}
