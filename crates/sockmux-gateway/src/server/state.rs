//! Gateway state
//!
//! Application state for the gateway server.

use sockmux_common::AppConfig;
use sockmux_core::{ConnectionHandler, ConnectionMultiplexer};
use std::sync::Arc;

/// Gateway application state
///
/// Holds all shared dependencies for the gateway server.
#[derive(Clone)]
pub struct GatewayState {
    /// Channel registry and read loop
    multiplexer: Arc<ConnectionMultiplexer>,
    /// Bound per-connection entry point of the multiplexer
    handler: ConnectionHandler,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    ///
    /// Channels must be registered on `multiplexer` before this call.
    pub fn new(multiplexer: ConnectionMultiplexer, config: AppConfig) -> Self {
        let multiplexer = Arc::new(multiplexer);
        let handler = multiplexer.handler();

        Self {
            multiplexer,
            handler,
            config: Arc::new(config),
        }
    }

    /// Get the multiplexer
    pub fn multiplexer(&self) -> &Arc<ConnectionMultiplexer> {
        &self.multiplexer
    }

    /// Get the per-connection handler
    pub fn handler(&self) -> ConnectionHandler {
        self.handler.clone()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("multiplexer", &self.multiplexer)
            .field("config", &"AppConfig")
            .finish()
    }
}
