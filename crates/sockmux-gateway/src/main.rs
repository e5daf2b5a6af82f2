//! Multiplex Gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p sockmux-gateway
//! ```
//!
//! Configuration is loaded from environment variables.

use sockmux_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        address = %config.gateway.address(),
        path = %config.multiplex.path,
        "Configuration loaded"
    );

    // Run the gateway server
    if let Err(e) = sockmux_gateway::run(config).await {
        error!(error = %e, code = e.error_code(), "Gateway failed");
        std::process::exit(1);
    }
}
