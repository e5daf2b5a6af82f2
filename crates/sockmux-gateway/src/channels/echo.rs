//! Echo channel

use async_trait::async_trait;
use sockmux_core::{Channel, ChannelHandler, ConnectionRef};
use std::sync::Arc;

/// Channel name
pub const ECHO_CHANNEL: &str = "echo";

/// Sends every payload back to the connection it came from
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

#[async_trait]
impl ChannelHandler for EchoHandler {
    async fn on_data(&self, channel: &Arc<Channel>, conn: &ConnectionRef, message: &str) {
        if let Err(e) = channel.send_to_client(conn, message).await {
            tracing::debug!(
                connection_id = %conn.id(),
                error = %e,
                "Failed to echo message"
            );
        }
    }
}
