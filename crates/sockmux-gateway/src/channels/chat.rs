//! Chat channel
//!
//! Greets subscribers, says goodbye on unsubscribe, and fans every payload out
//! to all subscribers.

use sockmux_core::Channel;
use std::sync::Arc;

/// Channel name
pub const CHAT_CHANNEL: &str = "chat";

/// Sent to a connection when it subscribes
pub const WELCOME: &str = "welcome";

/// Sent to a connection when it unsubscribes
pub const BYE: &str = "bye";

/// Create the chat channel
pub fn chat_channel() -> Arc<Channel> {
    Channel::with_callbacks(
        CHAT_CHANNEL,
        |channel, conn| async move {
            channel.send_to_client(&conn, WELCOME).await.ok();
        },
        |channel, conn| async move {
            channel.send_to_client(&conn, BYE).await.ok();
        },
        |channel, conn, message| async move {
            let sent = channel.broadcast(&message).await;

            tracing::trace!(
                connection_id = %conn.id(),
                sent = sent,
                "Chat message broadcast"
            );
        },
    )
}
