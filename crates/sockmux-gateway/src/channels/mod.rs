//! Demo channels
//!
//! The channels the gateway binary serves out of the box.

mod chat;
mod echo;

pub use chat::{chat_channel, BYE, CHAT_CHANNEL, WELCOME};
pub use echo::{EchoHandler, ECHO_CHANNEL};

use sockmux_core::{Channel, ConnectionMultiplexer};

/// Build a multiplexer with the demo channels registered
///
/// Unframed text is logged and otherwise ignored.
pub fn demo_multiplexer() -> ConnectionMultiplexer {
    let mut multiplexer = ConnectionMultiplexer::new(|conn, text| {
        tracing::debug!(
            connection_id = %conn.id(),
            text = %text,
            "Ignoring unframed message"
        );
    });

    multiplexer.register_channel(Channel::new(ECHO_CHANNEL, EchoHandler));
    multiplexer.register_channel(chat_channel());

    multiplexer
}
