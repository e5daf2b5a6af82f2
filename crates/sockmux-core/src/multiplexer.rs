//! Connection multiplexer
//!
//! Owns the channel registry and runs the per-connection read loop.
//!
//! Each decoded frame is dispatched on its own spawned task, so a slow
//! callback never delays reading the next frame. Frames from the same
//! connection are therefore not ordered: a `msg` sent right after a `sub` may
//! run before the subscription is applied.

use crate::channel::Channel;
use crate::connection::ConnectionRef;
use crate::protocol::{Frame, FrameKind, Inbound};
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::Arc;

/// Callback for inbound text that is not a frame
pub type Fallback = Arc<dyn Fn(&ConnectionRef, &str) + Send + Sync>;

/// Per-connection entry point handed to the transport layer
pub type ConnectionHandler = Arc<dyn Fn(ConnectionRef) -> BoxFuture<'static, ()> + Send + Sync>;

/// Routes frames from shared connections to named channels
///
/// Channels are registered through `&mut self` before the multiplexer is
/// shared, so the registry is immutable while connections are being served.
pub struct ConnectionMultiplexer {
    /// Registered channels by name
    channels: HashMap<String, Arc<Channel>>,

    /// Receives text that does not parse as a frame
    fallback: Fallback,
}

impl ConnectionMultiplexer {
    /// Create a multiplexer with no channels
    pub fn new<F>(fallback: F) -> Self
    where
        F: Fn(&ConnectionRef, &str) + Send + Sync + 'static,
    {
        Self {
            channels: HashMap::new(),
            fallback: Arc::new(fallback),
        }
    }

    /// Register a channel under its name
    ///
    /// A channel already registered under the same name is replaced and returned.
    pub fn register_channel(&mut self, channel: Arc<Channel>) -> Option<Arc<Channel>> {
        let name = channel.name().to_string();
        let replaced = self.channels.insert(name.clone(), channel);

        if replaced.is_some() {
            tracing::warn!(channel = %name, "Channel registration replaced an existing channel");
        } else {
            tracing::debug!(channel = %name, "Channel registered");
        }

        replaced
    }

    /// Get a registered channel
    pub fn channel(&self, name: &str) -> Option<&Arc<Channel>> {
        self.channels.get(name)
    }

    /// Get the names of all registered channels
    pub fn channel_names(&self) -> Vec<String> {
        self.channels.keys().cloned().collect()
    }

    /// Get the number of registered channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Invoke the fallback callback
    pub fn call_fallback(&self, conn: &ConnectionRef, text: &str) {
        (self.fallback)(conn, text);
    }

    /// Serve one connection until it closes
    ///
    /// Returns on the first read error. Channel memberships are left as they
    /// are; a later broadcast drops the connection once writes to it fail.
    pub async fn handle(&self, conn: ConnectionRef) {
        tracing::debug!(connection_id = %conn.id(), "Multiplexer loop started");

        loop {
            let raw = match conn.read_message().await {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn.id(),
                        error = %e,
                        "Multiplexer loop ended"
                    );
                    break;
                }
            };

            let text = String::from_utf8_lossy(&raw);
            match Inbound::decode(&text) {
                Inbound::Frame(frame) => self.dispatch(&conn, frame),
                Inbound::Unframed(text) => self.call_fallback(&conn, &text),
            }
        }
    }

    /// Spawn the channel operation for a frame
    fn dispatch(&self, conn: &ConnectionRef, frame: Frame) {
        if !frame.kind.is_known() {
            tracing::trace!(
                connection_id = %conn.id(),
                frame_type = %frame.kind,
                "Dropped frame with unknown type"
            );
            return;
        }

        let Some(channel) = self.channels.get(&frame.channel) else {
            tracing::trace!(
                connection_id = %conn.id(),
                channel = %frame.channel,
                "Dropped frame for unknown channel"
            );
            return;
        };

        tracing::trace!(connection_id = %conn.id(), frame = %frame, "Dispatching frame");

        let channel = channel.clone();
        let conn = conn.clone();

        tokio::spawn(async move {
            match frame.kind {
                FrameKind::Subscribe => channel.subscribe(&conn).await,
                FrameKind::Unsubscribe => channel.unsubscribe(&conn).await,
                FrameKind::Message => channel.receive(&conn, &frame.payload).await,
                FrameKind::Other(_) => {}
            }
        });
    }

    /// Get the bound per-connection handler for the transport layer
    pub fn handler(self: &Arc<Self>) -> ConnectionHandler {
        let multiplexer = self.clone();
        Arc::new(move |conn: ConnectionRef| -> BoxFuture<'static, ()> {
            let multiplexer = multiplexer.clone();
            Box::pin(async move { multiplexer.handle(conn).await })
        })
    }
}

impl Default for ConnectionMultiplexer {
    /// Multiplexer whose fallback logs unframed text
    fn default() -> Self {
        Self::new(|conn, text| {
            tracing::info!(connection_id = %conn.id(), text = %text, "Unframed message");
        })
    }
}

impl std::fmt::Debug for ConnectionMultiplexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionMultiplexer")
            .field("channels", &self.channels.len())
            .finish()
    }
}
