//! Named channel and its subscriber set

use super::{CallbackHandler, ChannelHandler};
use crate::connection::{ConnectionError, ConnectionRef};
use crate::protocol::encode_message;
use dashmap::DashMap;
use futures::future::join_all;
use std::future::Future;
use std::sync::Arc;

/// Subscriber set key: the address of the shared connection handle
///
/// Two handles are the same subscriber only if they point at the same
/// allocation. The set holds a clone of every handle it keys, so an address
/// cannot be reused while its entry exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct HandleKey(usize);

impl HandleKey {
    fn of(conn: &ConnectionRef) -> Self {
        Self(Arc::as_ptr(conn).cast::<()>() as usize)
    }
}

/// A named publish/subscribe topic
///
/// The subscriber set is keyed by handle identity, not by
/// [`Connection::id`](crate::Connection::id), and guarded by `DashMap`'s
/// shard locks. No lock is held while a callback runs or a write is pending.
pub struct Channel {
    /// Channel name, unique within a multiplexer
    name: String,

    /// Subscribed connections by handle
    subscribers: DashMap<HandleKey, ConnectionRef>,

    /// Lifecycle callbacks
    handler: Arc<dyn ChannelHandler>,
}

impl Channel {
    /// Create a channel with an empty subscriber set
    pub fn new(name: impl Into<String>, handler: impl ChannelHandler) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            subscribers: DashMap::new(),
            handler: Arc::new(handler),
        })
    }

    /// Create a channel from three callbacks
    pub fn with_callbacks<C, CF, X, XF, D, DF>(
        name: impl Into<String>,
        on_connect: C,
        on_close: X,
        on_data: D,
    ) -> Arc<Self>
    where
        C: Fn(Arc<Channel>, ConnectionRef) -> CF + Send + Sync + 'static,
        CF: Future<Output = ()> + Send + 'static,
        X: Fn(Arc<Channel>, ConnectionRef) -> XF + Send + Sync + 'static,
        XF: Future<Output = ()> + Send + 'static,
        D: Fn(Arc<Channel>, ConnectionRef, String) -> DF + Send + Sync + 'static,
        DF: Future<Output = ()> + Send + 'static,
    {
        let handler = CallbackHandler::new()
            .on_connect(on_connect)
            .on_close(on_close)
            .on_data(on_data);

        Self::new(name, handler)
    }

    /// Get the channel name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a connection to the subscriber set and run `on_connect`
    ///
    /// `on_connect` runs on every call, even if the connection was already subscribed.
    pub async fn subscribe(self: &Arc<Self>, conn: &ConnectionRef) {
        let added = self
            .subscribers
            .insert(HandleKey::of(conn), conn.clone())
            .is_none();

        tracing::trace!(
            channel = %self.name,
            connection_id = %conn.id(),
            added = added,
            "Connection subscribed"
        );

        self.handler.on_connect(self, conn).await;
    }

    /// Remove a connection from the subscriber set and run `on_close`
    ///
    /// `on_close` runs on every call, even if the connection was not subscribed.
    pub async fn unsubscribe(self: &Arc<Self>, conn: &ConnectionRef) {
        let removed = self.subscribers.remove(&HandleKey::of(conn)).is_some();

        tracing::trace!(
            channel = %self.name,
            connection_id = %conn.id(),
            removed = removed,
            "Connection unsubscribed"
        );

        self.handler.on_close(self, conn).await;
    }

    /// Run `on_data` for a payload received from `conn`
    pub async fn receive(self: &Arc<Self>, conn: &ConnectionRef, message: &str) {
        self.handler.on_data(self, conn, message).await;
    }

    /// Send a `msg` frame for this channel to one connection
    pub async fn send_to_client(
        &self,
        conn: &ConnectionRef,
        message: &str,
    ) -> Result<(), ConnectionError> {
        let frame = encode_message(&self.name, message);
        conn.write_message(frame.as_bytes()).await
    }

    /// Send a `msg` frame to every subscriber
    ///
    /// Writes run concurrently, so a subscriber whose write stalls does not
    /// hold up delivery to the others. Subscribers whose write fails are
    /// dropped from the set without running `on_close`. Returns the number of
    /// subscribers the frame was written to.
    pub async fn broadcast(&self, message: &str) -> usize {
        let frame = encode_message(&self.name, message);
        let subscribers = self.subscribers();

        let results = join_all(
            subscribers
                .iter()
                .map(|conn| conn.write_message(frame.as_bytes())),
        )
        .await;

        let mut sent = 0;
        for (conn, result) in subscribers.iter().zip(results) {
            match result {
                Ok(()) => sent += 1,
                Err(e) => {
                    self.subscribers.remove(&HandleKey::of(conn));

                    tracing::debug!(
                        channel = %self.name,
                        connection_id = %conn.id(),
                        error = %e,
                        "Dropped unreachable subscriber"
                    );
                }
            }
        }

        tracing::trace!(channel = %self.name, sent = sent, "Message broadcast to channel");

        sent
    }

    /// Get the number of subscribed connections
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Check if this exact connection handle is subscribed
    pub fn is_subscribed(&self, conn: &ConnectionRef) -> bool {
        self.subscribers.contains_key(&HandleKey::of(conn))
    }

    /// Snapshot of the subscribed connections
    pub fn subscribers(&self) -> Vec<ConnectionRef> {
        self.subscribers.iter().map(|r| r.value().clone()).collect()
    }
}

impl std::fmt::Debug for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.name)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
