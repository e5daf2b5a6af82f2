//! Channel lifecycle callbacks

use super::Channel;
use crate::connection::ConnectionRef;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

/// Callbacks invoked by a [`Channel`]
///
/// All methods default to doing nothing.
#[async_trait]
pub trait ChannelHandler: Send + Sync + 'static {
    /// Called on every subscribe request, including repeated ones
    async fn on_connect(&self, channel: &Arc<Channel>, conn: &ConnectionRef) {
        let _ = (channel, conn);
    }

    /// Called on every unsubscribe request, whether or not the connection was subscribed
    async fn on_close(&self, channel: &Arc<Channel>, conn: &ConnectionRef) {
        let _ = (channel, conn);
    }

    /// Called for every data frame addressed to the channel
    async fn on_data(&self, channel: &Arc<Channel>, conn: &ConnectionRef, message: &str) {
        let _ = (channel, conn, message);
    }
}

type Hook = Box<dyn Fn(Arc<Channel>, ConnectionRef) -> BoxFuture<'static, ()> + Send + Sync>;
type DataHook =
    Box<dyn Fn(Arc<Channel>, ConnectionRef, String) -> BoxFuture<'static, ()> + Send + Sync>;

/// [`ChannelHandler`] assembled from closures
///
/// ```ignore
/// let handler = CallbackHandler::new()
///     .on_data(|channel, _conn, message| async move {
///         channel.broadcast(&message).await;
///     });
/// ```
#[derive(Default)]
pub struct CallbackHandler {
    on_connect: Option<Hook>,
    on_close: Option<Hook>,
    on_data: Option<DataHook>,
}

impl CallbackHandler {
    /// Create a handler with no callbacks
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subscribe callback
    #[must_use]
    pub fn on_connect<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Channel>, ConnectionRef) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_connect = Some(Box::new(
            move |channel: Arc<Channel>, conn: ConnectionRef| -> BoxFuture<'static, ()> {
                Box::pin(f(channel, conn))
            },
        ));
        self
    }

    /// Set the unsubscribe callback
    #[must_use]
    pub fn on_close<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Channel>, ConnectionRef) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_close = Some(Box::new(
            move |channel: Arc<Channel>, conn: ConnectionRef| -> BoxFuture<'static, ()> {
                Box::pin(f(channel, conn))
            },
        ));
        self
    }

    /// Set the data callback
    #[must_use]
    pub fn on_data<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Arc<Channel>, ConnectionRef, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_data = Some(Box::new(
            move |channel: Arc<Channel>, conn: ConnectionRef, message: String| -> BoxFuture<'static, ()> {
                Box::pin(f(channel, conn, message))
            },
        ));
        self
    }
}

#[async_trait]
impl ChannelHandler for CallbackHandler {
    async fn on_connect(&self, channel: &Arc<Channel>, conn: &ConnectionRef) {
        if let Some(hook) = &self.on_connect {
            hook(channel.clone(), conn.clone()).await;
        }
    }

    async fn on_close(&self, channel: &Arc<Channel>, conn: &ConnectionRef) {
        if let Some(hook) = &self.on_close {
            hook(channel.clone(), conn.clone()).await;
        }
    }

    async fn on_data(&self, channel: &Arc<Channel>, conn: &ConnectionRef, message: &str) {
        if let Some(hook) = &self.on_data {
            hook(channel.clone(), conn.clone(), message.to_string()).await;
        }
    }
}

impl std::fmt::Debug for CallbackHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackHandler")
            .field("on_connect", &self.on_connect.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_data", &self.on_data.is_some())
            .finish()
    }
}
