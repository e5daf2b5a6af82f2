//! WebSocket connection
//!
//! Reads come straight from the socket stream. Writes are queued on a bounded
//! channel drained by the socket's send task and never wait: a full queue or
//! a finished send task fails the write.

use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitStream;
use futures_util::StreamExt;
use sockmux_core::{Connection, ConnectionError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};

/// A single WebSocket connection
pub struct WsConnection {
    /// Unique connection ID
    id: String,

    /// Inbound half of the socket
    stream: Mutex<SplitStream<WebSocket>>,

    /// Queue feeding the outbound half of the socket
    sender: mpsc::Sender<Message>,

    /// Connection creation time
    created_at: Instant,
}

impl WsConnection {
    /// Create a new connection
    pub fn new(
        id: String,
        stream: SplitStream<WebSocket>,
        sender: mpsc::Sender<Message>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id,
            stream: Mutex::new(stream),
            sender,
            created_at: Instant::now(),
        })
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

#[async_trait]
impl Connection for WsConnection {
    fn id(&self) -> &str {
        &self.id
    }

    async fn read_message(&self) -> Result<Vec<u8>, ConnectionError> {
        let mut stream = self.stream.lock().await;

        loop {
            match stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text.into_bytes()),
                Some(Ok(Message::Binary(data))) => return Ok(data),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    // Pong is handled automatically by axum
                }
                Some(Ok(Message::Close(_))) | None => return Err(ConnectionError::Closed),
                Some(Err(e)) => return Err(ConnectionError::Read(e.to_string())),
            }
        }
    }

    async fn write_message(&self, message: &[u8]) -> Result<(), ConnectionError> {
        enqueue(&self.sender, message)
    }
}

/// Queue a text frame without waiting for room
fn enqueue(sender: &mpsc::Sender<Message>, message: &[u8]) -> Result<(), ConnectionError> {
    let text = String::from_utf8_lossy(message).into_owned();

    sender.try_send(Message::Text(text)).map_err(|e| match e {
        TrySendError::Full(_) => ConnectionError::Write("outbound queue full".to_string()),
        TrySendError::Closed(_) => ConnectionError::Write("outbound queue closed".to_string()),
    })
}

impl std::fmt::Debug for WsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsConnection")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish()
    }
}
