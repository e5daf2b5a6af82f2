//! WebSocket test client
//!
//! Thin wrapper over a tokio-tungstenite stream that speaks text frames and
//! applies a timeout to every receive.

use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// Default receive timeout
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A connected WebSocket client
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsClient {
    /// Connect to `url`
    pub async fn connect(url: &str) -> Result<Self> {
        let (stream, _response) = connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Send a text frame
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Receive the next text frame, failing after [`RECV_TIMEOUT`]
    pub async fn recv(&mut self) -> Result<String> {
        self.recv_timeout(RECV_TIMEOUT)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Timed out waiting for a message"))
    }

    /// Receive the next text frame, returning `None` if nothing arrives in time
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Result<Option<String>> {
        match tokio::time::timeout(timeout, self.next_text()).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }

    async fn next_text(&mut self) -> Result<String> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Ok(text),
                Some(Ok(Message::Binary(data))) => {
                    return Ok(String::from_utf8_lossy(&data).into_owned());
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => {}
                Some(Ok(Message::Close(_))) | None => {
                    anyhow::bail!("Connection closed by server");
                }
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
