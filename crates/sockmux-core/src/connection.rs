//! Transport connection contract
//!
//! The multiplexer never creates or closes connections. The transport layer
//! implements [`Connection`] and hands each one to the multiplexer's handler.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Transport-level connection errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    /// The remote end closed the connection
    #[error("Connection closed")]
    Closed,

    /// Reading the next message failed
    #[error("Read failed: {0}")]
    Read(String),

    /// Writing a message failed
    #[error("Write failed: {0}")]
    Write(String),
}

/// A bidirectional, message-oriented client connection
///
/// Only one task ever calls [`Connection::read_message`] for a given
/// connection. [`Connection::write_message`] may be called from any number of
/// tasks concurrently.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Identity of this connection, unique among live connections
    fn id(&self) -> &str;

    /// Wait for the next inbound message
    ///
    /// Any error is terminal for the connection.
    async fn read_message(&self) -> Result<Vec<u8>, ConnectionError>;

    /// Send one message to the client
    async fn write_message(&self, message: &[u8]) -> Result<(), ConnectionError>;
}

/// Shared handle to a connection
pub type ConnectionRef = Arc<dyn Connection>;
