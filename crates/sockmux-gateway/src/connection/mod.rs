//! Connection adapters
//!
//! Bridges WebSocket sockets to the multiplexer's connection contract.

mod ws_connection;

pub use ws_connection::WsConnection;
