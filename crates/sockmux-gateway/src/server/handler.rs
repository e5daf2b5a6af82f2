//! WebSocket handler
//!
//! Upgrades the request and runs the multiplexer over the socket.

use crate::connection::WsConnection;
use crate::server::GatewayState;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt};
use sockmux_core::ConnectionRef;
use tokio::sync::mpsc;

/// WebSocket multiplex handler
pub async fn multiplex_handler(
    State(state): State<GatewayState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(state, socket))
}

/// Handle an upgraded WebSocket connection
async fn handle_socket(state: GatewayState, socket: WebSocket) {
    let connection_id = uuid::Uuid::new_v4().to_string();

    // Create message channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<Message>(state.config().multiplex.message_buffer);

    // Split the WebSocket
    let (mut ws_sink, ws_stream) = socket.split();

    let connection = WsConnection::new(connection_id.clone(), ws_stream, tx);

    tracing::info!(connection_id = %connection_id, "WebSocket connection established");

    // Clone for send task
    let connection_id_send = connection_id.clone();

    // Spawn task to send messages to WebSocket
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if ws_sink.send(msg).await.is_err() {
                tracing::warn!(
                    connection_id = %connection_id_send,
                    "Failed to send message to WebSocket"
                );
                break;
            }
        }

        // Close the WebSocket when channel is closed
        let _ = ws_sink.close().await;
    });

    let handler = state.handler();
    let conn: ConnectionRef = connection.clone();

    // Wait for either half to finish
    tokio::select! {
        () = handler(conn) => {
            tracing::debug!(connection_id = %connection_id, "Read loop ended");
        }
        _ = &mut send_task => {
            tracing::debug!(connection_id = %connection_id, "Send task ended");
        }
    }

    // Subscriber sets may still hold this connection; with the send task gone
    // their next write fails and the connection is pruned.
    send_task.abort();

    tracing::info!(
        connection_id = %connection_id,
        age_ms = connection.age().as_millis(),
        "WebSocket connection closed"
    );
}
