//! WebSocket driver bridging warp sockets to the relay

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, warn};
use warp::ws::{Message, WebSocket};

use super::dispatch::Relay;

/// Drive one upgraded socket until it closes
pub async fn serve_socket(socket: WebSocket, relay: Relay) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, rx) = unbounded_channel::<String>();
    let mut outbound = UnboundedReceiverStream::new(rx);

    // Writer: drains the connection's queue so a slow socket never blocks a broadcaster
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound.next().await {
            if let Err(e) = ws_tx.send(Message::text(text)).await {
                debug!(error = %e, "socket send failed");
                break;
            }
        }
        if let Err(e) = ws_tx.close().await {
            debug!(error = %e, "socket close failed");
        }
    });

    let id = relay.connect(tx).await;

    while let Some(frame) = ws_rx.next().await {
        let message = match frame {
            Ok(message) => message,
            Err(e) => {
                warn!(conn_id = %id, error = %e, "socket error");
                break;
            }
        };
        if message.is_close() {
            break;
        }
        // Binary, ping and pong frames carry no envelopes
        if let Ok(text) = message.to_str() {
            relay.handle_text(id, text).await;
        }
    }

    // Removing the connection drops its sender, which ends the writer
    relay.disconnect(id).await;
    if let Err(e) = writer.await {
        debug!(conn_id = %id, error = %e, "socket writer task failed");
    }
}
