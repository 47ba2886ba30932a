use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::event::{PushEvent, StatusPayload, STATUS_EVENT};
use crate::ws::manager::WsManager;

/// GET /ws -- upgrade to the push channel.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.ws_manager))
}

/// Serve one observer until it disconnects.
///
/// The socket is split: a spawned task forwards registry messages to the
/// sink while this task drains inbound frames. Observers only listen, so
/// inbound text is limited to a `ping` keep-alive answered with `pong`.
async fn handle_socket(socket: WebSocket, ws_manager: Arc<WsManager>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let mut rx = ws_manager.add(conn_id.clone()).await;
    let observers = ws_manager.connection_count().await;
    tracing::info!(conn_id = %conn_id, observers, "Observer connected");

    match PushEvent::new(STATUS_EVENT, StatusPayload::connected()).to_message() {
        Ok(greeting) => {
            ws_manager.send_to(&conn_id, greeting).await;
        }
        Err(e) => tracing::error!(conn_id = %conn_id, error = %e, "Failed to encode status event"),
    }

    let (mut sink, mut stream) = socket.split();

    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) if text.as_str().trim() == "ping" => {
                ws_manager
                    .send_to(&conn_id, Message::Text("pong".into()))
                    .await;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    ws_manager.remove(&conn_id).await;
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "Observer disconnected");
}
