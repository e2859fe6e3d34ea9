//! Live-update WebSocket endpoint.
//!
//! Every connected peer is a live-update subscriber: it receives a copy of
//! each accepted write. The same channel also accepts inbound report
//! messages, which go through the exact validation path as HTTP upserts
//! and are then broadcast to all subscribers, including the sender.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures::{SinkExt, StreamExt};

use super::handlers::AppState;
use super::request::ReportMessage;
use crate::error::{Error, Result};

/// Handle GET /ws (upgrade).
pub async fn handle_ws(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (subscriber_id, mut updates) = state.broadcaster.subscribe();
    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            update = updates.recv() => {
                // The sender side lives in the broadcaster registry; a
                // closed channel means we were dropped as a subscriber.
                let Some(payload) = update else { break };
                if sink.send(Message::Text(payload)).await.is_err() {
                    tracing::debug!(subscriber = subscriber_id, "live send failed, closing");
                    break;
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if let Err(e) = handle_inbound(&state, &text).await {
                            tracing::warn!(
                                subscriber = subscriber_id,
                                error = %e,
                                "closing live channel after failed inbound report"
                            );
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    // Pings are answered by axum; other frames are ignored.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(subscriber = subscriber_id, error = %e, "live receive failed");
                        break;
                    }
                }
            }
        }
    }

    state.broadcaster.unsubscribe(subscriber_id);
}

/// Treats one inbound message exactly like an HTTP upsert: parse,
/// validate, insert, then fan out.
async fn handle_inbound(state: &AppState, text: &str) -> Result<()> {
    let message = ReportMessage::from_text(text)?;
    if message.id.is_empty() {
        return Err(Error::InvalidInput("empty unit id".to_string()));
    }

    state.repo.insert(&message.id, &message.report).await?;
    state.metrics.reports_written_total.inc();

    state.broadcaster.broadcast(&message.to_payload());
    state.metrics.broadcast_payloads_total.inc();
    Ok(())
}
