use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use relay_core::messages::WorkerSubmission;
use tokio_util::sync::CancellationToken;

use crate::handlers::submissions::store_submission;
use crate::state::AppState;
use crate::ws::channel::WorkerChannel;

/// Consecutive sink failures after which the writer gives up on a worker.
const MAX_CONSECUTIVE_SEND_FAILURES: u32 = 3;

/// HTTP handler that upgrades the connection to a worker WebSocket.
///
/// After the upgrade the connection is registered with the
/// `WorkerRegistry` and served by a writer task, a delivery task and the
/// inbound loop on the current task.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single worker connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the connection with the `WorkerRegistry`.
///   2. Spawns a writer task that forwards registry messages to the sink.
///   3. Spawns the delivery loop that pushes queued work to the worker.
///   4. Processes inbound submissions on the current task.
///   5. Cleans up on disconnect once delivery has stopped.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    let connected_at = chrono::Utc::now();
    tracing::info!(conn_id = %conn_id, "Worker connected");

    let (outbound, mut rx) = state.workers.add(conn_id.clone()).await;

    let (mut sink, mut stream) = socket.split();

    // Writer task: forward channel messages to the WebSocket sink. Transient
    // failures are logged; repeated ones end the task, which closes the
    // channel and stops further deliveries.
    let writer_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        let mut failures = 0u32;
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            match sink.send(msg).await {
                Ok(()) => failures = 0,
                Err(e) => {
                    failures += 1;
                    tracing::warn!(
                        conn_id = %writer_conn_id,
                        error = %e,
                        failures,
                        "Send to worker failed",
                    );
                    if failures >= MAX_CONSECUTIVE_SEND_FAILURES {
                        break;
                    }
                }
            }
            if closing {
                break;
            }
        }
    });

    // Delivery task: push queued work to this worker.
    let cancel = CancellationToken::new();
    let channel = WorkerChannel::new(conn_id.clone(), outbound, Arc::clone(&state.store));
    let delivery_task = tokio::spawn(channel.run_delivery(
        Arc::clone(&state.workers),
        state.config.delivery_interval(),
        cancel.clone(),
    ));

    // Receiver loop: process inbound submissions.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Text(text)) => {
                handle_submission_frame(&state, &conn_id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "Worker receive error");
                break;
            }
        }
    }

    // Clean up: stop delivery, abort the writer, leave the registry. The
    // connection stays registered until its delivery loop has exited, so a
    // worker missing from the registry claims no further work.
    cancel.cancel();
    send_task.abort();
    if let Err(e) = delivery_task.await {
        tracing::error!(conn_id = %conn_id, error = %e, "Delivery task failed");
    }
    state.workers.remove(&conn_id).await;
    let connected_secs = (chrono::Utc::now() - connected_at).num_seconds();
    tracing::info!(conn_id = %conn_id, connected_secs, "Worker disconnected");
}

/// Store a result/error frame sent by the worker over the socket.
///
/// Malformed or invalid frames are logged and dropped.
async fn handle_submission_frame(state: &AppState, conn_id: &str, text: &str) {
    let submission = match serde_json::from_str::<WorkerSubmission>(text) {
        Ok(submission) => submission,
        Err(e) => {
            tracing::warn!(conn_id = %conn_id, error = %e, "Malformed worker submission dropped");
            return;
        }
    };

    if let Err(e) = store_submission(&state.store, submission).await {
        tracing::warn!(conn_id = %conn_id, error = %e, "Worker submission rejected");
    }
}
