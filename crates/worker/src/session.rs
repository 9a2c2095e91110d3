//! WebSocket connection and work loop.
//!
//! Connects to the relay's worker endpoint, runs the extractor for every
//! [`WorkFrame`] pushed down the socket, and reports each outcome over
//! HTTP through the [`Reporter`].

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use relay_core::extractor::ExternalExtractor;
use relay_core::messages::WorkFrame;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use crate::processor::process_frame;
use crate::reporter::Reporter;

/// Reconnection delay after a WebSocket failure.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Run the work loop indefinitely.
///
/// This function never returns under normal operation. It reconnects
/// with a fixed delay if the WebSocket connection drops.
pub async fn run(ws_url: &str, extractor: Arc<dyn ExternalExtractor>, reporter: Arc<Reporter>) {
    loop {
        tracing::info!(url = %ws_url, "Connecting to relay WebSocket");

        match connect_async(ws_url).await {
            Ok((ws_stream, _response)) => {
                tracing::info!("WebSocket connected");
                run_session(ws_stream, &extractor, &reporter).await;
                tracing::warn!("WebSocket session ended, reconnecting");
            }
            Err(e) => {
                tracing::error!(error = %e, "WebSocket connection failed");
            }
        }

        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

/// Drive a single WebSocket session until the relay goes away.
///
/// Each frame is handled on its own task so a slow extraction does not
/// hold up the socket (and its ping replies).
async fn run_session(
    mut ws_stream: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    extractor: &Arc<dyn ExternalExtractor>,
    reporter: &Arc<Reporter>,
) {
    while let Some(msg) = ws_stream.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<WorkFrame>(&text) {
                Ok(frame) => {
                    tracing::info!(key = %frame.key, "Work frame received");
                    let extractor = Arc::clone(extractor);
                    let reporter = Arc::clone(reporter);
                    tokio::spawn(async move {
                        handle_frame(extractor.as_ref(), &reporter, frame).await;
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, raw = %text, "Malformed work frame");
                }
            },
            Ok(Message::Ping(_) | Message::Pong(_)) => {
                // Handled automatically by tungstenite.
            }
            Ok(Message::Close(frame)) => {
                tracing::info!(?frame, "Relay closed WebSocket");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!(error = %e, "WebSocket receive error");
                break;
            }
        }
    }
}

/// Process one frame and report the outcome. Report failures are logged.
pub async fn handle_frame(extractor: &dyn ExternalExtractor, reporter: &Reporter, frame: WorkFrame) {
    let Some(submission) = process_frame(extractor, &frame).await else {
        return;
    };

    if let Err(e) = reporter.report(&submission).await {
        tracing::error!(key = %frame.key, error = %e, "Failed to report submission");
    }
}
