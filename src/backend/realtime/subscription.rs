/**
 * Real-time Subscription Handler
 *
 * This module implements the Server-Sent Events (SSE) handler for the
 * `/realtime` endpoint. Each connection subscribes to the feed broadcast and
 * receives every event as
 *
 * ```text
 * event: <newPost | postLiked | newComment>
 * data: <JSON payload>
 * ```
 *
 * # Connection Management
 *
 * - No authentication; the listing endpoint is public too
 * - Connections are kept alive using SSE keep-alive comments
 * - Lagged receivers log and skip ahead; the connection stays open
 */

use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream;
use tokio::sync::broadcast::error::RecvError;
use tokio_stream::Stream;

use crate::backend::realtime::broadcast::FeedEventBroadcast;

/// Handle real-time subscription (GET /realtime)
///
/// # Example Response
///
/// ```http
/// HTTP/1.1 200 OK
/// Content-Type: text/event-stream
/// Cache-Control: no-cache
///
/// event: newPost
/// data: {"_id":"...","content":"hello","image":"","author":{...},"likes":[],"comments":[],"createdAt":"..."}
/// ```
pub async fn handle_realtime_subscription(
    State(broadcast_tx): State<FeedEventBroadcast>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let broadcast_rx = broadcast_tx.subscribe();
    tracing::info!(
        "[Realtime] Subscriber connected ({} total)",
        broadcast_tx.receiver_count()
    );

    // Only real events are yielded; keep-alive comments fill the gaps.
    let stream = stream::unfold(broadcast_rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let data = match event.payload_json() {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize {}: {}", event.name(), e);
                            continue;
                        }
                    };

                    let sse_event = Event::default().event(event.name()).data(data);
                    return Some((Ok(sse_event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::warn!("[Realtime] Broadcast channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
