/**
 * Feed Event Subscription
 *
 * Connects to `GET /realtime`, parses the Server-Sent Events stream and
 * forwards decoded [`FeedEvent`]s over a channel. The reader runs as a
 * background task that is aborted when the subscription is dropped.
 *
 * There is no reconnect: a closed stream ends the subscription, and the
 * owner decides whether to mount again.
 */

use futures_util::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::api::check;
use crate::client::error::ClientError;
use crate::shared::FeedEvent;

/// Events buffered between the reader task and the consumer
const EVENT_BUFFER: usize = 256;

/// One dispatched SSE event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// `event:` field, `message` when absent
    pub event: String,
    /// `data:` lines joined with `\n`
    pub data: String,
}

/// Incremental Server-Sent Events parser
///
/// Accepts arbitrary byte chunks; a line split across chunks (even inside a
/// multi-byte character) is completed by the next push.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
    event: Option<String>,
    data: Vec<String>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and collect every event it completes
    pub fn push(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.extend_from_slice(chunk);
        let mut frames = Vec::new();

        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let raw: Vec<u8> = self.buffer.drain(..=newline).collect();
            let text = String::from_utf8_lossy(&raw[..raw.len() - 1]);
            let line = text.strip_suffix('\r').unwrap_or(&*text);

            if line.is_empty() {
                if let Some(frame) = self.dispatch() {
                    frames.push(frame);
                }
                continue;
            }
            if line.starts_with(':') {
                continue;
            }

            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };

            match field {
                "event" => self.event = Some(value.to_string()),
                "data" => self.data.push(value.to_string()),
                _ => {}
            }
        }

        frames
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseFrame {
            event: event.unwrap_or_else(|| "message".to_string()),
            data,
        })
    }
}

/// Live connection to the broadcast channel
#[derive(Debug)]
pub struct FeedSubscription {
    events: mpsc::Receiver<FeedEvent>,
    reader: JoinHandle<()>,
}

impl FeedSubscription {
    /// Open the event stream
    ///
    /// # Errors
    ///
    /// Fails when the request cannot be sent or the server answers with a
    /// non-success status.
    pub async fn connect(client: &Client, url: &str) -> Result<Self, ClientError> {
        tracing::info!("[Realtime] Subscribing to {}", url);
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await?;
        let response = check(response).await?;

        let (tx, events) = mpsc::channel(EVENT_BUFFER);
        let reader = tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut parser = SseParser::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!("[Realtime] Event stream failed: {}", e);
                        return;
                    }
                };

                for frame in parser.push(&chunk) {
                    match FeedEvent::from_parts(&frame.event, &frame.data) {
                        Ok(event) => {
                            if tx.send(event).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("[Realtime] Skipping {} event: {}", frame.event, e);
                        }
                    }
                }
            }

            tracing::info!("[Realtime] Event stream closed by server");
        });

        Ok(Self { events, reader })
    }

    /// Wait for the next event; `None` once the stream has ended
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        self.events.recv().await
    }

    /// Take an already received event without waiting
    pub fn try_recv(&mut self) -> Option<FeedEvent> {
        self.events.try_recv().ok()
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_named_event() {
        let mut parser = SseParser::new();
        let frames = parser.push(b"event: postLiked\ndata: {\"postId\":\"p1\",\"likes\":[]}\n\n");

        assert_eq!(
            frames,
            vec![SseFrame {
                event: "postLiked".to_string(),
                data: r#"{"postId":"p1","likes":[]}"#.to_string(),
            }]
        );
    }

    #[test]
    fn test_keep_alive_comments_are_skipped() {
        let mut parser = SseParser::new();
        assert!(parser.push(b":\n\n: keep-alive\n\n").is_empty());
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.push(b"event: newCom").is_empty());
        assert!(parser.push(b"ment\r\ndata: a\r\n").is_empty());
        let frames = parser.push(b"data: b\r\n\r\n");

        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "newComment");
        assert_eq!(frames[0].data, "a\nb");
    }

    #[test]
    fn test_multibyte_character_split() {
        let mut parser = SseParser::new();
        let bytes = "data: caf\u{e9}\n\n".as_bytes();
        let (head, tail) = bytes.split_at(10);

        assert!(parser.push(head).is_empty());
        let frames = parser.push(tail);

        assert_eq!(frames[0].data, "caf\u{e9}");
        assert_eq!(frames[0].event, "message");
    }
}
