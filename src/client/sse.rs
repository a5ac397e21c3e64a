//! Server-Sent Events (SSE) stream handling for A2A streaming responses.
//!
//! Buffers raw bytes by blank-line record boundaries (`\n\n`), tracking the
//! `event:` field explicitly, and decodes each complete record into a
//! [`StreamEvent`] via [`crate::server::sse_streamer::decode_stream_event`] —
//! the mirror image of how the server frames them.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::Stream;
use tokio::sync::mpsc;

use crate::error::{A2AError, A2AResult};
use crate::server::sse_streamer::decode_stream_event;
use crate::types::StreamEvent;

/// A stream of A2A server-sent events.
///
/// Wraps a raw HTTP response and parses it into typed [`StreamEvent`]
/// values. Supports both pull-based (`next()`) and push-based (`Stream`
/// trait) consumption.
pub struct SseStream {
    receiver: mpsc::Receiver<A2AResult<StreamEvent>>,
    /// Background task handle — kept alive so the parsing task runs to completion.
    _task: tokio::task::JoinHandle<()>,
}

impl std::fmt::Debug for SseStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SseStream").finish_non_exhaustive()
    }
}

impl SseStream {
    /// Create an `SseStream` from a raw `reqwest::Response`.
    ///
    /// Spawns a background task that reads the response body, buffers it
    /// into complete SSE records, and sends decoded events through a
    /// channel.
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let (tx, rx) = mpsc::channel(64);

        let task = tokio::spawn(async move {
            if let Err(e) = parse_sse_stream(response, &tx).await {
                let _ = tx.send(Err(e)).await;
            }
        });

        Self {
            receiver: rx,
            _task: task,
        }
    }

    /// Get the next event from the stream.
    ///
    /// Returns `None` when the stream is exhausted. Returns `Some(Err(...))`
    /// on parse or transport errors.
    pub async fn next(&mut self) -> Option<A2AResult<StreamEvent>> {
        self.receiver.recv().await
    }

    /// Convert this stream into a `futures::Stream`.
    pub fn into_stream(self) -> SseStreamAdapter {
        SseStreamAdapter {
            receiver: self.receiver,
            _task: self._task,
        }
    }
}

/// Adapter that implements `futures::Stream` for an [`SseStream`].
pub struct SseStreamAdapter {
    receiver: mpsc::Receiver<A2AResult<StreamEvent>>,
    _task: tokio::task::JoinHandle<()>,
}

impl Stream for SseStreamAdapter {
    type Item = A2AResult<StreamEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// One `event:`/`data:` record accumulated across possibly-multiple lines.
#[derive(Default)]
struct PendingRecord {
    event_type: Option<String>,
    data_lines: Vec<String>,
}

impl PendingRecord {
    fn is_empty(&self) -> bool {
        self.event_type.is_none() && self.data_lines.is_empty()
    }

    fn take(&mut self) -> PendingRecord {
        std::mem::take(self)
    }
}

/// Parse an SSE response body, buffering complete records by blank-line
/// boundary and decoding each into a [`StreamEvent`].
async fn parse_sse_stream(response: reqwest::Response, tx: &mpsc::Sender<A2AResult<StreamEvent>>) -> A2AResult<()> {
    use futures::StreamExt;

    let mut stream = response.bytes_stream();
    let mut buffer = String::new();
    let mut record = PendingRecord::default();

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| A2AError::Transport(format!("error reading SSE stream: {e}")))?;

        let text =
            std::str::from_utf8(&chunk).map_err(|e| A2AError::Transport(format!("invalid UTF-8 in SSE stream: {e}")))?;

        buffer.push_str(text);

        while let Some(newline_pos) = buffer.find('\n') {
            let line = buffer[..newline_pos].trim_end_matches('\r').to_string();
            buffer = buffer[newline_pos + 1..].to_string();

            if line.is_empty() {
                // Blank line: record boundary.
                if !record.is_empty() {
                    if let Some(event) = decode_record(record.take())? {
                        if tx.send(Ok(event)).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                continue;
            }

            if line.starts_with(':') {
                continue;
            }

            if let Some(value) = line.strip_prefix("event:") {
                record.event_type = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("data:") {
                record.data_lines.push(value.trim().to_string());
            }
            // Other fields (id:, retry:) are ignored.
        }
    }

    if !record.is_empty() {
        if let Some(event) = decode_record(record)? {
            let _ = tx.send(Ok(event)).await;
        }
    }

    Ok(())
}

fn decode_record(record: PendingRecord) -> A2AResult<Option<StreamEvent>> {
    let event_type = match record.event_type {
        Some(t) => t,
        None => return Ok(None),
    };
    if record.data_lines.is_empty() {
        return Ok(None);
    }
    let data = record.data_lines.join("\n");

    decode_stream_event(&event_type, &data)
        .map(Some)
        .map_err(|e| A2AError::InvalidJson(format!("failed to decode SSE event '{event_type}': {e} (data: {data})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_record_rejects_missing_event_type() {
        let record = PendingRecord {
            event_type: None,
            data_lines: vec!["{}".to_string()],
        };
        assert!(decode_record(record).unwrap().is_none());
    }

    #[test]
    fn decode_record_rejects_empty_data() {
        let record = PendingRecord {
            event_type: Some("done".to_string()),
            data_lines: vec![],
        };
        assert!(decode_record(record).unwrap().is_none());
    }

    #[test]
    fn decode_record_rejects_unknown_event_type() {
        let record = PendingRecord {
            event_type: Some("mystery".to_string()),
            data_lines: vec!["{}".to_string()],
        };
        assert!(decode_record(record).is_err());
    }

    #[test]
    fn decode_record_parses_task_status() {
        let payload = serde_json::json!({
            "taskId": "t1",
            "status": {"state": "working"},
            "final": false
        });
        let record = PendingRecord {
            event_type: Some("task-status".to_string()),
            data_lines: vec![payload.to_string()],
        };
        let event = decode_record(record).unwrap().unwrap();
        assert!(matches!(event, StreamEvent::TaskStatus(_)));
    }
}
