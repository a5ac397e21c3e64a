//! SSE wire framing for streaming task updates.
//!
//! Emits raw `event: <type>\ndata: <json>\n\n` records — not a JSON-RPC
//! envelope per event, since the framing itself (the `event:` field) already
//! carries the discriminator a JSON-RPC `id`/`method` pair would otherwise
//! need to.
//!
//! Lifecycle: the client connects, the server subscribes it to the task's
//! event stream, the task's *current* status is replayed immediately so a
//! late subscriber isn't left waiting on the next change, then every
//! subsequent event is forwarded until a `done` event closes the stream.

use std::convert::Infallible;

use axum::response::sse::Event;
use futures::stream::Stream;
use tracing::debug;

use crate::server::subscriber_registry::Subscription;
use crate::types::{ArtifactPayload, DonePayload, ErrorPayload, StreamEvent, Task, TaskStatusPayload};

fn encode(event_type: &str, data: &impl serde::Serialize) -> Event {
    let json = serde_json::to_string(data).expect("StreamEvent payloads always serialize");
    Event::default().event(event_type).data(json)
}

fn encode_stream_event(event: &StreamEvent) -> Event {
    match event {
        StreamEvent::TaskStatus(payload) => encode("task-status", payload),
        StreamEvent::Artifact(payload) => encode("artifact", payload),
        StreamEvent::Error(payload) => encode("error", payload),
        StreamEvent::Done(payload) => encode("done", payload),
    }
}

/// Build the SSE byte stream for a task subscription, replaying the current
/// task snapshot as the first event before forwarding live updates.
pub fn stream_task_events(
    task: Task,
    mut subscription: Subscription,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let initial = StreamEvent::TaskStatus(TaskStatusPayload {
            task_id: task.id.clone(),
            status: task.status.clone(),
            r#final: task.status.state.is_terminal(),
        });
        yield Ok(encode_stream_event(&initial));

        if task.status.state.is_terminal() {
            yield Ok(encode_stream_event(&StreamEvent::Done(DonePayload { task })));
            return;
        }

        while let Some(event) = subscription.receiver.recv().await {
            let is_done = matches!(event, StreamEvent::Done(_));
            yield Ok(encode_stream_event(&event));
            if is_done {
                break;
            }
        }
        debug!(task_id = %task.id, "sse stream closed");
    }
}

/// Parse a raw SSE payload's `data:` body back into a [`StreamEvent`] given
/// its `event:` discriminator. Used by tests and by any in-process consumer
/// that wants to avoid a full HTTP round trip.
pub fn decode_stream_event(event_type: &str, data: &str) -> Result<StreamEvent, serde_json::Error> {
    Ok(match event_type {
        "task-status" => StreamEvent::TaskStatus(serde_json::from_str::<TaskStatusPayload>(data)?),
        "artifact" => StreamEvent::Artifact(serde_json::from_str::<ArtifactPayload>(data)?),
        "error" => StreamEvent::Error(serde_json::from_str::<ErrorPayload>(data)?),
        "done" => StreamEvent::Done(serde_json::from_str::<DonePayload>(data)?),
        other => {
            return Err(serde::de::Error::custom(format!("unknown SSE event type: {other}")));
        }
    })
}
