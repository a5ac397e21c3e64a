//! Per-task subscriber fan-out for SSE streaming.
//!
//! Each task may have zero or more active SSE subscribers. Unlike a
//! `tokio::sync::broadcast` channel — where a slow receiver's `Lagged` error
//! poisons every other receiver's stream — each subscriber here gets its own
//! bounded `mpsc` channel. A full channel only drops events for *that*
//! receiver; every other subscriber is unaffected.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use crate::config::SubscriberConfig;
use crate::types::StreamEvent;

struct Subscriber {
    id: u64,
    sender: mpsc::Sender<StreamEvent>,
}

/// A receiver handle returned from [`SubscriberRegistry::subscribe`]. Drop
/// it (or let it go out of scope) to unsubscribe.
pub struct Subscription {
    pub id: u64,
    pub receiver: mpsc::Receiver<StreamEvent>,
}

struct TaskChannels {
    subscribers: Vec<Subscriber>,
    next_id: u64,
    /// Guards against closing a task's channels more than once.
    closed: AtomicBool,
}

impl TaskChannels {
    fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 0,
            closed: AtomicBool::new(false),
        }
    }
}

/// Registry of per-task subscriber channels.
pub struct SubscriberRegistry {
    tasks: Mutex<HashMap<String, TaskChannels>>,
    config: SubscriberConfig,
}

impl SubscriberRegistry {
    /// Create a new empty registry with the given per-subscriber channel
    /// capacity.
    pub fn new(config: SubscriberConfig) -> Self {
        Self {
            tasks: Mutex::new(HashMap::new()),
            config,
        }
    }

    /// Subscribe to events for a task, creating its channel set if this is
    /// the first subscriber.
    pub async fn subscribe(&self, task_id: &str) -> Subscription {
        let mut tasks = self.tasks.lock().await;
        let entry = tasks.entry(task_id.to_string()).or_insert_with(TaskChannels::new);

        let id = entry.next_id;
        entry.next_id += 1;

        let (tx, rx) = mpsc::channel(self.config.channel_capacity);
        entry.subscribers.push(Subscriber { id, sender: tx });

        debug!(task_id, subscriber_id = id, "subscribed");
        Subscription { id, receiver: rx }
    }

    /// Remove a single subscriber from a task's channel set.
    pub async fn unsubscribe(&self, task_id: &str, subscriber_id: u64) {
        let mut tasks = self.tasks.lock().await;
        if let Some(entry) = tasks.get_mut(task_id) {
            entry.subscribers.retain(|s| s.id != subscriber_id);
            debug!(task_id, subscriber_id, "unsubscribed");
        }
    }

    /// Broadcast an event to every current subscriber of a task.
    ///
    /// Uses `try_send` — a subscriber whose channel is full has that single
    /// event dropped for them, without affecting any other subscriber.
    pub async fn broadcast(&self, task_id: &str, event: StreamEvent) {
        let mut tasks = self.tasks.lock().await;
        let Some(entry) = tasks.get_mut(task_id) else {
            return;
        };

        entry.subscribers.retain(|sub| {
            match sub.sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(task_id, subscriber_id = sub.id, "subscriber channel full, dropping event");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }

    /// Close every subscriber channel for a task, exactly once. Subsequent
    /// calls for the same task are no-ops. Called when a task reaches a
    /// terminal state.
    pub async fn close(&self, task_id: &str) {
        let mut tasks = self.tasks.lock().await;
        if let Some(entry) = tasks.get(task_id) {
            if entry.closed.swap(true, Ordering::SeqCst) {
                return;
            }
        }
        if let Some(entry) = tasks.remove(task_id) {
            debug!(task_id, subscriber_count = entry.subscribers.len(), "closed task subscriptions");
            // Dropping `entry.subscribers` drops every `Sender`, which closes
            // each subscriber's receiver.
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskStatus, TaskStatusPayload, TaskState};

    fn status_event(task_id: &str) -> StreamEvent {
        StreamEvent::TaskStatus(TaskStatusPayload {
            task_id: task_id.to_string(),
            status: TaskStatus::new(TaskState::Working),
            r#final: false,
        })
    }

    #[tokio::test]
    async fn subscribe_and_broadcast_delivers_event() {
        let registry = SubscriberRegistry::new(SubscriberConfig::default());
        let mut sub = registry.subscribe("t1").await;
        registry.broadcast("t1", status_event("t1")).await;
        let event = sub.receiver.recv().await.unwrap();
        matches!(event, StreamEvent::TaskStatus(_));
    }

    #[tokio::test]
    async fn broadcast_to_unknown_task_is_noop() {
        let registry = SubscriberRegistry::new(SubscriberConfig::default());
        registry.broadcast("unknown", status_event("unknown")).await;
    }

    #[tokio::test]
    async fn full_channel_drops_event_for_that_subscriber_only() {
        let config = SubscriberConfig::default().with_channel_capacity(1);
        let registry = SubscriberRegistry::new(config);
        let mut slow = registry.subscribe("t1").await;
        let mut fast = registry.subscribe("t1").await;

        // Fill slow's buffer without draining it.
        registry.broadcast("t1", status_event("t1")).await;
        registry.broadcast("t1", status_event("t1")).await;

        // fast's channel also has capacity 1, so it too only holds the
        // first event; but critically, fast is not "poisoned" the way a
        // broadcast::Lagged receiver would be — it can keep receiving.
        let first = fast.receiver.recv().await.unwrap();
        matches!(first, StreamEvent::TaskStatus(_));

        registry.broadcast("t1", status_event("t1")).await;
        let second = fast.receiver.recv().await.unwrap();
        matches!(second, StreamEvent::TaskStatus(_));

        drop(slow);
    }

    #[tokio::test]
    async fn close_is_idempotent_and_closes_receivers() {
        let registry = SubscriberRegistry::new(SubscriberConfig::default());
        let mut sub = registry.subscribe("t1").await;
        registry.close("t1").await;
        registry.close("t1").await; // second call is a no-op, not a panic

        assert!(sub.receiver.recv().await.is_none());
    }

    #[tokio::test]
    async fn unsubscribe_stops_delivery_to_that_subscriber() {
        let registry = SubscriberRegistry::new(SubscriberConfig::default());
        let sub = registry.subscribe("t1").await;
        registry.unsubscribe("t1", sub.id).await;
        drop(sub);
        // Broadcasting after the only subscriber left should not panic and
        // cleans up the closed sender on next broadcast.
        registry.broadcast("t1", status_event("t1")).await;
    }
}
