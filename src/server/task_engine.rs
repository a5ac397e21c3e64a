//! The task engine: owns task creation, update application, cancellation,
//! and subscriber fan-out.
//!
//! Generalizes the teacher's `TaskManager`/`TaskUpdater` pair into a single
//! entry point built around [`crate::types::TaskUpdate`] — the one shape a
//! [`crate::server::TaskHandler`] emits, whether driving a single `tasks/send`
//! call or a `tasks/sendSubscribe` stream.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{A2AError, A2AResult};
use crate::server::subscriber_registry::{SubscriberRegistry, Subscription};
use crate::server::task_store::TaskStore;
use crate::types::{
    Artifact, ArtifactPayload, DonePayload, ErrorPayload, Message, PushEventKind, StreamEvent, Task, TaskState,
    TaskStatus, TaskStatusPayload, TaskUpdate,
};

/// Receives task lifecycle events for delivery as push notifications.
/// Implemented by [`crate::server::push::PushService`]; kept as a trait here
/// so the engine does not depend on the push module's internals.
#[async_trait]
pub trait PushNotifier: Send + Sync {
    /// Called after a task update has been durably applied.
    async fn notify(&self, task: &Task, event: PushEventKind, status: Option<&TaskStatus>, artifact: Option<&Artifact>);
}

/// Owns task creation, update application, cancellation, and the subscriber
/// fan-out for streaming clients.
pub struct TaskEngine {
    store: Arc<dyn TaskStore>,
    subscribers: Arc<SubscriberRegistry>,
    /// Per-task writer lock: enforces at most one active handler execution
    /// per task at a time. Lazily populated; an entry is removed once its
    /// task reaches a terminal state.
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    push: Option<Arc<dyn PushNotifier>>,
}

impl TaskEngine {
    /// Construct a new engine over the given task store and subscriber
    /// registry, with no push notifier wired in.
    pub fn new(store: Arc<dyn TaskStore>, subscribers: Arc<SubscriberRegistry>) -> Self {
        Self {
            store,
            subscribers,
            locks: Mutex::new(HashMap::new()),
            push: None,
        }
    }

    /// Wire in a push notifier, consulted after every applied update.
    pub fn with_push_notifier(mut self, push: Arc<dyn PushNotifier>) -> Self {
        self.push = Some(push);
        self
    }

    /// Generate a fresh, server-assigned task ID.
    pub fn generate_task_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Fetch an existing task by ID, or create a fresh one in the
    /// `submitted` state if `task_id` is absent or not found.
    pub async fn create_or_get_task(
        &self,
        task_id: Option<String>,
        session_id: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> A2AResult<Task> {
        if let Some(id) = &task_id {
            if let Some(existing) = self.store.get(id).await? {
                return Ok(existing);
            }
        }
        let id = task_id.unwrap_or_else(Self::generate_task_id);
        let task = Task::new(id, session_id, metadata);
        self.store.save(task.clone()).await?;
        debug!(task_id = %task.id, "created task");
        Ok(task)
    }

    /// Fetch a task by ID.
    pub async fn get_task(&self, task_id: &str) -> A2AResult<Task> {
        self.store
            .get(task_id)
            .await?
            .ok_or_else(|| A2AError::task_not_found(task_id))
    }

    /// Append an inbound user message to a task's history, move it to
    /// `working`, and persist it.
    pub async fn append_inbound_message(&self, task_id: &str, message: Message) -> A2AResult<Task> {
        let mut task = self.get_task(task_id).await?;
        task.history.push(message);
        task.status.state = TaskState::Working;
        task.updated_at = chrono::Utc::now();
        self.store.save(task.clone()).await?;
        Ok(task)
    }

    /// Acquire the per-task writer lock, blocking until any other in-flight
    /// execution for this task completes. Returns a guard that releases the
    /// lock on drop.
    pub async fn acquire_writer_lock(&self, task_id: &str) -> tokio::sync::OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(task_id.to_string()).or_insert_with(|| Arc::new(Mutex::new(()))))
        };
        lock.lock_owned().await
    }

    async fn release_lock_if_terminal(&self, task_id: &str, state: TaskState) {
        if state.is_terminal() {
            let mut locks = self.locks.lock().await;
            locks.remove(task_id);
        }
    }

    /// Apply a [`TaskUpdate`] to a task: validate and set status, append a
    /// message, merge/append an artifact, merge metadata keys. Persists the
    /// result, broadcasts the corresponding [`StreamEvent`]s to subscribers,
    /// and notifies the push subsystem.
    ///
    /// Returns an error if the task is already terminal, or if the update's
    /// status is not a valid transition from the task's current state.
    pub async fn apply_update(&self, task_id: &str, update: TaskUpdate) -> A2AResult<Task> {
        let mut task = self.get_task(task_id).await?;

        if task.status.state.is_terminal() {
            return Err(A2AError::unsupported_operation(format!(
                "task {task_id} is already in a terminal state and cannot be updated"
            )));
        }

        if let Some(message) = update.message.clone() {
            task.history.push(message);
        }

        let mut applied_artifact: Option<Artifact> = None;
        if let Some(mut artifact) = update.artifact {
            if artifact.append {
                if let Some(last) = task.artifacts.last_mut() {
                    last.parts.append(&mut artifact.parts);
                    last.last_chunk = artifact.last_chunk;
                    if artifact.name.is_some() {
                        last.name = artifact.name.clone();
                    }
                    applied_artifact = Some(last.clone());
                } else {
                    artifact.index = 0;
                    artifact.append = false;
                    task.artifacts.push(artifact.clone());
                    applied_artifact = Some(artifact);
                }
            } else {
                artifact.index = task.artifacts.len();
                task.artifacts.push(artifact.clone());
                applied_artifact = Some(artifact);
            }
        }

        if let Some(meta) = update.metadata {
            let map = task
                .metadata
                .get_or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if let serde_json::Value::Object(existing) = map {
                for (k, v) in meta {
                    existing.insert(k, v);
                }
            }
        }

        let mut applied_status: Option<TaskStatus> = None;
        if let Some(new_status) = update.status {
            if !task.status.state.can_transition_to(new_status.state) {
                return Err(A2AError::unsupported_operation(format!(
                    "invalid task state transition {} -> {}",
                    task.status.state, new_status.state
                )));
            }
            task.status = new_status.clone();
            applied_status = Some(new_status);
        } else if update.r#final {
            return Err(A2AError::internal_error(
                "a final update must set a terminal status",
            ));
        }

        task.updated_at = chrono::Utc::now();
        self.store.save(task.clone()).await?;

        if let Some(status) = &applied_status {
            self.subscribers
                .broadcast(
                    task_id,
                    StreamEvent::TaskStatus(TaskStatusPayload {
                        task_id: task_id.to_string(),
                        status: status.clone(),
                        r#final: update.r#final,
                    }),
                )
                .await;
            if let Some(push) = &self.push {
                push.notify(&task, PushEventKind::TaskStatus, Some(status), None).await;
            }
        }

        if let Some(artifact) = &applied_artifact {
            self.subscribers
                .broadcast(
                    task_id,
                    StreamEvent::Artifact(ArtifactPayload {
                        task_id: task_id.to_string(),
                        artifact: artifact.clone(),
                    }),
                )
                .await;
            if let Some(push) = &self.push {
                push.notify(&task, PushEventKind::Artifact, None, Some(artifact)).await;
            }
        }

        if update.r#final {
            self.subscribers
                .broadcast(task_id, StreamEvent::Done(DonePayload { task: task.clone() }))
                .await;
            self.subscribers.close(task_id).await;
            self.release_lock_if_terminal(task_id, task.status.state).await;
        }

        Ok(task)
    }

    /// Surface a handler-side error to any active subscribers as an
    /// `error` event, then a `done` event carrying the task failed.
    pub async fn fail_task(&self, task_id: &str, message: impl Into<String>) -> A2AResult<Task> {
        let reason = message.into();
        self.subscribers
            .broadcast(
                task_id,
                StreamEvent::Error(ErrorPayload {
                    task_id: task_id.to_string(),
                    message: reason.clone(),
                }),
            )
            .await;

        let update = TaskUpdate::status_final(TaskStatus::with_message(
            TaskState::Failed,
            Message::agent_text(reason),
        ));
        self.apply_update(task_id, update).await
    }

    /// Cancel a task. Fails with `TaskNotCancelable` if the task is already
    /// in a terminal state.
    pub async fn cancel(&self, task_id: &str) -> A2AResult<Task> {
        let task = self.get_task(task_id).await?;
        if task.status.state.is_terminal() {
            return Err(A2AError::task_not_cancelable(format!(
                "task {task_id} is already {}",
                task.status.state
            )));
        }
        self.apply_update(task_id, TaskUpdate::status_final(TaskStatus::new(TaskState::Canceled)))
            .await
    }

    /// Subscribe to a task's event stream.
    pub async fn subscribe(&self, task_id: &str) -> Subscription {
        self.subscribers.subscribe(task_id).await
    }

    /// Unsubscribe a previously-obtained subscription.
    pub async fn unsubscribe(&self, task_id: &str, subscriber_id: u64) {
        self.subscribers.unsubscribe(task_id, subscriber_id).await;
    }

    /// List tasks via the underlying store.
    pub async fn list(
        &self,
        params: &crate::server::task_store::TaskListParams,
    ) -> A2AResult<crate::types::ListTasksResult> {
        self.store.list(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubscriberConfig;
    use crate::server::task_store::InMemoryTaskStore;
    use crate::types::Part;

    fn engine() -> TaskEngine {
        let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let subs = Arc::new(SubscriberRegistry::new(SubscriberConfig::default()));
        TaskEngine::new(store, subs)
    }

    #[tokio::test]
    async fn create_or_get_creates_fresh_task_when_absent() {
        let engine = engine();
        let task = engine.create_or_get_task(None, None, None).await.unwrap();
        assert_eq!(task.status.state, TaskState::Submitted);
    }

    #[tokio::test]
    async fn create_or_get_returns_existing_task() {
        let engine = engine();
        let first = engine.create_or_get_task(None, None, None).await.unwrap();
        let second = engine.create_or_get_task(Some(first.id.clone()), None, None).await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn apply_update_rejects_invalid_transition() {
        let engine = engine();
        let task = engine.create_or_get_task(None, None, None).await.unwrap();
        // submitted -> completed is not a valid edge.
        let result = engine
            .apply_update(&task.id, TaskUpdate::status(TaskStatus::new(TaskState::Completed)))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn apply_update_rejects_updates_after_terminal() {
        let engine = engine();
        let task = engine.create_or_get_task(None, None, None).await.unwrap();
        engine
            .apply_update(&task.id, TaskUpdate::status_final(TaskStatus::new(TaskState::Canceled)))
            .await
            .unwrap();

        let result = engine
            .apply_update(&task.id, TaskUpdate::status(TaskStatus::new(TaskState::Working)))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn artifact_append_concatenates_onto_last_artifact_by_position() {
        let engine = engine();
        let task = engine.create_or_get_task(None, None, None).await.unwrap();
        engine
            .apply_update(&task.id, TaskUpdate::status(TaskStatus::new(TaskState::Working)))
            .await
            .unwrap();

        let first = Artifact {
            name: Some("out".to_string()),
            description: None,
            parts: vec![Part::Text { text: "Hello".to_string(), metadata: None }],
            index: 0,
            append: false,
            last_chunk: false,
            metadata: None,
        };
        engine.apply_update(&task.id, TaskUpdate::artifact(first)).await.unwrap();

        let chunk = Artifact {
            name: None,
            description: None,
            parts: vec![Part::Text { text: " world".to_string(), metadata: None }],
            index: 0,
            append: true,
            last_chunk: true,
            metadata: None,
        };
        let updated = engine.apply_update(&task.id, TaskUpdate::artifact(chunk)).await.unwrap();

        assert_eq!(updated.artifacts.len(), 1);
        assert_eq!(updated.artifacts[0].index, 0);
        assert_eq!(updated.artifacts[0].parts.len(), 2);
        assert!(updated.artifacts[0].last_chunk);
    }

    #[tokio::test]
    async fn artifact_indices_stay_dense() {
        let engine = engine();
        let task = engine.create_or_get_task(None, None, None).await.unwrap();
        engine
            .apply_update(&task.id, TaskUpdate::status(TaskStatus::new(TaskState::Working)))
            .await
            .unwrap();

        for i in 0..3 {
            let artifact = Artifact {
                name: None,
                description: None,
                parts: vec![Part::Text { text: format!("part-{i}"), metadata: None }],
                index: 0,
                append: false,
                last_chunk: true,
                metadata: None,
            };
            engine.apply_update(&task.id, TaskUpdate::artifact(artifact)).await.unwrap();
        }

        let task = engine.get_task(&task.id).await.unwrap();
        for (i, artifact) in task.artifacts.iter().enumerate() {
            assert_eq!(artifact.index, i);
        }
    }

    #[tokio::test]
    async fn cancel_already_terminal_task_fails() {
        let engine = engine();
        let task = engine.create_or_get_task(None, None, None).await.unwrap();
        engine
            .apply_update(&task.id, TaskUpdate::status_final(TaskStatus::new(TaskState::Canceled)))
            .await
            .unwrap();

        let result = engine.cancel(&task.id).await;
        assert!(matches!(result, Err(A2AError::TaskNotCancelable { .. })));
    }

    #[tokio::test]
    async fn final_update_closes_subscribers() {
        let engine = engine();
        let task = engine.create_or_get_task(None, None, None).await.unwrap();
        let mut sub = engine.subscribe(&task.id).await;

        engine
            .apply_update(&task.id, TaskUpdate::status_final(TaskStatus::new(TaskState::Canceled)))
            .await
            .unwrap();

        // Done event arrives, then the channel closes.
        let mut saw_done = false;
        while let Some(event) = sub.receiver.recv().await {
            if matches!(event, StreamEvent::Done(_)) {
                saw_done = true;
            }
        }
        assert!(saw_done);
    }

    #[tokio::test]
    async fn writer_lock_serializes_concurrent_execution() {
        let engine = Arc::new(engine());
        let task = engine.create_or_get_task(None, None, None).await.unwrap();

        let guard1 = engine.acquire_writer_lock(&task.id).await;
        let engine2 = Arc::clone(&engine);
        let task_id = task.id.clone();
        let handle = tokio::spawn(async move {
            let _guard2 = engine2.acquire_writer_lock(&task_id).await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        drop(guard1);
        handle.await.unwrap();
    }
}
