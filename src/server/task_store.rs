//! Task store — persistence layer for A2A tasks.
//!
//! The task store is responsible for persisting and retrieving [`Task`]
//! objects. [`InMemoryTaskStore`] is the provided implementation: bounded by
//! capacity (evicting terminal tasks oldest-first once full) and swept
//! periodically to drop terminal tasks past their TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::TaskStoreConfig;
use crate::error::A2AResult;
use crate::types::{ListTasksResult, Task, TaskState};

/// Parameters for listing tasks with optional filtering and pagination.
#[derive(Debug, Clone, Default)]
pub struct TaskListParams {
    /// Filter tasks by session ID.
    pub session_id: Option<String>,

    /// Filter tasks by state. Empty means no filter.
    pub states: Vec<TaskState>,

    /// Maximum number of tasks to return.
    pub limit: Option<usize>,

    /// Number of matching tasks to skip before collecting `limit`.
    pub offset: usize,
}

/// Trait for persisting and retrieving A2A tasks.
///
/// Implementations must be `Send + Sync` for use in async server contexts.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Save or update a task in the store. Overwrites an existing task with
    /// the same ID.
    async fn save(&self, task: Task) -> A2AResult<()>;

    /// Retrieve a task by its ID. Returns `None` if not found.
    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>>;

    /// Delete a task by its ID. Silently succeeds if absent.
    async fn delete(&self, task_id: &str) -> A2AResult<()>;

    /// List tasks matching the given filter, ordered by `created_at`
    /// descending, with `offset`/`limit` applied after filtering. `total`
    /// in the result reflects the filtered count before pagination.
    async fn list(&self, params: &TaskListParams) -> A2AResult<ListTasksResult>;
}

struct Inner {
    tasks: HashMap<String, Task>,
}

/// In-memory task store backed by a `HashMap`, bounded by capacity and
/// swept for TTL-expired terminal tasks.
///
/// Thread-safe via `tokio::sync::RwLock`. All data is lost when the
/// process exits.
pub struct InMemoryTaskStore {
    inner: Arc<RwLock<Inner>>,
    config: TaskStoreConfig,
    sweeper: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for InMemoryTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("config", &self.config)
            .finish()
    }
}

impl InMemoryTaskStore {
    /// Create a new empty in-memory task store with default configuration.
    /// Does not start the background TTL sweeper — call
    /// [`InMemoryTaskStore::spawn_sweeper`] to enable it.
    pub fn new() -> Self {
        Self::with_config(TaskStoreConfig::default())
    }

    /// Create a new empty in-memory task store with the given configuration.
    pub fn with_config(config: TaskStoreConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                tasks: HashMap::new(),
            })),
            config,
            sweeper: None,
        }
    }

    /// Start the periodic TTL sweeper as a background task. Call at most
    /// once; the handle is stored so the sweeper is aborted when the store
    /// is dropped.
    pub fn spawn_sweeper(&mut self) {
        let inner = Arc::clone(&self.inner);
        let ttl = self.config.ttl;
        let interval = self.config.sweep_interval;
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                Self::sweep_expired(&inner, ttl).await;
            }
        });
        self.sweeper = Some(handle);
    }

    async fn sweep_expired(inner: &Arc<RwLock<Inner>>, ttl: Duration) {
        let now = chrono::Utc::now();
        let mut guard = inner.write().await;
        let before = guard.tasks.len();
        guard.tasks.retain(|_, task| {
            if !task.status.state.is_terminal() {
                return true;
            }
            match now.signed_duration_since(task.updated_at).to_std() {
                Ok(age) => age < ttl,
                Err(_) => true,
            }
        });
        let removed = before - guard.tasks.len();
        if removed > 0 {
            debug!(removed, "TTL sweeper removed expired terminal tasks");
        }
    }

    /// Evict half of the terminal tasks, oldest (`created_at`) first, to
    /// bring the store back under capacity. Called on insert when full.
    fn evict_oldest_terminal(tasks: &mut HashMap<String, Task>) {
        let mut terminal_ids: Vec<(String, chrono::DateTime<chrono::Utc>)> = tasks
            .values()
            .filter(|t| t.status.state.is_terminal())
            .map(|t| (t.id.clone(), t.created_at))
            .collect();

        if terminal_ids.is_empty() {
            warn!("task store at capacity with no terminal tasks to evict");
            return;
        }

        terminal_ids.sort_by_key(|(_, created_at)| *created_at);
        let evict_count = (terminal_ids.len() / 2).max(1);
        for (id, _) in terminal_ids.into_iter().take(evict_count) {
            tasks.remove(&id);
        }
        warn!(evict_count, "task store over capacity, evicted oldest terminal tasks");
    }
}

impl Drop for InMemoryTaskStore {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
        }
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn save(&self, task: Task) -> A2AResult<()> {
        let task_id = task.id.clone();
        let mut guard = self.inner.write().await;
        let is_new = !guard.tasks.contains_key(&task_id);

        if is_new && guard.tasks.len() >= self.config.capacity {
            Self::evict_oldest_terminal(&mut guard.tasks);
        }

        guard.tasks.insert(task_id.clone(), task);
        debug!(task_id = %task_id, is_new = is_new, "Task saved");
        Ok(())
    }

    async fn get(&self, task_id: &str) -> A2AResult<Option<Task>> {
        let guard = self.inner.read().await;
        let task = guard.tasks.get(task_id).cloned();
        debug!(task_id = %task_id, found = task.is_some(), "Task lookup");
        Ok(task)
    }

    async fn delete(&self, task_id: &str) -> A2AResult<()> {
        let mut guard = self.inner.write().await;
        if guard.tasks.remove(task_id).is_some() {
            debug!(task_id = %task_id, "Task deleted");
        } else {
            warn!(task_id = %task_id, "Attempted to delete non-existent task");
        }
        Ok(())
    }

    async fn list(&self, params: &TaskListParams) -> A2AResult<ListTasksResult> {
        let guard = self.inner.read().await;

        let mut matching: Vec<&Task> = guard
            .tasks
            .values()
            .filter(|t| match &params.session_id {
                Some(sid) => t.session_id.as_deref() == Some(sid.as_str()),
                None => true,
            })
            .filter(|t| params.states.is_empty() || params.states.contains(&t.status.state))
            .collect();

        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len();
        let limit = params.limit.unwrap_or(usize::MAX);
        let page: Vec<Task> = matching
            .into_iter()
            .skip(params.offset)
            .take(limit)
            .cloned()
            .collect();

        debug!(count = page.len(), total, "Listed tasks");
        Ok(ListTasksResult { tasks: page, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskStatus;

    fn task_in_state(id: &str, state: TaskState) -> Task {
        let mut t = Task::new(id, None, None);
        t.status = TaskStatus::new(state);
        t
    }

    #[tokio::test]
    async fn save_and_get_roundtrip() {
        let store = InMemoryTaskStore::new();
        let task = Task::new("t1", None, None);
        store.save(task.clone()).await.unwrap();
        let fetched = store.get("t1").await.unwrap().unwrap();
        assert_eq!(fetched.id, "t1");
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryTaskStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_task() {
        let store = InMemoryTaskStore::new();
        store.save(Task::new("t1", None, None)).await.unwrap();
        store.delete("t1").await.unwrap();
        assert!(store.get("t1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_filters_by_session_and_state() {
        let store = InMemoryTaskStore::new();
        let mut t1 = task_in_state("t1", TaskState::Completed);
        t1.session_id = Some("s1".to_string());
        let mut t2 = task_in_state("t2", TaskState::Working);
        t2.session_id = Some("s1".to_string());
        let mut t3 = task_in_state("t3", TaskState::Completed);
        t3.session_id = Some("s2".to_string());

        store.save(t1).await.unwrap();
        store.save(t2).await.unwrap();
        store.save(t3).await.unwrap();

        let result = store
            .list(&TaskListParams {
                session_id: Some("s1".to_string()),
                states: vec![TaskState::Completed],
                limit: None,
                offset: 0,
            })
            .await
            .unwrap();

        assert_eq!(result.total, 1);
        assert_eq!(result.tasks[0].id, "t1");
    }

    #[tokio::test]
    async fn list_pagination_reports_total_before_pagination() {
        let store = InMemoryTaskStore::new();
        for i in 0..5 {
            store.save(Task::new(format!("t{i}"), None, None)).await.unwrap();
        }
        let result = store
            .list(&TaskListParams {
                session_id: None,
                states: vec![],
                limit: Some(2),
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(result.tasks.len(), 2);
        assert_eq!(result.total, 5);
    }

    #[tokio::test]
    async fn list_offset_beyond_len_returns_empty_with_correct_total() {
        let store = InMemoryTaskStore::new();
        store.save(Task::new("t1", None, None)).await.unwrap();
        let result = store
            .list(&TaskListParams {
                session_id: None,
                states: vec![],
                limit: Some(10),
                offset: 100,
            })
            .await
            .unwrap();
        assert!(result.tasks.is_empty());
        assert_eq!(result.total, 1);
    }

    #[tokio::test]
    async fn capacity_eviction_drops_oldest_terminal_tasks() {
        let config = TaskStoreConfig::default().with_capacity(4);
        let store = InMemoryTaskStore::with_config(config);
        for i in 0..4 {
            store
                .save(task_in_state(&format!("t{i}"), TaskState::Completed))
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        // Inserting a 5th task while at capacity triggers eviction of half
        // the terminal tasks (oldest first).
        store.save(Task::new("t4", None, None)).await.unwrap();

        let result = store
            .list(&TaskListParams::default())
            .await
            .unwrap();
        assert!(result.total < 5);
        assert!(store.get("t4").await.unwrap().is_some());
    }
}
