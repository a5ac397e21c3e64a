//! Utility functions for working with A2A Task objects.

use crate::error::{A2AError, A2AResult};
use crate::types::{Artifact, Message, Task, TaskState};

/// Creates a `Task` already in the `completed` state, carrying the given
/// artifacts and optional history.
///
/// Useful for agents that produce a task's entire result synchronously,
/// without going through the engine's incremental update path.
///
/// ```
/// use a2a_core::utils::{completed_task, new_text_artifact};
///
/// let artifact = new_text_artifact("Result", "Task complete", None::<String>);
/// let task = completed_task("task-123", vec![artifact], None).unwrap();
/// assert_eq!(task.status.state, a2a_core::types::TaskState::Completed);
/// ```
pub fn completed_task(task_id: impl Into<String>, artifacts: Vec<Artifact>, history: Option<Vec<Message>>) -> A2AResult<Task> {
    if artifacts.is_empty() {
        return Err(A2AError::invalid_params("artifacts must be a non-empty list of Artifact objects"));
    }
    for (i, artifact) in artifacts.iter().enumerate() {
        if artifact.index != i {
            return Err(A2AError::invalid_params(format!(
                "artifact indices must be dense: expected index {i}, found {}",
                artifact.index
            )));
        }
    }

    let mut task = Task::new(task_id, None, None);
    task.status.state = TaskState::Completed;
    task.artifacts = artifacts;
    task.history = history.unwrap_or_default();
    Ok(task)
}

/// Applies a history-length limit to a task, returning a new snapshot with
/// the history truncated to its last `n` messages.
///
/// Thin wrapper over [`Task::with_truncated_history`] kept for API parity
/// with the rest of this module's task helpers.
///
/// ```
/// use a2a_core::types::{Message, Task};
/// use a2a_core::utils::apply_history_length;
///
/// let mut task = Task::new("task-1", None, None);
/// task.history = (0..10).map(|i| Message::user_text(format!("Message {i}"))).collect();
///
/// let limited = apply_history_length(&task, Some(5));
/// assert_eq!(limited.history.len(), 5);
/// ```
pub fn apply_history_length(task: &Task, history_length: Option<usize>) -> Task {
    task.with_truncated_history(history_length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_task_status() {
        let artifact = crate::utils::new_text_artifact("test", "content", None::<String>);
        let task = completed_task("task-1", vec![artifact], None).unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[test]
    fn test_completed_task_empty_artifacts_fails() {
        let result = completed_task("task-1", vec![], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_completed_task_rejects_sparse_indices() {
        let mut artifact = crate::utils::new_text_artifact("test", "content", None::<String>);
        artifact.index = 1;
        let result = completed_task("task-1", vec![artifact], None);
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_history_length() {
        let mut task = Task::new("task-1", None, None);
        task.history = (0..10).map(|i| Message::user_text(format!("Message {i}"))).collect();

        let limited = apply_history_length(&task, Some(5));
        assert_eq!(limited.history.len(), 5);
        assert_eq!(limited.history[0].text(), "Message 5");
        assert_eq!(limited.history[4].text(), "Message 9");
    }
}
