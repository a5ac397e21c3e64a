//! The handler trait an agent implements to drive tasks forward.
//!
//! Deliberately simpler than the teacher's `AgentExecutor`/`EventQueue`-push
//! model: a handler is a pure function from `(context, task, message)` to a
//! single [`TaskUpdate`] (or a stream of them), not a struct that pushes
//! events into a queue it also owns the lifecycle of.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::A2AResult;
use crate::types::{Message, Task, TaskUpdate};

/// Context passed to a handler for a single request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Session ID the task belongs to, if any.
    pub session_id: Option<String>,
    /// Arbitrary metadata carried from the inbound JSON-RPC request.
    pub metadata: Option<serde_json::Value>,
}

impl RequestContext {
    /// Construct an empty context.
    pub fn new() -> Self {
        Self {
            session_id: None,
            metadata: None,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The capability record an agent implements to process tasks.
///
/// `handle_task` is required and drives `tasks/send`. `handle_task_stream`
/// is optional; an agent that does not override it does not support
/// `tasks/sendSubscribe`, and the server surfaces
/// [`crate::error::A2AError::unsupported_operation`] for that method.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    /// Process one inbound message against a task and return the single
    /// update to apply.
    async fn handle_task(&self, ctx: &RequestContext, task: &Task, message: &Message) -> A2AResult<TaskUpdate>;

    /// Process one inbound message, returning a channel of incremental
    /// updates for `tasks/sendSubscribe`. The default implementation
    /// indicates streaming is not supported.
    async fn handle_task_stream(
        &self,
        _ctx: &RequestContext,
        _task: &Task,
        _message: &Message,
    ) -> A2AResult<mpsc::Receiver<TaskUpdate>> {
        Err(crate::error::A2AError::unsupported_operation(
            "this agent does not support streaming task updates",
        ))
    }

    /// Whether this handler supports `tasks/sendSubscribe`. Used when
    /// building the agent card's `capabilities.streaming` field.
    fn supports_streaming(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaskStatus;
    use crate::types::TaskState;

    struct EchoHandler;

    #[async_trait]
    impl TaskHandler for EchoHandler {
        async fn handle_task(&self, _ctx: &RequestContext, _task: &Task, message: &Message) -> A2AResult<TaskUpdate> {
            Ok(TaskUpdate::status_final(TaskStatus::with_message(
                TaskState::Completed,
                Message::agent_text(message.text()),
            )))
        }
    }

    #[tokio::test]
    async fn default_handle_task_stream_is_unsupported() {
        let handler = EchoHandler;
        let ctx = RequestContext::default();
        let task = Task::new("t1", None, None);
        let msg = Message::user_text("hi");
        let result = handler.handle_task_stream(&ctx, &task, &msg).await;
        assert!(result.is_err());
        assert!(!handler.supports_streaming());
    }

    #[tokio::test]
    async fn handle_task_echoes_input() {
        let handler = EchoHandler;
        let ctx = RequestContext::default();
        let task = Task::new("t1", None, None);
        let msg = Message::user_text("hello");
        let update = handler.handle_task(&ctx, &task, &msg).await.unwrap();
        assert!(update.r#final);
        assert_eq!(update.status.unwrap().state, TaskState::Completed);
    }
}
