//! Orchestrates a single request end-to-end: invoke the handler, enforce the
//! per-task writer lock, apply the resulting update(s), and recover from a
//! handler panic by failing the task rather than losing it silently.

use std::sync::Arc;

use tracing::error;

use crate::error::{A2AError, A2AResult};
use crate::server::handler::{RequestContext, TaskHandler};
use crate::server::subscriber_registry::Subscription;
use crate::server::task_engine::TaskEngine;
use crate::types::{Message, SendMessageParams, Task, TaskUpdate};

/// Drives a [`TaskHandler`] against the [`TaskEngine`], owning the
/// lock-acquire / invoke / apply-update / panic-recovery sequence shared by
/// both `tasks/send` and `tasks/sendSubscribe`.
pub struct Orchestrator {
    engine: Arc<TaskEngine>,
    handler: Arc<dyn TaskHandler>,
}

impl Orchestrator {
    /// Construct an orchestrator over the given engine and handler.
    pub fn new(engine: Arc<TaskEngine>, handler: Arc<dyn TaskHandler>) -> Self {
        Self { engine, handler }
    }

    /// Handle `tasks/send`: create-or-get the task, append the inbound
    /// message, invoke the handler once, and apply its update.
    pub async fn send(&self, params: SendMessageParams) -> A2AResult<Task> {
        let task = self
            .engine
            .create_or_get_task(params.task_id, params.session_id, params.metadata)
            .await?;
        self.engine.append_inbound_message(&task.id, params.message.clone()).await?;

        let _writer_guard = self.engine.acquire_writer_lock(&task.id).await;
        let task = self.engine.get_task(&task.id).await?;

        let ctx = RequestContext::default();
        let update = self.invoke_handler_once(&ctx, &task, &params.message).await;

        match update {
            Ok(update) => self.engine.apply_update(&task.id, update).await,
            Err(err) => {
                error!(task_id = %task.id, error = %err, "handler failed, failing task");
                self.engine.fail_task(&task.id, err.to_string()).await
            }
        }
    }

    /// Handle `tasks/sendSubscribe`: same setup as `send`, but drives the
    /// handler's streaming path and applies each update as it arrives,
    /// returning a subscription the caller streams back over SSE.
    pub async fn send_stream(&self, params: SendMessageParams) -> A2AResult<(Task, Subscription)> {
        if !self.handler.supports_streaming() {
            return Err(A2AError::unsupported_operation(
                "this agent does not support tasks/sendSubscribe",
            ));
        }

        let task = self
            .engine
            .create_or_get_task(params.task_id, params.session_id, params.metadata)
            .await?;
        self.engine.append_inbound_message(&task.id, params.message.clone()).await?;

        let subscription = self.engine.subscribe(&task.id).await;

        let engine = Arc::clone(&self.engine);
        let handler = Arc::clone(&self.handler);
        let task_id = task.id.clone();
        let message = params.message.clone();

        tokio::spawn(async move {
            let _writer_guard = engine.acquire_writer_lock(&task_id).await;
            let task = match engine.get_task(&task_id).await {
                Ok(t) => t,
                Err(err) => {
                    error!(task_id = %task_id, error = %err, "failed to reload task for streaming");
                    return;
                }
            };
            let ctx = RequestContext::default();

            let stream_result = tokio::spawn({
                let handler = Arc::clone(&handler);
                let ctx = ctx.clone();
                let task = task.clone();
                let message = message.clone();
                async move { handler.handle_task_stream(&ctx, &task, &message).await }
            })
            .await;

            let mut rx = match stream_result {
                Ok(Ok(rx)) => rx,
                Ok(Err(err)) => {
                    let _ = engine.fail_task(&task_id, err.to_string()).await;
                    return;
                }
                Err(join_err) => {
                    let reason = if join_err.is_panic() {
                        "handler panicked while starting stream".to_string()
                    } else {
                        join_err.to_string()
                    };
                    let _ = engine.fail_task(&task_id, reason).await;
                    return;
                }
            };

            while let Some(update) = rx.recv().await {
                if let Err(err) = engine.apply_update(&task_id, update).await {
                    error!(task_id = %task_id, error = %err, "failed to apply streamed update");
                    let _ = engine.fail_task(&task_id, err.to_string()).await;
                    break;
                }
            }
        });

        Ok((task, subscription))
    }

    async fn invoke_handler_once(
        &self,
        ctx: &RequestContext,
        task: &Task,
        message: &Message,
    ) -> A2AResult<TaskUpdate> {
        let handler = Arc::clone(&self.handler);
        let ctx = ctx.clone();
        let task = task.clone();
        let message = message.clone();

        match tokio::spawn(async move { handler.handle_task(&ctx, &task, &message).await }).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                Err(A2AError::internal_error("handler panicked while processing task"))
            }
            Err(join_err) => Err(A2AError::internal_error(join_err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubscriberConfig;
    use crate::server::subscriber_registry::SubscriberRegistry;
    use crate::server::task_store::InMemoryTaskStore;
    use crate::types::{Message, TaskState, TaskStatus};
    use async_trait::async_trait;

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

    struct PanickingHandler;

    #[async_trait]
    impl TaskHandler for PanickingHandler {
        async fn handle_task(&self, _ctx: &RequestContext, _task: &Task, _message: &Message) -> A2AResult<TaskUpdate> {
            panic!("boom");
        }
    }

    fn make_orchestrator(handler: Arc<dyn TaskHandler>) -> Orchestrator {
        let store: Arc<dyn crate::server::task_store::TaskStore> = Arc::new(InMemoryTaskStore::new());
        let subs = Arc::new(SubscriberRegistry::new(SubscriberConfig::default()));
        let engine = Arc::new(TaskEngine::new(store, subs));
        Orchestrator::new(engine, handler)
    }

    #[tokio::test]
    async fn send_applies_handler_update() {
        let orchestrator = make_orchestrator(Arc::new(EchoHandler));
        let task = orchestrator
            .send(SendMessageParams {
                task_id: None,
                session_id: None,
                message: Message::user_text("hi"),
                configuration: None,
                metadata: None,
            })
            .await
            .unwrap();
        assert_eq!(task.status.state, TaskState::Completed);
    }

    #[tokio::test]
    async fn send_recovers_from_handler_panic_by_failing_task() {
        let orchestrator = make_orchestrator(Arc::new(PanickingHandler));
        let task = orchestrator
            .send(SendMessageParams {
                task_id: None,
                session_id: None,
                message: Message::user_text("hi"),
                configuration: None,
                metadata: None,
            })
            .await
            .unwrap();
        assert_eq!(task.status.state, TaskState::Failed);
    }

    #[tokio::test]
    async fn send_stream_rejected_when_handler_lacks_support() {
        let orchestrator = make_orchestrator(Arc::new(EchoHandler));
        let result = orchestrator
            .send_stream(SendMessageParams {
                task_id: None,
                session_id: None,
                message: Message::user_text("hi"),
                configuration: None,
                metadata: None,
            })
            .await;
        assert!(result.is_err());
    }
}
