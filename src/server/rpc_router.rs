//! JSON-RPC envelope parsing and method dispatch.
//!
//! Each fixed HTTP path in [`crate::server::axum_integration`] accepts a
//! JSON-RPC 2.0 envelope and routes it through [`dispatch`], which validates
//! the envelope, looks up the method in the dispatch table, and maps any
//! failure onto the closed JSON-RPC error taxonomy in [`crate::error`].

use std::sync::Arc;

use tracing::warn;

use crate::error::A2AError;
use crate::server::orchestrator::Orchestrator;
use crate::server::push::PushConfigStore;
use crate::server::task_engine::TaskEngine;
use crate::server::task_store::TaskListParams;
use crate::types::{
    CancelTaskParams, GetPushNotificationParams, GetTaskParams, JsonRpcRequest, JsonRpcResponse, ListTasksParams,
    SetPushNotificationParams, Task, TaskPushNotificationConfig,
};

/// Shared state needed to dispatch any JSON-RPC method.
pub struct RpcContext {
    /// Drives `tasks/send`.
    pub orchestrator: Arc<Orchestrator>,
    /// Backs `tasks/get`, `tasks/cancel`, `tasks/list`.
    pub engine: Arc<TaskEngine>,
    /// Backs `tasks/pushNotification/{set,get}`.
    pub push_config_store: Arc<PushConfigStore>,
}

/// Parse `params` as `T`, mapping a deserialization failure onto
/// `InvalidParams` (-32602).
fn parse_params<T: serde::de::DeserializeOwned>(params: Option<serde_json::Value>) -> Result<T, A2AError> {
    let value = params.ok_or_else(|| A2AError::invalid_params("missing params"))?;
    serde_json::from_value(value).map_err(|e| A2AError::invalid_params(e.to_string()))
}

/// Dispatch one JSON-RPC request to the method it names, returning a
/// complete response envelope (success or error — never a raw panic/error
/// propagated to the caller).
pub async fn dispatch(ctx: &RpcContext, request: JsonRpcRequest) -> JsonRpcResponse {
    let id = request.id.clone();

    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::from_a2a_error(id, A2AError::invalid_request("jsonrpc must be \"2.0\""));
    }

    let result = match request.method.as_str() {
        "tasks/send" => handle_send(ctx, request.params).await,
        "tasks/get" => handle_get(ctx, request.params).await,
        "tasks/cancel" => handle_cancel(ctx, request.params).await,
        "tasks/list" => handle_list(ctx, request.params).await,
        "tasks/pushNotification/set" => handle_push_set(ctx, request.params).await,
        "tasks/pushNotification/get" => handle_push_get(ctx, request.params).await,
        other => {
            warn!(method = other, "unknown JSON-RPC method");
            Err(A2AError::method_not_found(other))
        }
    };

    match result {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(err) => JsonRpcResponse::from_a2a_error(id, err),
    }
}

async fn handle_send(ctx: &RpcContext, params: Option<serde_json::Value>) -> Result<serde_json::Value, A2AError> {
    let params = parse_params(params)?;
    let task = ctx.orchestrator.send(params).await?;
    Ok(serde_json::to_value(task).expect("Task always serializes"))
}

async fn handle_get(ctx: &RpcContext, params: Option<serde_json::Value>) -> Result<serde_json::Value, A2AError> {
    let params: GetTaskParams = parse_params(params)?;
    let task = ctx.engine.get_task(&params.id).await?;
    let snapshot = task.with_truncated_history(params.history_length);
    Ok(serde_json::to_value(snapshot).expect("Task always serializes"))
}

async fn handle_cancel(ctx: &RpcContext, params: Option<serde_json::Value>) -> Result<serde_json::Value, A2AError> {
    let params: CancelTaskParams = parse_params(params)?;
    let task: Task = ctx.engine.cancel(&params.id).await?;
    Ok(serde_json::to_value(task).expect("Task always serializes"))
}

async fn handle_list(ctx: &RpcContext, params: Option<serde_json::Value>) -> Result<serde_json::Value, A2AError> {
    let params: ListTasksParams = match params {
        Some(v) => serde_json::from_value(v).map_err(|e| A2AError::invalid_params(e.to_string()))?,
        None => ListTasksParams::default(),
    };
    let result = ctx
        .engine
        .list(&TaskListParams {
            session_id: params.session_id,
            states: params.states,
            limit: params.limit,
            offset: params.offset,
        })
        .await?;
    Ok(serde_json::to_value(result).expect("ListTasksResult always serializes"))
}

async fn handle_push_set(ctx: &RpcContext, params: Option<serde_json::Value>) -> Result<serde_json::Value, A2AError> {
    let params: SetPushNotificationParams = parse_params(params)?;
    // Confirm the task exists before accepting a push config for it.
    ctx.engine.get_task(&params.task_id).await?;
    ctx.push_config_store
        .set(&params.task_id, params.push_notification_config.clone())
        .await;
    let result = TaskPushNotificationConfig {
        task_id: params.task_id,
        push_notification_config: params.push_notification_config,
    };
    Ok(serde_json::to_value(result).expect("TaskPushNotificationConfig always serializes"))
}

async fn handle_push_get(ctx: &RpcContext, params: Option<serde_json::Value>) -> Result<serde_json::Value, A2AError> {
    let params: GetPushNotificationParams = parse_params(params)?;
    let config = ctx
        .push_config_store
        .get(&params.id)
        .await
        .ok_or_else(|| A2AError::push_notification_not_supported(format!("no push config set for task {}", params.id)))?;
    let result = TaskPushNotificationConfig {
        task_id: params.id,
        push_notification_config: config,
    };
    Ok(serde_json::to_value(result).expect("TaskPushNotificationConfig always serializes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubscriberConfig;
    use crate::server::handler::{RequestContext, TaskHandler};
    use crate::server::subscriber_registry::SubscriberRegistry;
    use crate::server::task_store::{InMemoryTaskStore, TaskStore};
    use crate::types::{JsonRpcId, Message, SendMessageParams, TaskState, TaskStatus};
    use async_trait::async_trait;

    struct EchoHandler;

    #[async_trait]
    impl TaskHandler for EchoHandler {
        async fn handle_task(
            &self,
            _ctx: &RequestContext,
            _task: &Task,
            message: &Message,
        ) -> Result<crate::types::TaskUpdate, A2AError> {
            Ok(crate::types::TaskUpdate::status_final(TaskStatus::with_message(
                TaskState::Completed,
                Message::agent_text(message.text()),
            )))
        }
    }

    fn make_ctx() -> RpcContext {
        let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let subs = Arc::new(SubscriberRegistry::new(SubscriberConfig::default()));
        let engine = Arc::new(TaskEngine::new(store, subs));
        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&engine), Arc::new(EchoHandler)));
        RpcContext {
            orchestrator,
            engine,
            push_config_store: Arc::new(PushConfigStore::new()),
        }
    }

    #[tokio::test]
    async fn dispatch_unknown_method_returns_method_not_found() {
        let ctx = make_ctx();
        let request = JsonRpcRequest::new(1i64, "bogus/method", None);
        let response = dispatch(&ctx, request).await;
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn dispatch_rejects_wrong_jsonrpc_version() {
        let ctx = make_ctx();
        let mut request = JsonRpcRequest::new(1i64, "tasks/get", None);
        request.jsonrpc = "1.0".to_string();
        let response = dispatch(&ctx, request).await;
        assert_eq!(response.error.unwrap().code, -32600);
    }

    #[tokio::test]
    async fn dispatch_echoes_request_id() {
        let ctx = make_ctx();
        let params = serde_json::to_value(SendMessageParams {
            task_id: None,
            session_id: None,
            message: Message::user_text("hi"),
            configuration: None,
            metadata: None,
        })
        .unwrap();
        let request = JsonRpcRequest::new("req-42", "tasks/send", Some(params));
        let response = dispatch(&ctx, request).await;
        assert_eq!(response.id, Some(JsonRpcId::String("req-42".to_string())));
        assert!(response.result.is_some());
    }

    #[tokio::test]
    async fn dispatch_get_missing_task_returns_task_not_found() {
        let ctx = make_ctx();
        let params = serde_json::to_value(GetTaskParams {
            id: "nope".to_string(),
            history_length: None,
        })
        .unwrap();
        let request = JsonRpcRequest::new(1i64, "tasks/get", Some(params));
        let response = dispatch(&ctx, request).await;
        assert_eq!(response.error.unwrap().code, -32001);
    }

    #[tokio::test]
    async fn push_get_without_config_errors() {
        let ctx = make_ctx();
        let params = serde_json::to_value(GetPushNotificationParams { id: "t1".to_string() }).unwrap();
        let request = JsonRpcRequest::new(1i64, "tasks/pushNotification/get", Some(params));
        let response = dispatch(&ctx, request).await;
        assert_eq!(response.error.unwrap().code, -32003);
    }
}
