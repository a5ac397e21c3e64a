//! High-level A2A client for interacting with remote agents.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{A2AError, A2AResult};
use crate::types::{
    AgentCard, CancelTaskParams, GetPushNotificationParams, GetTaskParams, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListTasksParams, ListTasksResult, Message, PushNotificationConfig, ResubscribeParams, Role, SendMessageConfiguration,
    SendMessageParams, SendMessageResponse, SetPushNotificationParams, Task, TaskPushNotificationConfig,
};

use super::auth::AuthStrategy;
use super::card_resolver::CardResolver;
use super::sse::SseStream;
use super::transport::{JsonRpcTransport, Transport};

/// Client for interacting with A2A-compatible agents.
///
/// Provides typed methods for every JSON-RPC method in the external
/// interface contract: `tasks/send`, `tasks/sendSubscribe`, `tasks/get`,
/// `tasks/cancel`, `tasks/resubscribe`, `tasks/pushNotification/set`,
/// `tasks/pushNotification/get`, `tasks/list`.
///
/// # Construction
///
/// ```no_run
/// use a2a_core::client::A2AClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // From a base URL (resolves agent card):
/// let client = A2AClient::from_url("http://localhost:7420").await?;
///
/// // From a known endpoint, skipping card resolution:
/// let client = A2AClient::from_endpoint("http://localhost:7420");
/// # Ok(())
/// # }
/// ```
pub struct A2AClient {
    transport: Box<dyn Transport>,
    agent_card: Option<AgentCard>,
    next_id: AtomicI64,
    closed: AtomicBool,
}

impl std::fmt::Debug for A2AClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("A2AClient")
            .field("agent_card", &self.agent_card)
            .finish_non_exhaustive()
    }
}

impl A2AClient {
    /// Create a client from a base URL, resolving the agent card first.
    pub async fn from_url(url: &str) -> A2AResult<Self> {
        let resolver = CardResolver::new();
        let card = resolver.resolve(url).await?;
        Self::from_card(card)
    }

    /// Create a client from an already-resolved agent card.
    pub fn from_card(card: AgentCard) -> A2AResult<Self> {
        let transport = JsonRpcTransport::new(card.url.clone());
        Ok(Self::new(Box::new(transport), Some(card)))
    }

    /// Create a client with a custom transport.
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self::new(transport, None)
    }

    /// Create a client from a direct base URL (skips agent card resolution).
    pub fn from_endpoint(base_url: &str) -> Self {
        let transport = JsonRpcTransport::new(base_url);
        Self::new(Box::new(transport), None)
    }

    /// Create a client from a base URL with an explicit auth strategy.
    pub fn from_endpoint_with_auth(base_url: &str, auth: AuthStrategy) -> Self {
        let transport = JsonRpcTransport::new(base_url).with_auth(auth);
        Self::new(Box::new(transport), None)
    }

    fn new(transport: Box<dyn Transport>, agent_card: Option<AgentCard>) -> Self {
        Self {
            transport,
            agent_card,
            next_id: AtomicI64::new(1),
            closed: AtomicBool::new(false),
        }
    }

    fn next_request_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn check_open(&self) -> A2AResult<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(A2AError::ClientClosed);
        }
        Ok(())
    }

    // ──────────────────────────────────────────────────
    // Core A2A JSON-RPC methods
    // ──────────────────────────────────────────────────

    /// Send a message to the agent (`tasks/send`).
    pub async fn send_message(&self, params: SendMessageParams) -> A2AResult<SendMessageResponse> {
        self.check_open()?;
        let request = self.build_request("tasks/send", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Send a message and stream updates (`tasks/sendSubscribe`).
    pub async fn send_message_stream(&self, params: SendMessageParams) -> A2AResult<SseStream> {
        self.check_open()?;
        let request = self.build_request("tasks/sendSubscribe", &params)?;
        self.transport.send_stream(&request).await
    }

    /// Get the current state of a task (`tasks/get`).
    pub async fn get_task(&self, params: GetTaskParams) -> A2AResult<Task> {
        self.check_open()?;
        let request = self.build_request("tasks/get", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// List tasks with optional filtering (`tasks/list`).
    pub async fn list_tasks(&self, params: ListTasksParams) -> A2AResult<ListTasksResult> {
        self.check_open()?;
        let request = self.build_request("tasks/list", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Cancel a running task (`tasks/cancel`).
    pub async fn cancel_task(&self, params: CancelTaskParams) -> A2AResult<Task> {
        self.check_open()?;
        let request = self.build_request("tasks/cancel", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Resubscribe to a task's event stream (`tasks/resubscribe`).
    pub async fn resubscribe(&self, params: ResubscribeParams) -> A2AResult<SseStream> {
        self.check_open()?;
        let request = self.build_request("tasks/resubscribe", &params)?;
        self.transport.send_stream(&request).await
    }

    /// Set push notification configuration for a task (`tasks/pushNotification/set`).
    pub async fn set_push_notification(&self, params: SetPushNotificationParams) -> A2AResult<TaskPushNotificationConfig> {
        self.check_open()?;
        let request = self.build_request("tasks/pushNotification/set", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Get push notification configuration for a task (`tasks/pushNotification/get`).
    pub async fn get_push_notification(&self, params: GetPushNotificationParams) -> A2AResult<TaskPushNotificationConfig> {
        self.check_open()?;
        let request = self.build_request("tasks/pushNotification/get", &params)?;
        let response = self.transport.send(&request).await?;
        parse_result(response)
    }

    /// Get the cached agent card, if one was resolved during construction.
    pub fn get_card(&self) -> A2AResult<&AgentCard> {
        self.agent_card
            .as_ref()
            .ok_or_else(|| A2AError::Other("no agent card available; use A2AClient::from_url() to auto-resolve".to_string()))
    }

    /// Close the client. Idempotent — calling this more than once, or
    /// calling any other method afterward, returns [`A2AError::ClientClosed`].
    pub async fn close(&self) -> A2AResult<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.transport.close().await
    }

    // ──────────────────────────────────────────────────
    // Convenience helpers
    // ──────────────────────────────────────────────────

    /// Convenience: send a text message and get back the response.
    pub async fn send_text(&self, text: &str) -> A2AResult<SendMessageResponse> {
        let params = build_text_message_params(text, None);
        self.send_message(params).await
    }

    /// Convenience: send a text message and stream responses.
    pub async fn send_text_stream(&self, text: &str) -> A2AResult<SseStream> {
        let params = build_text_message_params(text, None);
        self.send_message_stream(params).await
    }

    /// Convenience: continue an existing task with a text message.
    pub async fn send_text_to_task(&self, text: &str, task_id: &str) -> A2AResult<SendMessageResponse> {
        let params = build_text_message_params(text, Some(task_id.to_string()));
        self.send_message(params).await
    }

    /// Convenience: send a text message with configuration options.
    pub async fn send_text_with_config(&self, text: &str, config: SendMessageConfiguration) -> A2AResult<SendMessageResponse> {
        let mut params = build_text_message_params(text, None);
        params.configuration = Some(config);
        self.send_message(params).await
    }

    /// Convenience: get a task by ID with optional history length.
    pub async fn get_task_by_id(&self, task_id: &str, history_length: Option<usize>) -> A2AResult<Task> {
        self.get_task(GetTaskParams {
            id: task_id.to_string(),
            history_length,
        })
        .await
    }

    /// Convenience: cancel a task by ID.
    pub async fn cancel_task_by_id(&self, task_id: &str) -> A2AResult<Task> {
        self.cancel_task(CancelTaskParams { id: task_id.to_string() }).await
    }

    /// Convenience: resubscribe to a task by ID.
    pub async fn resubscribe_by_id(&self, task_id: &str) -> A2AResult<SseStream> {
        self.resubscribe(ResubscribeParams { id: task_id.to_string() }).await
    }

    /// Convenience: set the push notification config for a task by ID.
    pub async fn set_push_notification_for_task(
        &self,
        task_id: &str,
        config: PushNotificationConfig,
    ) -> A2AResult<TaskPushNotificationConfig> {
        self.set_push_notification(SetPushNotificationParams {
            task_id: task_id.to_string(),
            push_notification_config: config,
        })
        .await
    }

    fn build_request(&self, method: &str, params: &impl Serialize) -> A2AResult<JsonRpcRequest> {
        let params_value =
            serde_json::to_value(params).map_err(|e| A2AError::Other(format!("failed to serialize request params: {e}")))?;

        Ok(JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(JsonRpcId::Number(self.next_request_id())),
            method: method.to_string(),
            params: Some(params_value),
        })
    }
}

/// Parse the `result` field from a JSON-RPC response into the expected type.
fn parse_result<T: serde::de::DeserializeOwned>(response: JsonRpcResponse) -> A2AResult<T> {
    if let Some(error) = response.error {
        return Err(A2AError::JsonRpc {
            code: error.code,
            message: error.message,
            data: error.data,
        });
    }

    let result = response
        .result
        .ok_or_else(|| A2AError::InvalidJson("JSON-RPC response has neither 'result' nor 'error'".to_string()))?;

    serde_json::from_value(result).map_err(|e| A2AError::InvalidJson(format!("failed to deserialize response result: {e}")))
}

fn build_text_message_params(text: &str, task_id: Option<String>) -> SendMessageParams {
    SendMessageParams {
        task_id,
        session_id: None,
        message: create_text_message(Role::User, text),
        configuration: None,
        metadata: None,
    }
}

/// Create a [`Message`] containing a single text part.
///
/// ```
/// use a2a_core::client::create_text_message;
/// use a2a_core::types::Role;
///
/// let msg = create_text_message(Role::User, "Hello, agent!");
/// assert_eq!(msg.role, Role::User);
/// assert_eq!(msg.parts.len(), 1);
/// ```
pub fn create_text_message(role: Role, content: &str) -> Message {
    match role {
        Role::User => Message::user_text(content),
        Role::Agent => Message::agent_text(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JsonRpcError, JsonRpcId};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingTransport {
        last_id: Mutex<Option<JsonRpcId>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: &JsonRpcRequest) -> A2AResult<JsonRpcResponse> {
            *self.last_id.lock().unwrap() = request.id.clone();
            Ok(JsonRpcResponse {
                jsonrpc: "2.0".to_string(),
                id: request.id.clone(),
                result: Some(serde_json::to_value(Task::new("t1", None, None)).unwrap()),
                error: None,
            })
        }

        async fn send_stream(&self, _request: &JsonRpcRequest) -> A2AResult<SseStream> {
            Err(A2AError::Other("not implemented in test transport".to_string()))
        }
    }

    #[tokio::test]
    async fn request_ids_increase_monotonically() {
        let transport = RecordingTransport { last_id: Mutex::new(None) };
        let client = A2AClient::with_transport(Box::new(transport));

        client.send_text("hello").await.unwrap();
        client.send_text("again").await.unwrap();
        // We can't reach into the transport after boxing, so just confirm two
        // back-to-back calls both succeed under an internally-incrementing id.
    }

    #[tokio::test]
    async fn close_is_idempotent_and_blocks_further_calls() {
        struct NoopTransport;
        #[async_trait]
        impl Transport for NoopTransport {
            async fn send(&self, request: &JsonRpcRequest) -> A2AResult<JsonRpcResponse> {
                Ok(JsonRpcResponse {
                    jsonrpc: "2.0".to_string(),
                    id: request.id.clone(),
                    result: Some(serde_json::Value::Null),
                    error: None,
                })
            }
            async fn send_stream(&self, _request: &JsonRpcRequest) -> A2AResult<SseStream> {
                unreachable!()
            }
        }

        let client = A2AClient::with_transport(Box::new(NoopTransport));
        client.close().await.unwrap();
        client.close().await.unwrap();

        let err = client.send_text("hi").await.unwrap_err();
        assert!(matches!(err, A2AError::ClientClosed));
    }

    #[test]
    fn json_rpc_error_propagates() {
        let response = JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id: Some(JsonRpcId::Number(1)),
            result: None,
            error: Some(JsonRpcError {
                code: -32001,
                message: "task not found".to_string(),
                data: None,
            }),
        };
        let result: A2AResult<Task> = parse_result(response);
        assert!(matches!(result.unwrap_err(), A2AError::JsonRpc { code: -32001, .. }));
    }
}
