//! Axum integration — the fixed HTTP surface an A2A server exposes.
//!
//! Unlike the teacher's single `POST /a2a` dispatch-by-method endpoint, each
//! A2A operation gets its own fixed path, per the external interface
//! contract:
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET  | `/.well-known/agent-card.json`   | Agent card discovery |
//! | POST | `/tasks/send`                    | Send a message, get the resulting task |
//! | POST | `/tasks/sendSubscribe`           | Send a message, stream updates over SSE |
//! | POST | `/tasks/get`                      | Retrieve a task |
//! | POST | `/tasks/cancel`                   | Cancel a task |
//! | POST | `/tasks/resubscribe`              | Re-attach to a task's event stream |
//! | POST | `/tasks/pushNotification/set`     | Set a task's push notification config |
//! | POST | `/tasks/pushNotification/get`     | Get a task's push notification config |
//! | POST | `/tasks/list`                     | List tasks |
//!
//! Every POST endpoint accepts a JSON-RPC 2.0 envelope and returns one —
//! never a bare REST body — so the error taxonomy in [`crate::error`] is
//! uniform across the whole surface.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::sse::{KeepAlive, Sse};
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::error::A2AError;
use crate::server::rpc_router::{dispatch, RpcContext};
use crate::server::sse_streamer::stream_task_events;
use crate::types::{AgentCard, JsonRpcRequest, JsonRpcResponse, SendMessageParams};

struct AppState {
    rpc: RpcContext,
    agent_card: AgentCard,
}

/// Build the axum `Router` exposing the full A2A HTTP surface.
///
/// `cors` is applied as-is; pass [`CorsLayer::permissive`] for local
/// development or a scoped layer (specific origins/methods) for production.
pub fn a2a_router(rpc: RpcContext, agent_card: AgentCard, cors: CorsLayer) -> Router {
    let state = Arc::new(AppState { rpc, agent_card });

    Router::new()
        .route("/.well-known/agent-card.json", get(handle_agent_card))
        .route("/tasks/send", post(handle_rpc))
        .route("/tasks/sendSubscribe", post(handle_send_subscribe))
        .route("/tasks/get", post(handle_rpc))
        .route("/tasks/cancel", post(handle_rpc))
        .route("/tasks/resubscribe", post(handle_resubscribe))
        .route("/tasks/pushNotification/set", post(handle_rpc))
        .route("/tasks/pushNotification/get", post(handle_rpc))
        .route("/tasks/list", post(handle_rpc))
        .layer(cors)
        .with_state(state)
}

async fn handle_agent_card(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.agent_card.clone())
}

/// Parse a raw request body into a [`JsonRpcRequest`].
///
/// Unlike axum's `Json` extractor, this never rejects the request before a
/// response envelope can be built: a malformed or incomplete body produces
/// the spec-mandated `-32700` parse-error envelope with `id: null`, rather
/// than a bare-text 400.
fn parse_request(body: &Bytes) -> Result<JsonRpcRequest, JsonRpcResponse> {
    serde_json::from_slice(body).map_err(|e| {
        JsonRpcResponse::from_a2a_error(None, A2AError::parse_error(format!("invalid JSON-RPC request: {e}")))
    })
}

/// Generic handler for every non-streaming method: parse the envelope,
/// dispatch, return the response envelope. The method name comes from the
/// request body itself (`request.method`), validated against the path by
/// `dispatch`'s method table.
async fn handle_rpc(State(state): State<Arc<AppState>>, body: Bytes) -> impl IntoResponse {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return Json(response),
    };
    let response = dispatch(&state.rpc, request).await;
    Json(response)
}

/// `POST /tasks/sendSubscribe` — starts the task, then streams updates as
/// raw SSE records.
async fn handle_send_subscribe(State(state): State<Arc<AppState>>, body: Bytes) -> axum::response::Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return Json(response).into_response(),
    };

    let params: SendMessageParams = match request.params.and_then(|v| serde_json::from_value(v).ok()) {
        Some(p) => p,
        None => {
            let err = A2AError::invalid_params("missing or invalid params for tasks/sendSubscribe");
            return Json(JsonRpcResponse::from_a2a_error(request.id, err)).into_response();
        }
    };

    match state.rpc.orchestrator.send_stream(params).await {
        Ok((task, subscription)) => {
            let stream = stream_task_events(task, subscription);
            Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
        }
        Err(err) => {
            warn!(error = %err, "tasks/sendSubscribe failed to start");
            Json(JsonRpcResponse::from_a2a_error(request.id, err)).into_response()
        }
    }
}

/// `POST /tasks/resubscribe` — re-attach to an in-flight task's event
/// stream without submitting a new message.
async fn handle_resubscribe(State(state): State<Arc<AppState>>, body: Bytes) -> axum::response::Response {
    let request = match parse_request(&body) {
        Ok(request) => request,
        Err(response) => return Json(response).into_response(),
    };

    let params: crate::types::ResubscribeParams = match request.params.and_then(|v| serde_json::from_value(v).ok()) {
        Some(p) => p,
        None => {
            let err = A2AError::invalid_params("missing or invalid params for tasks/resubscribe");
            return Json(JsonRpcResponse::from_a2a_error(request.id, err)).into_response();
        }
    };

    let task = match state.rpc.engine.get_task(&params.id).await {
        Ok(task) => task,
        Err(err) => return Json(JsonRpcResponse::from_a2a_error(request.id, err)).into_response(),
    };

    let subscription = state.rpc.engine.subscribe(&params.id).await;
    let stream = stream_task_events(task, subscription);
    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SubscriberConfig;
    use crate::server::handler::{RequestContext, TaskHandler};
    use crate::server::orchestrator::Orchestrator;
    use crate::server::push::PushConfigStore;
    use crate::server::subscriber_registry::SubscriberRegistry;
    use crate::server::task_engine::TaskEngine;
    use crate::server::task_store::{InMemoryTaskStore, TaskStore};
    use crate::types::{AgentCapabilities, Message, Task, TaskState, TaskStatus, TaskUpdate};
    use async_trait::async_trait;

    struct EchoHandler;

    #[async_trait]
    impl TaskHandler for EchoHandler {
        async fn handle_task(
            &self,
            _ctx: &RequestContext,
            _task: &Task,
            message: &Message,
        ) -> Result<TaskUpdate, A2AError> {
            Ok(TaskUpdate::status_final(TaskStatus::with_message(
                TaskState::Completed,
                Message::agent_text(message.text()),
            )))
        }
    }

    fn test_router() -> Router {
        let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
        let subs = Arc::new(SubscriberRegistry::new(SubscriberConfig::default()));
        let engine = Arc::new(TaskEngine::new(store, subs));
        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&engine), Arc::new(EchoHandler)));
        let rpc = RpcContext {
            orchestrator,
            engine,
            push_config_store: Arc::new(PushConfigStore::new()),
        };
        let agent_card = AgentCard {
            name: "test-agent".to_string(),
            description: "test".to_string(),
            version: "0.1.0".to_string(),
            url: "http://localhost/tasks/send".to_string(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            skills: vec![],
            provider: None,
        };
        a2a_router(rpc, agent_card, CorsLayer::permissive())
    }

    #[tokio::test]
    async fn router_builds_without_panicking() {
        let _router = test_router();
    }
}
