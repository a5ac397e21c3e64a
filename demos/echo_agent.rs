//! A minimal echo agent: replies to every message with the same text,
//! completing the task synchronously.
//!
//! Run with:
//!
//! ```text
//! cargo run --example echo_agent --features server
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tower_http::cors::CorsLayer;

use a2a_core::builders::AgentCardBuilder;
use a2a_core::error::A2AResult;
use a2a_core::server::{
    a2a_router, InMemoryTaskStore, Orchestrator, PushConfigStore, RequestContext, RpcContext,
    SubscriberRegistry, TaskEngine, TaskHandler,
};
use a2a_core::types::{Message, Task, TaskState, TaskStatus, TaskUpdate};

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

#[tokio::main]
async fn main() -> A2AResult<()> {
    tracing_subscriber::fmt::init();

    let card = AgentCardBuilder::new("Echo Agent")
        .description("Replies with whatever it was sent")
        .version("1.0.0")
        .url("http://127.0.0.1:8080")
        .skill("echo", "Echo", "Repeats the input message back", vec!["demo".to_string()])
        .streaming(false)
        .build()?;

    let store = Arc::new(InMemoryTaskStore::new());
    let subscribers = Arc::new(SubscriberRegistry::new(a2a_core::config::SubscriberConfig::default()));
    let engine = Arc::new(TaskEngine::new(store, subscribers));
    let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&engine), Arc::new(EchoHandler)));

    let rpc = RpcContext {
        orchestrator,
        engine,
        push_config_store: Arc::new(PushConfigStore::new()),
    };

    let app = a2a_router(rpc, card, CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await.map_err(|e| a2a_core::error::A2AError::Other(e.to_string()))?;
    tracing::info!("echo agent listening on http://127.0.0.1:8080");
    axum::serve(listener, app)
        .await
        .map_err(|e| a2a_core::error::A2AError::Other(e.to_string()))?;

    Ok(())
}
