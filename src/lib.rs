//! # a2a-core — Agent-to-Agent (A2A) protocol runtime
//!
//! A Rust implementation of the Agent-to-Agent protocol: JSON-RPC 2.0 over
//! HTTP with Server-Sent-Events streaming, a task-lifecycle engine, and
//! push-notification delivery.
//!
//! The protocol allows agents to:
//! - Send messages and receive task-based responses
//! - Stream real-time status and artifact updates via SSE
//! - Track a task's status through its lifecycle to a terminal state
//! - Cancel running tasks and list/query past tasks
//! - Register push-notification callbacks for asynchronous completion
//!
//! This crate provides:
//! - **Complete type definitions** for the task/message/artifact model
//!   ([`types`])
//! - **Client** for calling remote A2A agents ([`client::A2AClient`])
//! - **Server** framework for building A2A-compatible agents
//!   ([`server::TaskHandler`], [`server::TaskEngine`], [`server::Orchestrator`])
//! - **Ergonomic builders** for constructing agent cards, clients, and
//!   servers ([`AgentCardBuilder`], [`ClientBuilder`], [`ServerBuilder`])
//!
//! ## Feature flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `client` | yes     | HTTP client for calling A2A agents (reqwest + SSE) |
//! | `server` | yes     | Server traits + axum integration for building agents |
//! | `full`   | no      | Enable all features |
//!
//! ## Quick start: client
//!
//! ```no_run
//! use a2a_core::client::{A2AClient, SendMessageResponse};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = A2AClient::from_url("http://localhost:7420").await?;
//!
//!     let response = client.send_text("Write a haiku about Rust").await?;
//!     match response {
//!         SendMessageResponse::Task(task) => {
//!             println!("Task: {} (status: {})", task.id, task.status.state);
//!         }
//!     }
//!
//!     let mut stream = client.send_text_stream("Tell me a story").await?.into_stream();
//!     while let Some(event) = stream.next().await {
//!         println!("{:?}", event?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Quick start: server
//!
//! Implement [`server::TaskHandler`] to define your agent's behavior, then
//! wire it to a [`server::TaskEngine`] and [`server::Orchestrator`]:
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use a2a_core::server::*;
//! use a2a_core::types::{Message, Task, TaskState, TaskStatus, TaskUpdate};
//! use a2a_core::error::A2AResult;
//! use async_trait::async_trait;
//!
//! struct EchoAgent;
//!
//! #[async_trait]
//! impl TaskHandler for EchoAgent {
//!     async fn handle_task(
//!         &self,
//!         _ctx: &RequestContext,
//!         _task: &Task,
//!         message: &Message,
//!     ) -> A2AResult<TaskUpdate> {
//!         Ok(TaskUpdate::status_final(TaskStatus::with_message(
//!             TaskState::Completed,
//!             Message::agent_text(message.text()),
//!         )))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
//!     let subscribers = Arc::new(SubscriberRegistry::new(Default::default()));
//!     let engine = Arc::new(TaskEngine::new(store, subscribers));
//!     let orchestrator = Arc::new(Orchestrator::new(engine.clone(), Arc::new(EchoAgent)));
//!
//!     let agent_card = a2a_core::AgentCardBuilder::new("Echo Agent")
//!         .description("Echoes messages back")
//!         .version("1.0.0")
//!         .url("http://localhost:3000")
//!         .build()?;
//!
//!     let rpc = RpcContext {
//!         orchestrator,
//!         engine,
//!         push_config_store: Arc::new(PushConfigStore::new()),
//!     };
//!     let app = a2a_router(rpc, agent_card, tower_http::cors::CorsLayer::permissive());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! The server exposes the fixed HTTP surface documented on
//! [`server::axum_integration::a2a_router`]: `GET /.well-known/agent-card.json`
//! plus one `POST /tasks/...` route per operation.
//!
//! ## Architecture
//!
//! ### Client
//!
//! - [`client::A2AClient`] — typed methods for every A2A operation
//! - [`client::CardResolver`] — discovers agent cards from `/.well-known/agent-card.json`
//! - [`client::AuthStrategy`] — pluggable client authentication
//! - [`client::JsonRpcTransport`] — HTTP transport, one fixed path per method
//! - [`client::SseStream`] — parsed SSE event stream for streaming responses
//!
//! ### Server
//!
//! - [`server::TaskHandler`] — trait for implementing your agent's logic
//! - [`server::TaskEngine`] — task creation, update application, writer locking
//! - [`server::Orchestrator`] — invokes a handler, recovers from panics
//! - [`server::TaskStore`] / [`server::InMemoryTaskStore`] — task persistence
//! - [`server::SubscriberRegistry`] — per-task bounded-channel SSE fan-out
//! - [`server::push`] — rate-limited, retried push-notification delivery
//! - [`server::a2a_router`] — builds the axum `Router` exposing the A2A surface
//!
//! ### Core types
//!
//! - [`types::Task`] — an A2A task with status, history, and artifacts
//! - [`types::Message`] — a message with text/file/data parts
//! - [`types::Part`] — a content part (text, file, or structured data)
//! - [`types::TaskState`] — the closed task lifecycle state machine
//! - [`types::TaskUpdate`] — the single unit a handler emits
//! - [`types::StreamEvent`] — SSE event types (status, artifact, error, done)
//! - [`types::AgentCard`] — agent metadata and capabilities
//! - [`error::A2AError`] — error types with JSON-RPC error codes

pub mod builders;
pub mod config;
pub mod error;
pub mod types;
pub mod utils;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "server")]
pub mod server;

/// Prelude module that re-exports commonly used types and traits.
///
/// ```
/// use a2a_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::types::{
        AgentCapabilities, AgentCard, AgentSkill, Artifact, FileContent, Message, Part, Role,
        SendMessageConfiguration, SendMessageParams, StreamEvent, Task, TaskState, TaskStatus, TaskUpdate,
    };

    pub use crate::error::{A2AError, A2AResult};

    pub use crate::builders::AgentCardBuilder;

    #[cfg(feature = "client")]
    pub use crate::builders::ClientBuilder;

    #[cfg(feature = "client")]
    pub use crate::client::A2AClient;

    #[cfg(feature = "server")]
    pub use crate::builders::ServerBuilder;

    #[cfg(feature = "server")]
    pub use crate::server::{
        a2a_router, InMemoryTaskStore, Orchestrator, PushConfigStore, PushService, RequestContext, SubscriberRegistry,
        TaskEngine, TaskHandler, TaskStore,
    };
}

pub use builders::AgentCardBuilder;
pub use error::{A2AError, A2AResult};
pub use types::*;

#[cfg(feature = "client")]
pub use builders::ClientBuilder;

#[cfg(feature = "server")]
pub use builders::ServerBuilder;
