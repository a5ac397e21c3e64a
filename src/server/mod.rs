//! A2A server framework — traits and implementations for building A2A agents.
//!
//! - [`TaskHandler`] trait — implement your agent logic
//! - [`RequestContext`] — per-request context (session, metadata)
//! - [`TaskStore`] trait + [`InMemoryTaskStore`] — task persistence
//! - [`SubscriberRegistry`] — per-task bounded-channel fan-out for SSE
//! - [`TaskEngine`] — task creation, update application, cancellation
//! - [`Orchestrator`] — invokes a handler and applies its update(s), with
//!   panic recovery
//! - [`push`] — rate-limited, retried push-notification delivery
//! - [`rpc_router`] / [`axum_integration`] — JSON-RPC dispatch + HTTP routes
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use a2a_core::server::*;
//! use a2a_core::types::{Message, Task, TaskUpdate, TaskStatus, TaskState};
//!
//! struct EchoAgent;
//!
//! #[async_trait::async_trait]
//! impl TaskHandler for EchoAgent {
//!     async fn handle_task(&self, _ctx: &RequestContext, _task: &Task, message: &Message)
//!         -> a2a_core::A2AResult<TaskUpdate>
//!     {
//!         Ok(TaskUpdate::status_final(TaskStatus::with_message(
//!             TaskState::Completed,
//!             Message::agent_text(message.text()),
//!         )))
//!     }
//! }
//!
//! let store: Arc<dyn TaskStore> = Arc::new(InMemoryTaskStore::new());
//! let subscribers = Arc::new(SubscriberRegistry::new(Default::default()));
//! let engine = Arc::new(TaskEngine::new(store, subscribers));
//! let orchestrator = Arc::new(Orchestrator::new(engine.clone(), Arc::new(EchoAgent)));
//! ```

pub mod axum_integration;
pub mod handler;
pub mod orchestrator;
pub mod push;
pub mod rpc_router;
pub mod sse_streamer;
pub mod subscriber_registry;
pub mod task_engine;
pub mod task_store;

pub use crate::types::SendMessageResponse;
pub use axum_integration::a2a_router;
pub use handler::{RequestContext, TaskHandler};
pub use orchestrator::Orchestrator;
pub use push::{PushConfigStore, PushService};
pub use rpc_router::{dispatch, RpcContext};
pub use subscriber_registry::{SubscriberRegistry, Subscription};
pub use task_engine::{PushNotifier, TaskEngine};
pub use task_store::{InMemoryTaskStore, TaskListParams, TaskStore};
