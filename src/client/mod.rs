//! A2A client — call remote A2A agents.
//!
//! - [`A2AClient`] — high-level client with typed methods for every fixed
//!   A2A operation (`tasks/send`, `tasks/sendSubscribe`, `tasks/get`,
//!   `tasks/cancel`, `tasks/resubscribe`, `tasks/pushNotification/{set,get}`,
//!   `tasks/list`)
//! - [`CardResolver`] — discover agent cards via the well-known URL convention
//! - [`AuthStrategy`] — pluggable client authentication, applied uniformly
//! - [`Transport`] / [`JsonRpcTransport`] — pluggable transport layer
//! - [`SseStream`] — parsed SSE event stream for streaming responses
//!
//! # Quick start
//!
//! ```no_run
//! use a2a_core::client::{A2AClient, SendMessageResponse};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = A2AClient::from_url("http://localhost:7420").await?;
//!
//! let response = client.send_text("Hello, agent!").await?;
//! match response {
//!     SendMessageResponse::Task(task) => {
//!         println!("Task {} — status: {}", task.id, task.status.state);
//!     }
//! }
//!
//! let mut stream = client.send_text_stream("Write a haiku").await?;
//! while let Some(event) = stream.next().await {
//!     println!("{:?}", event?);
//! }
//! # Ok(())
//! # }
//! ```

mod a2a_client;
mod auth;
mod card_resolver;
mod sse;
mod transport;

pub use a2a_client::{create_text_message, A2AClient};
pub use auth::{ApiKeyLocation, AuthStrategy};
pub use card_resolver::CardResolver;
pub use crate::types::SendMessageResponse;
pub use sse::{SseStream, SseStreamAdapter};
pub use transport::{JsonRpcTransport, Transport, TransportConfig};
