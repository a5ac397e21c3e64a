//! Transport layer for A2A client communication.
//!
//! [`JsonRpcTransport`] is the standard JSON-RPC-over-HTTP binding: each
//! method is POSTed to its own fixed path (mirroring the server's routing in
//! [`crate::server::axum_integration`]), with the configured
//! [`AuthStrategy`] applied uniformly to both the plain JSON-RPC call and
//! the SSE streaming call.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::client::auth::AuthStrategy;
use crate::error::{A2AError, A2AResult};
use crate::types::{JsonRpcRequest, JsonRpcResponse};

use super::sse::SseStream;

/// Transport abstraction for A2A communication.
///
/// Implementations handle the low-level details of sending JSON-RPC
/// requests and receiving responses (or SSE streams) over a particular
/// protocol binding.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON-RPC request and receive a JSON-RPC response.
    async fn send(&self, request: &JsonRpcRequest) -> A2AResult<JsonRpcResponse>;

    /// Send a JSON-RPC request and receive an SSE event stream.
    async fn send_stream(&self, request: &JsonRpcRequest) -> A2AResult<SseStream>;

    /// Close the transport and release any held resources. No-op by
    /// default; override if the transport holds persistent resources.
    async fn close(&self) -> A2AResult<()> {
        Ok(())
    }
}

/// Configuration for [`JsonRpcTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout. Defaults to 60 seconds.
    pub timeout: Duration,
    /// Additional HTTP headers to include on every request.
    pub headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            headers: HashMap::new(),
        }
    }
}

/// Map a JSON-RPC method name onto its fixed HTTP path, per the server's
/// routing table.
fn path_for_method(method: &str) -> A2AResult<&'static str> {
    Ok(match method {
        "tasks/send" => "/tasks/send",
        "tasks/sendSubscribe" => "/tasks/sendSubscribe",
        "tasks/get" => "/tasks/get",
        "tasks/cancel" => "/tasks/cancel",
        "tasks/resubscribe" => "/tasks/resubscribe",
        "tasks/pushNotification/set" => "/tasks/pushNotification/set",
        "tasks/pushNotification/get" => "/tasks/pushNotification/get",
        "tasks/list" => "/tasks/list",
        other => return Err(A2AError::method_not_found(other)),
    })
}

/// JSON-RPC over HTTP transport using `reqwest`.
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    base_url: String,
    auth: AuthStrategy,
}

impl JsonRpcTransport {
    /// Create a new transport targeting the given A2A agent's base URL
    /// (e.g. `https://agent.example.com`), with default configuration and
    /// no authentication.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, TransportConfig::default())
    }

    /// Create a new transport with custom configuration.
    pub fn with_config(base_url: impl Into<String>, config: TransportConfig) -> Self {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (HeaderName::from_bytes(key.as_bytes()), HeaderValue::from_str(value)) {
                default_headers.insert(name, val);
            }
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into(),
            auth: AuthStrategy::None,
        }
    }

    /// Create a new transport with an existing `reqwest::Client`.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            auth: AuthStrategy::None,
        }
    }

    /// Attach an authentication strategy, applied to every request.
    pub fn with_auth(mut self, auth: AuthStrategy) -> Self {
        self.auth = auth;
        self
    }

    /// The base URL this transport sends requests to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, method: &str) -> A2AResult<String> {
        let path = path_for_method(method)?;
        Ok(format!("{}{}", self.base_url.trim_end_matches('/'), path))
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn send(&self, request: &JsonRpcRequest) -> A2AResult<JsonRpcResponse> {
        let url = self.url_for(&request.method)?;
        let builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request);
        let builder = self.auth.apply(builder);

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                A2AError::Timeout(format!("request timed out: {e}"))
            } else if e.is_connect() {
                A2AError::Transport(format!("connection failed: {e}"))
            } else {
                A2AError::Transport(format!("HTTP request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(A2AError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| A2AError::Transport(format!("failed to read response body: {e}")))?;

        serde_json::from_slice(&bytes).map_err(|e| A2AError::InvalidJson(format!("failed to parse JSON-RPC response: {e}")))
    }

    async fn send_stream(&self, request: &JsonRpcRequest) -> A2AResult<SseStream> {
        let url = self.url_for(&request.method)?;
        let builder = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "text/event-stream")
            .json(request);
        let builder = self.auth.apply(builder);

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                A2AError::Timeout(format!("stream request timed out: {e}"))
            } else if e.is_connect() {
                A2AError::Transport(format!("stream connection failed: {e}"))
            } else {
                A2AError::Transport(format!("stream HTTP request failed: {e}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(A2AError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        Ok(SseStream::from_response(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_for_maps_known_methods() {
        let transport = JsonRpcTransport::new("https://agent.example.com");
        assert_eq!(
            transport.url_for("tasks/send").unwrap(),
            "https://agent.example.com/tasks/send"
        );
        assert_eq!(
            transport.url_for("tasks/pushNotification/get").unwrap(),
            "https://agent.example.com/tasks/pushNotification/get"
        );
    }

    #[test]
    fn url_for_trims_trailing_slash_on_base() {
        let transport = JsonRpcTransport::new("https://agent.example.com/");
        assert_eq!(
            transport.url_for("tasks/get").unwrap(),
            "https://agent.example.com/tasks/get"
        );
    }

    #[test]
    fn url_for_rejects_unknown_method() {
        let transport = JsonRpcTransport::new("https://agent.example.com");
        assert!(transport.url_for("bogus/method").is_err());
    }
}
