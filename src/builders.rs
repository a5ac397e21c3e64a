//! Builder patterns for ergonomic construction of A2A types.

use crate::types::*;

/// Builder for constructing [`AgentCard`] with sensible defaults.
///
/// ```
/// use a2a_core::builders::AgentCardBuilder;
///
/// let card = AgentCardBuilder::new("My Agent")
///     .description("An example agent")
///     .version("1.0.0")
///     .url("http://localhost:8080")
///     .skill("chat", "Chat", "Conversational AI", vec!["conversation".to_string()])
///     .streaming(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct AgentCardBuilder {
    name: String,
    description: String,
    version: String,
    url: String,
    capabilities: AgentCapabilities,
    default_input_modes: Vec<String>,
    default_output_modes: Vec<String>,
    skills: Vec<AgentSkill>,
    provider: Option<AgentProvider>,
}

impl AgentCardBuilder {
    /// Create a new builder with the agent's name. `description`, `version`,
    /// and `url` default to empty and must be set via their builder methods
    /// before [`build`](Self::build) to produce a valid card.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: String::new(),
            url: String::new(),
            capabilities: AgentCapabilities::default(),
            default_input_modes: vec!["text/plain".to_string()],
            default_output_modes: vec!["text/plain".to_string()],
            skills: Vec::new(),
            provider: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the version string.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the agent's base URL (the root every fixed operation path hangs off of).
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the provider/organization information.
    pub fn provider(mut self, organization: impl Into<String>, url: impl Into<String>) -> Self {
        self.provider = Some(AgentProvider {
            organization: organization.into(),
            url: url.into(),
        });
        self
    }

    /// Enable or disable streaming support (`tasks/sendSubscribe`).
    pub fn streaming(mut self, enabled: bool) -> Self {
        self.capabilities.streaming = Some(enabled);
        self
    }

    /// Enable or disable push-notification support.
    pub fn push_notifications(mut self, enabled: bool) -> Self {
        self.capabilities.push_notifications = Some(enabled);
        self
    }

    /// Add a skill to the agent card.
    pub fn skill(mut self, id: impl Into<String>, name: impl Into<String>, description: impl Into<String>, tags: Vec<String>) -> Self {
        self.skills.push(AgentSkill {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            tags,
        });
        self
    }

    /// Set the default input MIME types.
    pub fn input_modes(mut self, modes: Vec<String>) -> Self {
        self.default_input_modes = modes;
        self
    }

    /// Set the default output MIME types.
    pub fn output_modes(mut self, modes: Vec<String>) -> Self {
        self.default_output_modes = modes;
        self
    }

    /// Build the [`AgentCard`].
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::invalid_params`] if `description`, `version`, or
    /// `url` were never set.
    pub fn build(self) -> crate::A2AResult<AgentCard> {
        if self.description.is_empty() {
            return Err(crate::error::A2AError::invalid_params("agent card description is required"));
        }
        if self.version.is_empty() {
            return Err(crate::error::A2AError::invalid_params("agent card version is required"));
        }
        if self.url.is_empty() {
            return Err(crate::error::A2AError::invalid_params("agent card url is required"));
        }

        Ok(AgentCard {
            name: self.name,
            description: self.description,
            version: self.version,
            url: self.url,
            capabilities: self.capabilities,
            default_input_modes: self.default_input_modes,
            default_output_modes: self.default_output_modes,
            skills: self.skills,
            provider: self.provider,
        })
    }
}

/// Builder for constructing [`crate::client::A2AClient`] with custom configuration.
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use a2a_core::builders::ClientBuilder;
/// use std::time::Duration;
///
/// let client = ClientBuilder::new("http://localhost:7420")
///     .with_timeout(Duration::from_secs(30))
///     .build()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    url: String,
    timeout: Option<std::time::Duration>,
    headers: std::collections::HashMap<String, String>,
    auth: crate::client::AuthStrategy,
}

#[cfg(feature = "client")]
impl ClientBuilder {
    /// Create a new client builder for the given base URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: None,
            headers: std::collections::HashMap::new(),
            auth: crate::client::AuthStrategy::None,
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a custom HTTP header sent on every request.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Authenticate with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = crate::client::AuthStrategy::Bearer(token.into());
        self
    }

    /// Authenticate with an API key carried as a header.
    pub fn with_api_key_header(mut self, header_name: impl Into<String>, api_key: impl Into<String>) -> Self {
        self.auth = crate::client::AuthStrategy::ApiKey {
            key: api_key.into(),
            location: crate::client::ApiKeyLocation::Header(header_name.into()),
        };
        self
    }

    /// Build the client by resolving the agent card and creating the transport.
    ///
    /// Resolution is only used to confirm the agent's base URL; the
    /// transport is always built from this builder's own timeout, headers,
    /// and auth strategy rather than anything advertised by the card.
    pub async fn build(self) -> crate::A2AResult<crate::client::A2AClient> {
        use crate::client::{A2AClient, CardResolver, JsonRpcTransport, TransportConfig};

        let resolver = CardResolver::new();
        let card = resolver.resolve(&self.url).await?;

        let config = TransportConfig {
            timeout: self.timeout.unwrap_or(std::time::Duration::from_secs(60)),
            headers: self.headers,
        };
        let transport = JsonRpcTransport::with_config(card.url.clone(), config).with_auth(self.auth);

        Ok(A2AClient::with_transport(Box::new(transport)))
    }

    /// Build a client from a direct base URL (skips agent card resolution).
    pub fn build_from_endpoint(self) -> crate::client::A2AClient {
        use crate::client::{A2AClient, JsonRpcTransport, TransportConfig};

        let config = TransportConfig {
            timeout: self.timeout.unwrap_or(std::time::Duration::from_secs(60)),
            headers: self.headers,
        };
        let transport = JsonRpcTransport::with_config(&self.url, config).with_auth(self.auth);

        A2AClient::with_transport(Box::new(transport))
    }
}

/// Builder for constructing an A2A axum server with fluent configuration.
///
/// ```rust,ignore
/// use a2a_core::builders::ServerBuilder;
/// use a2a_core::server::TaskHandler;
/// use std::sync::Arc;
///
/// # async fn example(handler: Arc<dyn TaskHandler>) {
/// let app = ServerBuilder::new(handler)
///     .agent_card(|builder| {
///         builder
///             .description("Conversational agent")
///             .version("1.0.0")
///             .url("http://localhost:8080")
///             .streaming(true)
///     })
///     .cors(true)
///     .build()
///     .unwrap();
/// # }
/// ```
#[cfg(feature = "server")]
pub struct ServerBuilder {
    handler: std::sync::Arc<dyn crate::server::TaskHandler>,
    task_store: Option<std::sync::Arc<dyn crate::server::TaskStore>>,
    push_service: Option<std::sync::Arc<crate::server::PushService>>,
    agent_card: Option<AgentCard>,
    cors_enabled: bool,
}

#[cfg(feature = "server")]
impl ServerBuilder {
    /// Create a new server builder with the given task handler.
    pub fn new(handler: std::sync::Arc<dyn crate::server::TaskHandler>) -> Self {
        Self {
            handler,
            task_store: None,
            push_service: None,
            agent_card: None,
            cors_enabled: false,
        }
    }

    /// Set the task store implementation.
    pub fn task_store(mut self, store: std::sync::Arc<dyn crate::server::TaskStore>) -> Self {
        self.task_store = Some(store);
        self
    }

    /// Wire a push-notification service into the engine.
    pub fn push_service(mut self, push: std::sync::Arc<crate::server::PushService>) -> Self {
        self.push_service = Some(push);
        self
    }

    /// Configure the agent card using a builder callback.
    pub fn agent_card<F>(mut self, f: F) -> Self
    where
        F: FnOnce(AgentCardBuilder) -> AgentCardBuilder,
    {
        let builder = AgentCardBuilder::new("A2A Agent");
        self.agent_card = f(builder).build().ok();
        self
    }

    /// Set the agent card directly.
    pub fn agent_card_direct(mut self, card: AgentCard) -> Self {
        self.agent_card = Some(card);
        self
    }

    /// Enable or disable permissive CORS middleware.
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    /// Build the axum router.
    ///
    /// # Errors
    ///
    /// Returns an error if no agent card was configured and the default
    /// card fails to build (it never does — provided as a `Result` to
    /// leave room for future required fields).
    pub fn build(self) -> crate::A2AResult<axum::Router> {
        use crate::server::{a2a_router, InMemoryTaskStore, Orchestrator, PushConfigStore, RpcContext, SubscriberRegistry, TaskEngine};
        use std::sync::Arc;

        let store = self.task_store.unwrap_or_else(|| Arc::new(InMemoryTaskStore::new()));
        let subscribers = Arc::new(SubscriberRegistry::new(crate::config::SubscriberConfig::default()));

        let mut engine = TaskEngine::new(store, subscribers);
        if let Some(push) = self.push_service {
            engine = engine.with_push_notifier(push as Arc<dyn crate::server::PushNotifier>);
        }
        let engine = Arc::new(engine);

        let orchestrator = Arc::new(Orchestrator::new(Arc::clone(&engine), self.handler));
        let card = match self.agent_card {
            Some(card) => card,
            None => AgentCardBuilder::new("A2A Agent")
                .description("An A2A-compatible agent")
                .version("1.0.0")
                .url("http://localhost:8080")
                .build()?,
        };

        let rpc = RpcContext {
            orchestrator,
            engine,
            push_config_store: Arc::new(PushConfigStore::new()),
        };

        let cors = if self.cors_enabled {
            tower_http::cors::CorsLayer::permissive()
        } else {
            tower_http::cors::CorsLayer::new()
        };

        Ok(a2a_router(rpc, card, cors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_card_builder_requires_url() {
        let result = AgentCardBuilder::new("Test Agent").description("A test").version("1.0.0").build();
        assert!(result.is_err());
    }

    #[test]
    fn agent_card_builder_basic() {
        let card = AgentCardBuilder::new("Test Agent")
            .description("A test")
            .version("1.0.0")
            .url("http://localhost:8080")
            .build()
            .unwrap();

        assert_eq!(card.name, "Test Agent");
        assert_eq!(card.description, "A test");
        assert_eq!(card.version, "1.0.0");
        assert_eq!(card.url, "http://localhost:8080");
    }

    #[test]
    fn agent_card_builder_with_skills() {
        let card = AgentCardBuilder::new("Test")
            .description("Test")
            .version("1.0.0")
            .url("http://localhost")
            .skill("chat", "Chat", "Chat skill", vec!["conversation".to_string()])
            .skill("code", "Code", "Code generation", vec!["coding".to_string()])
            .build()
            .unwrap();

        assert_eq!(card.skills.len(), 2);
        assert_eq!(card.skills[0].id, "chat");
        assert_eq!(card.skills[1].id, "code");
    }

    #[test]
    fn agent_card_builder_with_capabilities() {
        let card = AgentCardBuilder::new("Test")
            .description("Test")
            .version("1.0.0")
            .url("http://localhost")
            .streaming(true)
            .push_notifications(false)
            .build()
            .unwrap();

        assert_eq!(card.capabilities.streaming, Some(true));
        assert_eq!(card.capabilities.push_notifications, Some(false));
    }

    #[cfg(feature = "client")]
    #[test]
    fn client_builder_basic() {
        let builder = ClientBuilder::new("http://localhost:8080")
            .with_timeout(std::time::Duration::from_secs(30))
            .with_bearer_token("test-token");

        assert_eq!(builder.url, "http://localhost:8080");
        assert_eq!(builder.timeout, Some(std::time::Duration::from_secs(30)));
    }
}
