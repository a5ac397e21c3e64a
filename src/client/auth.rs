//! Client-side authentication strategies, applied uniformly to both the
//! JSON-RPC POST calls and the SSE streaming calls.

use reqwest::RequestBuilder;

/// Where an API key credential is carried.
#[derive(Debug, Clone)]
pub enum ApiKeyLocation {
    /// Sent as an HTTP header with the given name.
    Header(String),
    /// Sent as a URL query parameter with the given name.
    Query(String),
}

/// A pluggable authentication strategy applied to every outbound client
/// request (both the JSON-RPC POST and the SSE GET/POST).
#[derive(Debug, Clone)]
pub enum AuthStrategy {
    /// No authentication.
    None,
    /// `Authorization: Bearer <token>`.
    Bearer(String),
    /// An API key, sent either as a header or a query parameter.
    ApiKey { key: String, location: ApiKeyLocation },
    /// HTTP Basic authentication.
    Basic { username: String, password: Option<String> },
}

impl AuthStrategy {
    /// Apply this strategy to an in-flight request builder.
    pub fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            AuthStrategy::None => builder,
            AuthStrategy::Bearer(token) => builder.bearer_auth(token),
            AuthStrategy::ApiKey { key, location } => match location {
                ApiKeyLocation::Header(name) => builder.header(name, key),
                ApiKeyLocation::Query(name) => builder.query(&[(name, key)]),
            },
            AuthStrategy::Basic { username, password } => builder.basic_auth(username, password.as_deref()),
        }
    }
}

impl Default for AuthStrategy {
    fn default() -> Self {
        AuthStrategy::None
    }
}
