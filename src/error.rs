//! A2A error types — JSON-RPC error codes + A2A domain errors.
//!
//! Covers the closed error taxonomy of the protocol: standard JSON-RPC 2.0
//! framing errors (-32700 through -32603), A2A domain errors (-32001 through
//! -32004), and authentication errors (-32010 through -32012). Also carries
//! transport/client-side error variants needed for a complete SDK, which map
//! to -32603 at the wire boundary since they never originate from a request.

use crate::types::JsonRpcError;

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes
// ---------------------------------------------------------------------------

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i64 = -32700;

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i64 = -32600;

/// The method does not exist / is not available.
pub const METHOD_NOT_FOUND: i64 = -32601;

/// Invalid method parameter(s).
pub const INVALID_PARAMS: i64 = -32602;

/// Internal JSON-RPC error.
pub const INTERNAL_ERROR: i64 = -32603;

// ---------------------------------------------------------------------------
// A2A domain error codes
// ---------------------------------------------------------------------------

/// The requested task was not found.
pub const TASK_NOT_FOUND: i64 = -32001;

/// The task cannot be canceled in its current state.
pub const TASK_NOT_CANCELABLE: i64 = -32002;

/// Push notifications are not supported by this agent.
pub const PUSH_NOTIFICATION_NOT_SUPPORTED: i64 = -32003;

/// The requested operation is not supported.
pub const UNSUPPORTED_OPERATION: i64 = -32004;

// ---------------------------------------------------------------------------
// Authentication error codes
// ---------------------------------------------------------------------------

/// The request requires authentication that was not provided.
pub const AUTHENTICATION_REQUIRED: i64 = -32010;

/// The provided authentication credentials were rejected.
pub const AUTHENTICATION_FAILED: i64 = -32011;

/// The caller is authenticated but lacks permission for this operation.
pub const PERMISSION_DENIED: i64 = -32012;

// ---------------------------------------------------------------------------
// A2AError enum
// ---------------------------------------------------------------------------

/// Unified error type for all A2A and JSON-RPC errors.
///
/// Each protocol/domain variant carries a human-readable message and an
/// optional structured data payload, mirroring the JSON-RPC error object
/// shape `{ code, message, data? }`.
///
/// Also includes transport/client-side error variants that are not part of
/// the wire taxonomy but are needed for a complete Rust client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum A2AError {
    // -- Protocol framing errors --
    /// Invalid JSON payload (code -32700).
    #[error("Parse error: {message}")]
    ParseError {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data (e.g. parse error details).
        data: Option<serde_json::Value>,
    },

    /// Request payload validation error (code -32600).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data (e.g. validation errors).
        data: Option<serde_json::Value>,
    },

    /// Method not found (code -32601).
    #[error("Method not found: {message}")]
    MethodNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Invalid parameters (code -32602).
    #[error("Invalid params: {message}")]
    InvalidParams {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data (e.g. validation errors).
        data: Option<serde_json::Value>,
    },

    /// Internal error (code -32603).
    #[error("Internal error: {message}")]
    InternalError {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    // -- Domain errors --
    /// Task not found (code -32001).
    #[error("Task not found: {message}")]
    TaskNotFound {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Task cannot be canceled (code -32002).
    #[error("Task not cancelable: {message}")]
    TaskNotCancelable {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Push notifications not supported (code -32003).
    #[error("Push notification not supported: {message}")]
    PushNotificationNotSupported {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// Operation not supported (code -32004).
    #[error("Unsupported operation: {message}")]
    UnsupportedOperation {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    // -- Authentication errors --
    /// Authentication is required but was not provided (code -32010).
    #[error("Authentication required: {message}")]
    AuthenticationRequired {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// The provided authentication credentials were rejected (code -32011).
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// The caller is authenticated but lacks permission (code -32012).
    #[error("Permission denied: {message}")]
    PermissionDenied {
        /// Human-readable error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    // -- Client/transport-side errors (not part of the wire taxonomy) --
    /// Transport-level error (connection failed, request failed, etc.).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request or stream timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error with status code and response body.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// Invalid JSON received from remote (parse or deserialization failure).
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// A JSON-RPC error response was received from the remote agent.
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc {
        /// JSON-RPC error code.
        code: i64,
        /// Error message.
        message: String,
        /// Optional structured error data.
        data: Option<serde_json::Value>,
    },

    /// The client has been closed; no further operations are possible.
    #[error("Client closed")]
    ClientClosed,

    /// Catch-all for errors that don't fit other categories.
    #[error("{0}")]
    Other(String),
}

/// Convenience result type for A2A operations.
pub type A2AResult<T> = Result<T, A2AError>;

macro_rules! data_variant_ctor {
    ($(#[$meta:meta])* $name:ident => $variant:ident) => {
        $(#[$meta])*
        pub fn $name(message: impl Into<String>) -> Self {
            Self::$variant {
                message: message.into(),
                data: None,
            }
        }
    };
}

impl A2AError {
    data_variant_ctor!(
        /// Create a `ParseError` with a message and no data.
        parse_error => ParseError
    );
    data_variant_ctor!(
        /// Create an `InvalidRequest` with a message and no data.
        invalid_request => InvalidRequest
    );
    data_variant_ctor!(
        /// Create a `MethodNotFound` with a message and no data.
        method_not_found => MethodNotFound
    );
    data_variant_ctor!(
        /// Create an `InvalidParams` with a message and no data.
        invalid_params => InvalidParams
    );
    data_variant_ctor!(
        /// Create an `InternalError` with a message and no data.
        internal_error => InternalError
    );
    data_variant_ctor!(
        /// Create a `TaskNotFound` with a message and no data.
        task_not_found => TaskNotFound
    );
    data_variant_ctor!(
        /// Create a `TaskNotCancelable` with a message and no data.
        task_not_cancelable => TaskNotCancelable
    );
    data_variant_ctor!(
        /// Create a `PushNotificationNotSupported` with a message and no data.
        push_notification_not_supported => PushNotificationNotSupported
    );
    data_variant_ctor!(
        /// Create an `UnsupportedOperation` with a message and no data.
        unsupported_operation => UnsupportedOperation
    );
    data_variant_ctor!(
        /// Create an `AuthenticationRequired` with a message and no data.
        authentication_required => AuthenticationRequired
    );
    data_variant_ctor!(
        /// Create an `AuthenticationFailed` with a message and no data.
        authentication_failed => AuthenticationFailed
    );
    data_variant_ctor!(
        /// Create a `PermissionDenied` with a message and no data.
        permission_denied => PermissionDenied
    );

    /// Returns the JSON-RPC error code for this error variant.
    ///
    /// For transport/client-side errors that don't map to a wire code,
    /// returns -32603 (internal error).
    pub fn code(&self) -> i64 {
        match self {
            A2AError::ParseError { .. } => PARSE_ERROR,
            A2AError::InvalidRequest { .. } => INVALID_REQUEST,
            A2AError::MethodNotFound { .. } => METHOD_NOT_FOUND,
            A2AError::InvalidParams { .. } => INVALID_PARAMS,
            A2AError::InternalError { .. } => INTERNAL_ERROR,
            A2AError::TaskNotFound { .. } => TASK_NOT_FOUND,
            A2AError::TaskNotCancelable { .. } => TASK_NOT_CANCELABLE,
            A2AError::PushNotificationNotSupported { .. } => PUSH_NOTIFICATION_NOT_SUPPORTED,
            A2AError::UnsupportedOperation { .. } => UNSUPPORTED_OPERATION,
            A2AError::AuthenticationRequired { .. } => AUTHENTICATION_REQUIRED,
            A2AError::AuthenticationFailed { .. } => AUTHENTICATION_FAILED,
            A2AError::PermissionDenied { .. } => PERMISSION_DENIED,
            // Client/transport errors map to internal error.
            A2AError::Transport(_)
            | A2AError::Timeout(_)
            | A2AError::Http { .. }
            | A2AError::InvalidJson(_)
            | A2AError::ClientClosed
            | A2AError::Other(_) => INTERNAL_ERROR,
            A2AError::JsonRpc { code, .. } => *code,
        }
    }

    /// Returns the HTTP status that should accompany this error when it
    /// is not carried purely inside a 200-OK JSON-RPC envelope (used by
    /// the axum façade for auth failures specifically, per the wire spec).
    pub fn http_status(&self) -> u16 {
        match self {
            A2AError::AuthenticationRequired { .. } => 401,
            A2AError::AuthenticationFailed { .. } => 401,
            A2AError::PermissionDenied { .. } => 403,
            A2AError::InternalError { .. } => 500,
            _ => 200,
        }
    }

    /// Returns the default human-readable message for this error variant.
    pub fn default_message(&self) -> &str {
        match self {
            A2AError::ParseError { .. } => "Invalid JSON payload",
            A2AError::InvalidRequest { .. } => "Request payload validation error",
            A2AError::MethodNotFound { .. } => "Method not found",
            A2AError::InvalidParams { .. } => "Invalid parameters",
            A2AError::InternalError { .. } => "Internal error",
            A2AError::TaskNotFound { .. } => "Task not found",
            A2AError::TaskNotCancelable { .. } => "Task cannot be canceled",
            A2AError::PushNotificationNotSupported { .. } => "Push notification is not supported",
            A2AError::UnsupportedOperation { .. } => "This operation is not supported",
            A2AError::AuthenticationRequired { .. } => "Authentication required",
            A2AError::AuthenticationFailed { .. } => "Authentication failed",
            A2AError::PermissionDenied { .. } => "Permission denied",
            A2AError::Transport(_) => "Transport error",
            A2AError::Timeout(_) => "Request timed out",
            A2AError::Http { .. } => "HTTP error",
            A2AError::InvalidJson(_) => "Invalid JSON",
            A2AError::JsonRpc { .. } => "JSON-RPC error",
            A2AError::ClientClosed => "Client closed",
            A2AError::Other(_) => "Error",
        }
    }
}

impl From<A2AError> for JsonRpcError {
    fn from(err: A2AError) -> Self {
        let code = err.code();
        let message = err.to_string();
        // Preserve structured data from protocol/domain error variants and JsonRpc.
        let data = match &err {
            A2AError::ParseError { data, .. }
            | A2AError::InvalidRequest { data, .. }
            | A2AError::MethodNotFound { data, .. }
            | A2AError::InvalidParams { data, .. }
            | A2AError::InternalError { data, .. }
            | A2AError::TaskNotFound { data, .. }
            | A2AError::TaskNotCancelable { data, .. }
            | A2AError::PushNotificationNotSupported { data, .. }
            | A2AError::UnsupportedOperation { data, .. }
            | A2AError::AuthenticationRequired { data, .. }
            | A2AError::AuthenticationFailed { data, .. }
            | A2AError::PermissionDenied { data, .. }
            | A2AError::JsonRpc { data, .. } => data.clone(),
            _ => None,
        };
        JsonRpcError {
            code,
            message,
            data,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::ParseError {
            message: err.to_string(),
            data: None,
        }
    }
}
