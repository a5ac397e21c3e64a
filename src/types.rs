//! Core A2A wire types: tasks, messages, parts, artifacts, and the JSON-RPC
//! envelope.
//!
//! All types serialize with `camelCase` field names and ISO-8601 UTC
//! timestamps, matching the wire contract in full.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Role & TaskState
// ============================================================================

/// Who sent a [`Message`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user / client.
    User,
    /// Message from the agent / server.
    Agent,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Agent => write!(f, "agent"),
        }
    }
}

/// The lifecycle state of a [`Task`].
///
/// Closed enumeration — exactly the six states below, with `Completed`,
/// `Failed`, and `Canceled` forming the terminal set. See
/// [`TaskState::is_terminal`] and [`TaskState::can_transition_to`] for the
/// allowed state-machine edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received but not yet started.
    Submitted,
    /// Task is actively being processed.
    Working,
    /// Task requires additional input from the user.
    InputRequired,
    /// Task completed successfully.
    Completed,
    /// Task failed.
    Failed,
    /// Task was canceled.
    Canceled,
}

impl TaskState {
    /// Whether this state is one of the terminal states (`completed`,
    /// `failed`, `canceled`) — once reached, no further transitions occur.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Completed | TaskState::Failed | TaskState::Canceled)
    }

    /// Whether transitioning from `self` to `next` is an allowed edge in the
    /// task state machine.
    ///
    /// ```text
    /// submitted      -> working, canceled
    /// working        -> input-required, completed, failed, canceled
    /// input-required -> working, canceled, failed
    /// completed/failed/canceled -> (none; terminal)
    /// ```
    pub fn can_transition_to(self, next: TaskState) -> bool {
        use TaskState::*;
        match self {
            Submitted => matches!(next, Working | Canceled),
            Working => matches!(next, InputRequired | Completed | Failed | Canceled),
            InputRequired => matches!(next, Working | Canceled | Failed),
            Completed | Failed | Canceled => false,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
        };
        write!(f, "{s}")
    }
}

// ============================================================================
// Task
// ============================================================================

/// Current status of a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatus {
    /// The current state.
    pub state: TaskState,

    /// Optional message associated with this status (e.g. a failure reason
    /// surfaced through the agent's own `Message` model).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    /// ISO-8601 UTC timestamp of when this status was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TaskStatus {
    /// Construct a status in the given state with no message, timestamped now.
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: Some(Utc::now()),
        }
    }

    /// Construct a status in the given state carrying a status message.
    pub fn with_message(state: TaskState, message: Message) -> Self {
        Self {
            state,
            message: Some(message),
            timestamp: Some(Utc::now()),
        }
    }
}

/// A task — the primary unit of work in the A2A protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique, server-assigned task identifier. Immutable after creation.
    pub id: String,

    /// Optional session identifier grouping related tasks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Current task status.
    pub status: TaskStatus,

    /// Chronological message history for this task. Append-only during
    /// normal operation.
    #[serde(default)]
    pub history: Vec<Message>,

    /// Artifacts produced by the task. Indices are dense: `artifacts[i].index
    /// == i`.
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,

    /// When the task was created. Immutable.
    pub created_at: DateTime<Utc>,

    /// When the task was last mutated. Monotonic non-decreasing.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Construct a fresh task in the `submitted` state.
    pub fn new(id: impl Into<String>, session_id: Option<String>, metadata: Option<serde_json::Value>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            session_id,
            status: TaskStatus::new(TaskState::Submitted),
            history: Vec::new(),
            artifacts: Vec::new(),
            metadata,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns a copy of this task with `history` truncated to the last
    /// `n` messages. View-layer only — does not mutate the stored task.
    /// (Resolves the spec's Open Question: history truncation never bounds
    /// storage, only the returned snapshot.)
    pub fn with_truncated_history(&self, n: Option<usize>) -> Task {
        let mut snapshot = self.clone();
        if let Some(n) = n {
            if snapshot.history.len() > n {
                let start = snapshot.history.len() - n;
                snapshot.history = snapshot.history[start..].to_vec();
            }
        }
        snapshot
    }
}

// ============================================================================
// Message & Parts
// ============================================================================

/// A single message in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique message identifier.
    #[serde(default = "new_message_id")]
    pub message_id: String,

    /// Who sent this message.
    pub role: Role,

    /// Content parts of the message.
    pub parts: Vec<Part>,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

fn new_message_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Message {
    /// Construct a user message from a single text part.
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            message_id: new_message_id(),
            role: Role::User,
            parts: vec![Part::Text {
                text: text.into(),
                metadata: None,
            }],
            metadata: None,
        }
    }

    /// Construct an agent message from a single text part.
    pub fn agent_text(text: impl Into<String>) -> Self {
        Self {
            message_id: new_message_id(),
            role: Role::Agent,
            parts: vec![Part::Text {
                text: text.into(),
                metadata: None,
            }],
            metadata: None,
        }
    }

    /// Concatenate the text of every `Part::Text` in this message.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                Part::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// File content — either inline base64 bytes or a URI reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    /// File with inline base64-encoded bytes.
    Bytes {
        /// Base64-encoded file content.
        bytes: String,
        /// Optional file name.
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// MIME type of the file.
        #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
        mime_type: Option<String>,
    },
    /// File referenced by URI.
    Uri {
        /// URI pointing to the file content.
        uri: String,
        /// Optional file name.
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// MIME type of the file.
        #[serde(skip_serializing_if = "Option::is_none", rename = "mimeType")]
        mime_type: Option<String>,
    },
}

/// A content part within a message or artifact.
///
/// Discriminated by the `type` field, per the wire contract:
/// - Text: `{"type": "text", "text": "hello"}`
/// - File: `{"type": "file", "file": {"bytes": "...", "mimeType": "..."}}`
/// - Data: `{"type": "data", "data": {"key": "value"}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Part {
    /// A text content part. Discriminator: `"text"`.
    #[serde(rename = "text")]
    Text {
        /// The text content.
        text: String,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    /// A file content part. Discriminator: `"file"`.
    #[serde(rename = "file")]
    File {
        /// The file content (bytes or URI).
        file: FileContent,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
    /// A structured data content part. Discriminator: `"data"`.
    #[serde(rename = "data")]
    Data {
        /// Arbitrary structured data.
        data: serde_json::Value,
        /// Optional metadata associated with this part.
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Value>,
    },
}

/// An artifact produced by a task.
///
/// `index` and `append`/`last_chunk` are carried on the artifact itself
/// (not only on a transient update event) so that stored artifacts satisfy
/// the density invariant directly: the n-th artifact in `Task::artifacts`
/// has `index == n`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Human-readable name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description of the artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Content parts of the artifact.
    pub parts: Vec<Part>,

    /// Position of this artifact in the task's artifact array.
    pub index: usize,

    /// Whether this artifact's parts were appended onto a prior chunk.
    #[serde(default)]
    pub append: bool,

    /// Whether this is the last chunk of a streamed artifact.
    #[serde(default)]
    pub last_chunk: bool,

    /// Arbitrary metadata.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

// ============================================================================
// TaskUpdate — the unit a handler emits
// ============================================================================

/// The unit of progress a [`crate::server::TaskHandler`] emits to drive a
/// task forward. Any subset of fields may be present; `applyUpdate` in the
/// task engine interprets each independently.
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    /// Replace the task's status, if present.
    pub status: Option<TaskStatus>,
    /// Append this message to the task's history, if present.
    pub message: Option<Message>,
    /// Merge or append this artifact, if present (see `append` on the
    /// artifact itself for concatenation semantics).
    pub artifact: Option<Artifact>,
    /// Merge these keys into the task's metadata, key-by-key.
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
    /// Whether this is the final update for the task.
    pub r#final: bool,
}

impl TaskUpdate {
    /// A status-only update.
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// A status-only update marked as final.
    pub fn status_final(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            r#final: true,
            ..Default::default()
        }
    }

    /// An artifact-only update.
    pub fn artifact(artifact: Artifact) -> Self {
        Self {
            artifact: Some(artifact),
            ..Default::default()
        }
    }

    /// A message-only update (e.g. an agent reply appended to history).
    pub fn message(message: Message) -> Self {
        Self {
            message: Some(message),
            ..Default::default()
        }
    }

    /// Mark this update as final.
    pub fn with_final(mut self, is_final: bool) -> Self {
        self.r#final = is_final;
        self
    }
}

// ============================================================================
// Streaming events (server -> SSE wire)
// ============================================================================

/// The `event:` discriminator for an SSE record emitted by the streamer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseEventType {
    /// `task-status`
    TaskStatus,
    /// `artifact`
    Artifact,
    /// `error`
    Error,
    /// `done`
    Done,
}

impl SseEventType {
    /// The literal `event:` field value on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            SseEventType::TaskStatus => "task-status",
            SseEventType::Artifact => "artifact",
            SseEventType::Error => "error",
            SseEventType::Done => "done",
        }
    }
}

/// A task status event payload (SSE `event: task-status`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusPayload {
    /// ID of the task whose status changed.
    pub task_id: String,
    /// The new status.
    pub status: TaskStatus,
    /// Whether this is the final status update for the task.
    pub r#final: bool,
}

/// An artifact event payload (SSE `event: artifact`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPayload {
    /// ID of the task that produced the artifact.
    pub task_id: String,
    /// The artifact (already assembled per `applyUpdate`'s append rules).
    pub artifact: Artifact,
}

/// An error event payload (SSE `event: error`), emitted when a handler
/// error occurs on an active stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// ID of the task the error pertains to.
    pub task_id: String,
    /// Human-readable error message.
    pub message: String,
}

/// A done event payload (SSE `event: done`) carrying the final task snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonePayload {
    /// The final task snapshot.
    pub task: Task,
}

/// A client-side parsed SSE event, returned from `sendMessageStream` /
/// `resubscribe`. Also used server-side as the unit broadcast to
/// subscribers of a task's event stream.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// `task-status`
    TaskStatus(TaskStatusPayload),
    /// `artifact`
    Artifact(ArtifactPayload),
    /// `error`
    Error(ErrorPayload),
    /// `done` — terminal; no further events follow.
    Done(DonePayload),
}

// ============================================================================
// Push notifications
// ============================================================================

/// Configuration for push notification delivery for a single task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushNotificationConfig {
    /// URL to deliver notifications to.
    pub url: String,

    /// Bearer token to send as `Authorization: Bearer <token>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Raw credential header value, used when no bearer token is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
}

/// A task's push notification configuration, as stored/retrieved via
/// `tasks/pushNotification/{set,get}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPushNotificationConfig {
    /// Task this config applies to.
    pub task_id: String,
    /// The push notification configuration details.
    pub push_notification_config: PushNotificationConfig,
}

/// The event kind a push notification describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PushEventKind {
    /// Task status change.
    TaskStatus,
    /// Artifact produced/updated.
    Artifact,
}

/// The payload delivered as the JSON body of a push notification HTTP POST.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushNotificationPayload {
    /// ID of the task this notification concerns.
    pub task_id: String,
    /// The kind of event.
    pub event: PushEventKind,
    /// The full task snapshot, when the event warrants it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    /// The status, for `task-status` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// The artifact, for `artifact` events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
    /// When this notification was generated.
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// JSON-RPC envelope
// ============================================================================

/// A JSON-RPC 2.0 request identifier: string, number, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// String identifier.
    String(String),
    /// Numeric identifier.
    Number(i64),
    /// Null (notification — no response expected).
    Null,
}

impl fmt::Display for JsonRpcId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonRpcId::String(s) => write!(f, "{s}"),
            JsonRpcId::Number(n) => write!(f, "{n}"),
            JsonRpcId::Null => write!(f, "null"),
        }
    }
}

impl From<String> for JsonRpcId {
    fn from(s: String) -> Self {
        JsonRpcId::String(s)
    }
}

impl From<&str> for JsonRpcId {
    fn from(s: &str) -> Self {
        JsonRpcId::String(s.to_string())
    }
}

impl From<i64> for JsonRpcId {
    fn from(n: i64) -> Self {
        JsonRpcId::Number(n)
    }
}

/// A JSON-RPC 2.0 request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcRequest {
    /// Protocol version — must be exactly `"2.0"`.
    pub jsonrpc: String,

    /// Request identifier. Echoed verbatim on the response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,

    /// Method name (e.g. `"tasks/send"`).
    pub method: String,

    /// Method parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Value>,
}

impl JsonRpcRequest {
    /// Construct a new request with `jsonrpc: "2.0"`.
    pub fn new(id: impl Into<JsonRpcId>, method: impl Into<String>, params: Option<serde_json::Value>) -> Self {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(id.into()),
            method: method.into(),
            params,
        }
    }
}

/// A JSON-RPC 2.0 response envelope. Exactly one of `result`/`error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcResponse {
    /// Protocol version — always `"2.0"`.
    pub jsonrpc: String,

    /// Request identifier this response corresponds to. `null` if the
    /// request itself could not be parsed.
    pub id: Option<JsonRpcId>,

    /// Successful result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    /// Error result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Create a successful JSON-RPC response.
    pub fn success(id: Option<JsonRpcId>, result: serde_json::Value) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error JSON-RPC response.
    pub fn error(id: Option<JsonRpcId>, error: JsonRpcError) -> Self {
        JsonRpcResponse {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// Create a JSON-RPC error response from an [`crate::error::A2AError`].
    pub fn from_a2a_error(id: Option<JsonRpcId>, err: crate::error::A2AError) -> Self {
        let rpc_err: JsonRpcError = err.into();
        Self::error(id, rpc_err)
    }
}

/// A JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonRpcError {
    /// Error code.
    pub code: i64,
    /// Human-readable error message.
    pub message: String,
    /// Optional structured error data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

// ============================================================================
// Request / response parameter types
// ============================================================================

/// Parameters for `tasks/send` and `tasks/sendSubscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    /// Existing task to continue, if any. A fresh task is minted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Session to associate a freshly-minted task with.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// The inbound message.
    pub message: Message,
    /// Optional send configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<SendMessageConfiguration>,
    /// Arbitrary metadata, copied onto a freshly-minted task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Per-request send configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageConfiguration {
    /// Maximum number of history messages to include in the response task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<usize>,
    /// Push notification configuration to attach for this task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notification_config: Option<PushNotificationConfig>,
}

/// Parameters for `tasks/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTaskParams {
    /// Task ID to retrieve.
    pub id: String,
    /// Maximum number of history messages to include (view-layer truncation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_length: Option<usize>,
}

/// Parameters for `tasks/cancel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelTaskParams {
    /// ID of the task to cancel.
    pub id: String,
}

/// Parameters for `tasks/resubscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResubscribeParams {
    /// ID of the task to resubscribe to.
    pub id: String,
}

/// Parameters for `tasks/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    /// Filter by session ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Filter by task state. Empty/absent means all states.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub states: Vec<TaskState>,
    /// Maximum number of tasks to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Number of tasks to skip before collecting `limit`.
    #[serde(default)]
    pub offset: usize,
}

/// Response payload for `tasks/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksResult {
    /// The page of tasks.
    pub tasks: Vec<Task>,
    /// Total number of tasks matching the filter, before pagination.
    pub total: usize,
}

/// Parameters for `tasks/pushNotification/set`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPushNotificationParams {
    /// Task this config applies to.
    pub task_id: String,
    /// The push notification configuration.
    pub push_notification_config: PushNotificationConfig,
}

/// Parameters for `tasks/pushNotification/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPushNotificationParams {
    /// Task whose push config should be retrieved.
    pub id: String,
}

/// The result of `tasks/send` / the final state after `tasks/sendSubscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendMessageResponse {
    /// The task, after the handler's update was applied.
    Task(Task),
}

// ============================================================================
// Agent Card (external-interface descriptor; data type + builder only)
// ============================================================================

/// Self-describing manifest for an A2A agent, served read-only at
/// `GET /.well-known/agent-card.json`. Discovery, validation, and
/// registry integration are out of scope — this crate only defines the
/// shape and a builder ([`crate::builders::AgentCardBuilder`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCard {
    /// Human-readable name.
    pub name: String,
    /// Description of the agent's capabilities.
    pub description: String,
    /// Agent version string.
    pub version: String,
    /// Primary URL for the agent's JSON-RPC endpoint.
    pub url: String,
    /// Agent capabilities.
    pub capabilities: AgentCapabilities,
    /// Default MIME types accepted as input.
    pub default_input_modes: Vec<String>,
    /// Default MIME types produced as output.
    pub default_output_modes: Vec<String>,
    /// Skills the agent supports.
    pub skills: Vec<AgentSkill>,
    /// Service provider information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<AgentProvider>,
}

/// Agent capabilities declaration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentCapabilities {
    /// Whether the agent supports streaming responses (`tasks/sendSubscribe`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming: Option<bool>,
    /// Whether the agent supports push notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub push_notifications: Option<bool>,
}

/// A skill that an agent can perform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentSkill {
    /// Unique skill identifier.
    pub id: String,
    /// Human-readable skill name.
    pub name: String,
    /// Description of what the skill does.
    pub description: String,
    /// Categorization tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Information about the agent's provider/organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentProvider {
    /// Organization name.
    pub organization: String,
    /// Organization URL.
    pub url: String,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_state_serializes_kebab_case() {
        assert_eq!(serde_json::to_string(&TaskState::InputRequired).unwrap(), "\"input-required\"");
        assert_eq!(serde_json::to_string(&TaskState::Submitted).unwrap(), "\"submitted\"");
    }

    #[test]
    fn task_state_terminal_set() {
        assert!(TaskState::Completed.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Canceled.is_terminal());
        assert!(!TaskState::Working.is_terminal());
        assert!(!TaskState::Submitted.is_terminal());
        assert!(!TaskState::InputRequired.is_terminal());
    }

    #[test]
    fn task_state_transition_table_matches_spec() {
        assert!(TaskState::Submitted.can_transition_to(TaskState::Working));
        assert!(TaskState::Submitted.can_transition_to(TaskState::Canceled));
        assert!(!TaskState::Submitted.can_transition_to(TaskState::Completed));

        assert!(TaskState::Working.can_transition_to(TaskState::InputRequired));
        assert!(TaskState::Working.can_transition_to(TaskState::Completed));
        assert!(TaskState::Working.can_transition_to(TaskState::Failed));
        assert!(TaskState::Working.can_transition_to(TaskState::Canceled));

        assert!(TaskState::InputRequired.can_transition_to(TaskState::Working));
        assert!(TaskState::InputRequired.can_transition_to(TaskState::Canceled));
        assert!(TaskState::InputRequired.can_transition_to(TaskState::Failed));
        assert!(!TaskState::InputRequired.can_transition_to(TaskState::Completed));

        for terminal in [TaskState::Completed, TaskState::Failed, TaskState::Canceled] {
            for next in [
                TaskState::Submitted,
                TaskState::Working,
                TaskState::InputRequired,
                TaskState::Completed,
                TaskState::Failed,
                TaskState::Canceled,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn role_roundtrip() {
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), "\"agent\"");
        let r: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(r, Role::User);
    }

    #[test]
    fn part_text_roundtrip() {
        let part = Part::Text {
            text: "hello".to_string(),
            metadata: None,
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["text"], "hello");
        let back: Part = serde_json::from_value(json).unwrap();
        match back {
            Part::Text { text, .. } => assert_eq!(text, "hello"),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn part_file_bytes_roundtrip() {
        let part = Part::File {
            file: FileContent::Bytes {
                bytes: "SGVsbG8=".to_string(),
                name: Some("hello.txt".to_string()),
                mime_type: Some("text/plain".to_string()),
            },
            metadata: None,
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "file");
        let back: Part = serde_json::from_value(json).unwrap();
        match back {
            Part::File { file: FileContent::Bytes { bytes, .. }, .. } => {
                assert_eq!(bytes, "SGVsbG8=");
            }
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn part_data_roundtrip() {
        let part = Part::Data {
            data: serde_json::json!({"key": "value"}),
            metadata: None,
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["type"], "data");
        let back: Part = serde_json::from_value(json).unwrap();
        match back {
            Part::Data { data, .. } => assert_eq!(data, serde_json::json!({"key": "value"})),
            _ => panic!("wrong variant"),
        }
    }

    #[test]
    fn task_roundtrip_identity() {
        let mut task = Task::new("task-1", Some("session-1".to_string()), None);
        task.history.push(Message::user_text("hi"));
        task.artifacts.push(Artifact {
            name: None,
            description: None,
            parts: vec![Part::Text { text: "A".to_string(), metadata: None }],
            index: 0,
            append: false,
            last_chunk: true,
            metadata: None,
        });

        let json = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, task.id);
        assert_eq!(back.session_id, task.session_id);
        assert_eq!(back.history.len(), 1);
        assert_eq!(back.artifacts.len(), 1);
        assert_eq!(back.artifacts[0].index, 0);
    }

    #[test]
    fn json_rpc_request_roundtrip() {
        let req = JsonRpcRequest::new(1i64, "tasks/send", Some(serde_json::json!({"x": 1})));
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 1);
        assert_eq!(json["method"], "tasks/send");
    }

    #[test]
    fn json_rpc_response_success() {
        let resp = JsonRpcResponse::success(Some(JsonRpcId::Number(1)), serde_json::json!({"id": "t1"}));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 1);
        assert!(json["result"].is_object());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn json_rpc_response_error() {
        let err = JsonRpcError {
            code: -32001,
            message: "Task not found".to_string(),
            data: None,
        };
        let resp = JsonRpcResponse::error(Some(JsonRpcId::Number(1)), err);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"]["code"], -32001);
        assert!(json.get("result").is_none());
    }

    #[test]
    fn json_rpc_id_variants() {
        let id_str: JsonRpcId = "abc".into();
        assert_eq!(serde_json::to_string(&id_str).unwrap(), "\"abc\"");

        let id_num: JsonRpcId = 42i64.into();
        assert_eq!(serde_json::to_string(&id_num).unwrap(), "42");

        let id_null = JsonRpcId::Null;
        assert_eq!(serde_json::to_string(&id_null).unwrap(), "null");
    }

    #[test]
    fn list_tasks_params_defaults() {
        let params: ListTasksParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(params.session_id.is_none());
        assert!(params.states.is_empty());
        assert_eq!(params.offset, 0);
    }
}
