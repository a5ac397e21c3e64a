//! Constants for well-known URIs used throughout the A2A runtime.

/// The well-known path for the agent card.
pub const AGENT_CARD_WELL_KNOWN_PATH: &str = "/.well-known/agent-card.json";
