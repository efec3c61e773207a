//! `session` module params/results (spec §4.4, SPEC_FULL §C.2).

use serde::{Deserialize, Serialize};

/// A single event name, either atomic (`"browsingContext.load"`) or a
/// module-wide group (`"browsingContext"`) that expands to every event the
/// module defines.
pub type EventName = String;

/// Parameters for `session.subscribe`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscribeParams {
    /// Events (or event-group names) to subscribe to.
    pub events: Vec<EventName>,
    /// Restricts the subscription to these top-level contexts; session-wide
    /// if absent or empty.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

/// Result of `session.subscribe`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct SubscribeResult {
    /// Opaque id correlating this subscription for a future
    /// `session.unsubscribe` with per-subscription granularity. The mapper
    /// mints one even though `unsubscribeAll` is the primary removal path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription: Option<String>,
}

/// Parameters for `session.unsubscribe`.
#[derive(Debug, Clone, Deserialize)]
pub struct UnsubscribeParams {
    /// Events to remove.
    pub events: Vec<EventName>,
    /// Contexts the removal applies to; session-wide if absent.
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

/// Parameters for `session.new`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct NewParams {
    /// Requested capabilities; the mapper honors `acceptInsecureCerts` and
    /// `unhandledPromptBehavior` and ignores the rest.
    #[serde(default)]
    pub capabilities: Option<serde_json::Value>,
}

/// Result of `session.new`.
#[derive(Debug, Clone, Serialize)]
pub struct NewResult {
    /// Opaque session id; the mapper is single-session, so this is constant.
    pub session_id: String,
    /// Echoed/negotiated capabilities.
    pub capabilities: serde_json::Value,
}

/// Result of `session.status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusResult {
    /// Whether a new session could be created (always `false` once the
    /// single mapper-wide session exists).
    pub ready: bool,
    /// Human-readable status message.
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_params_deserializes_without_contexts() {
        let raw = serde_json::json!({"events": ["browsingContext.load"]});
        let params: SubscribeParams = serde_json::from_value(raw).unwrap();
        assert_eq!(params.events, vec!["browsingContext.load"]);
        assert!(params.contexts.is_none());
    }
}
