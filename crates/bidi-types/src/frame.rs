//! The BiDi frame envelope (spec §6): Command, Success, Error, Event.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ErrorCode;

/// An inbound command frame.
///
/// `channel` and `goog:channel` are kept as two separate optional fields
/// rather than unified at parse time — §9's open question requires the
/// dispatcher to reject frames that carry both unless they are bytewise
/// equal, which needs to see them distinctly first.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandFrame {
    /// Client-assigned command id, echoed back in the response.
    pub id: u64,
    /// Dotted method name, e.g. `"browsingContext.navigate"`.
    pub method: String,
    /// Method parameters, validated against the per-method schema.
    #[serde(default)]
    pub params: Value,
    /// Standard channel tag.
    #[serde(default)]
    pub channel: Option<String>,
    /// Chromium-specific channel tag alias.
    #[serde(rename = "goog:channel", default)]
    pub goog_channel: Option<String>,
}

impl CommandFrame {
    /// Resolves `channel`/`goog:channel` into the single effective channel,
    /// per §9: a frame carrying both is rejected unless they are bytewise
    /// equal.
    ///
    /// # Errors
    ///
    /// Returns `ErrorCode::InvalidArgument` if both are present and differ.
    pub fn resolve_channel(&self) -> Result<Option<&str>, ErrorCode> {
        match (&self.channel, &self.goog_channel) {
            (Some(a), Some(b)) if a == b => Ok(Some(a.as_str())),
            (Some(_), Some(_)) => Err(ErrorCode::InvalidArgument),
            (Some(a), None) => Ok(Some(a.as_str())),
            (None, Some(b)) => Ok(Some(b.as_str())),
            (None, None) => Ok(None),
        }
    }
}

/// A successful command response frame.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessFrame {
    /// Always `"success"`.
    #[serde(rename = "type")]
    pub frame_type: &'static str,
    /// Echoes the originating command id.
    pub id: u64,
    /// The module-specific result payload.
    pub result: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl SuccessFrame {
    /// Builds a success frame for the given command id and result.
    #[must_use]
    pub fn new(id: u64, result: Value, channel: Option<String>) -> Self {
        Self {
            frame_type: "success",
            id,
            result,
            channel,
        }
    }
}

/// An error command response frame.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorFrame {
    /// Always `"error"`.
    #[serde(rename = "type")]
    pub frame_type: &'static str,
    /// Echoes the originating command id, or `null` for frame-level failures
    /// (e.g. the command itself failed to parse).
    pub id: Option<u64>,
    pub error: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl ErrorFrame {
    /// Builds an error frame.
    #[must_use]
    pub fn new(id: Option<u64>, error: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            frame_type: "error",
            id,
            error,
            message: message.into(),
            stacktrace: None,
            channel: None,
        }
    }

    /// Attaches the channel the originating command arrived on.
    #[must_use]
    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = channel;
        self
    }
}

/// An outbound event frame.
#[derive(Debug, Clone, Serialize)]
pub struct EventFrame {
    /// Always `"event"`.
    #[serde(rename = "type")]
    pub frame_type: &'static str,
    /// Dotted event name, e.g. `"browsingContext.load"`.
    pub method: String,
    /// Event-specific payload.
    pub params: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
}

impl EventFrame {
    /// Builds an event frame bound for a single channel.
    #[must_use]
    pub fn new(method: impl Into<String>, params: Value, channel: Option<String>) -> Self {
        Self {
            frame_type: "event",
            method: method.into(),
            params,
            channel,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_channel_prefers_matching_identical_values() {
        let frame = CommandFrame {
            id: 1,
            method: "session.status".into(),
            params: Value::Null,
            channel: Some("a".into()),
            goog_channel: Some("a".into()),
        };
        assert_eq!(frame.resolve_channel().unwrap(), Some("a"));
    }

    #[test]
    fn resolve_channel_rejects_conflicting_values() {
        let frame = CommandFrame {
            id: 1,
            method: "session.status".into(),
            params: Value::Null,
            channel: Some("a".into()),
            goog_channel: Some("b".into()),
        };
        assert_eq!(frame.resolve_channel(), Err(ErrorCode::InvalidArgument));
    }

    #[test]
    fn command_frame_deserializes_without_channel() {
        let raw = json!({"id": 7, "method": "session.status", "params": {}});
        let frame: CommandFrame = serde_json::from_value(raw).unwrap();
        assert_eq!(frame.id, 7);
        assert!(frame.resolve_channel().unwrap().is_none());
    }

    #[test]
    fn success_frame_serializes_type_tag() {
        let frame = SuccessFrame::new(1, json!({"ready": true}), None);
        let value = serde_json::to_value(&frame).unwrap();
        assert_eq!(value["type"], "success");
        assert_eq!(value["id"], 1);
    }
}
