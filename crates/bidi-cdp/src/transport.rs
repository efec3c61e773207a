//! CDP message envelope types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A CDP request message.
#[derive(Debug, Clone, Serialize)]
pub struct CdpRequest {
    /// Unique message id used to match the eventual response.
    pub id: u64,
    /// CDP method name, e.g. `"Target.createTarget"`.
    pub method: String,
    /// Method parameters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Session id for target-scoped commands. Absent for browser-level commands.
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// A CDP response message.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpResponse {
    /// Message id matching the originating request.
    pub id: u64,
    /// Result payload on success.
    pub result: Option<Value>,
    /// Error payload on failure.
    pub error: Option<CdpResponseError>,
    /// Session id, mirrored back for session-scoped commands.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Error details embedded in a CDP response.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpResponseError {
    /// CDP error code.
    pub code: i64,
    /// Error message.
    pub message: String,
    /// Additional, free-form error data.
    pub data: Option<String>,
}

/// A CDP event pushed by the browser without being solicited by a request.
#[derive(Debug, Clone, Deserialize)]
pub struct CdpEvent {
    /// Event method name, e.g. `"Network.requestWillBeSent"`.
    pub method: String,
    /// Event parameters.
    pub params: Option<Value>,
    /// Session id the event originated from, if any.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

impl CdpEvent {
    /// Deserialize this event's params into a typed event struct.
    ///
    /// # Errors
    ///
    /// Returns an error if the params are absent or do not match `T`.
    pub fn params_as<T: serde::de::DeserializeOwned>(&self) -> Result<T, crate::CdpError> {
        let value = self.params.clone().unwrap_or(Value::Null);
        serde_json::from_value(value).map_err(crate::CdpError::from)
    }
}

/// An incoming CDP message: either a response to a prior request or an
/// unsolicited event.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CdpMessage {
    /// A response to a previous request.
    Response(CdpResponse),
    /// An event pushed by the browser.
    Event(CdpEvent),
}

impl CdpMessage {
    /// Returns true if this message is the response for the given request id.
    pub fn is_response_for(&self, id: u64) -> bool {
        matches!(self, Self::Response(resp) if resp.id == id)
    }

    /// Converts this message into a response, if it is one.
    pub fn into_response(self) -> Option<CdpResponse> {
        match self {
            Self::Response(resp) => Some(resp),
            Self::Event(_) => None,
        }
    }

    /// Converts this message into an event, if it is one.
    pub fn into_event(self) -> Option<CdpEvent> {
        match self {
            Self::Event(evt) => Some(evt),
            Self::Response(_) => None,
        }
    }
}

#[cfg(test)]
mod tests;
