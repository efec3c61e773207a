//! CDP transport and protocol error types.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while talking to a Chromium-family browser over CDP.
#[derive(Debug, Error)]
pub enum CdpError {
    /// The WebSocket handshake to the browser failed.
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    /// The WebSocket connection dropped while a command was in flight.
    #[error("WebSocket connection lost")]
    ConnectionLost,

    /// Writing a request to the WebSocket sink failed.
    #[error("failed to send CDP message: {0}")]
    SendFailed(String),

    /// The browser answered with a JSON-RPC style protocol error.
    #[error("CDP protocol error {code}: {message}")]
    Protocol {
        /// CDP error code.
        code: i64,
        /// Human readable message from the browser.
        message: String,
    },

    /// A command did not receive a response within its timeout.
    #[error("response timeout after {}", format_duration(.0))]
    Timeout(Duration),

    /// A response arrived whose id did not match any pending command.
    #[error("invalid message ID: expected {expected}, got {got}")]
    InvalidMessageId {
        /// The id the caller expected.
        expected: u64,
        /// The id actually received.
        got: u64,
    },

    /// A malformed CDP endpoint URL was supplied.
    #[error("invalid WebSocket URL: {0}")]
    InvalidUrl(String),

    /// A command referenced a CDP session id the connection does not know about.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// (De)serializing a CDP message failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The low-level WebSocket library reported an error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

fn format_duration(d: Duration) -> String {
    if d.as_secs() > 0 && d.subsec_millis() == 0 {
        format!("{}s", d.as_secs())
    } else {
        format!("{}ms", d.as_millis())
    }
}

#[cfg(test)]
mod tests;
