use super::*;

#[test]
fn connection_failed_error_display() {
    let err = CdpError::ConnectionFailed("connection refused".to_string());
    assert_eq!(
        err.to_string(),
        "WebSocket connection failed: connection refused"
    );
}

#[test]
fn connection_lost_error_display() {
    let err = CdpError::ConnectionLost;
    assert_eq!(err.to_string(), "WebSocket connection lost");
}

#[test]
fn protocol_error_display() {
    let err = CdpError::Protocol {
        code: -32601,
        message: "Method not found".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "CDP protocol error -32601: Method not found"
    );
}

#[test]
fn timeout_error_display_seconds() {
    let err = CdpError::Timeout(Duration::from_secs(30));
    assert_eq!(err.to_string(), "response timeout after 30s");
}

#[test]
fn timeout_error_display_millis() {
    let err = CdpError::Timeout(Duration::from_millis(500));
    assert_eq!(err.to_string(), "response timeout after 500ms");
}

#[test]
fn invalid_message_id_error_display() {
    let err = CdpError::InvalidMessageId {
        expected: 42,
        got: 99,
    };
    assert_eq!(err.to_string(), "invalid message ID: expected 42, got 99");
}

#[test]
fn session_not_found_error_display() {
    let err = CdpError::SessionNotFound("ABC123".to_string());
    assert_eq!(err.to_string(), "session not found: ABC123");
}

#[test]
fn json_error_from_serde() {
    let json_err: serde_json::Error = serde_json::from_str::<i32>("not a number").unwrap_err();
    let err: CdpError = json_err.into();
    assert!(err.to_string().starts_with("JSON error:"));
}

#[test]
fn error_is_send_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<CdpError>();
}
