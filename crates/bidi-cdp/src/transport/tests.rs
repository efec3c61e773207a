use super::*;

#[test]
fn response_message_is_distinguished_from_event() {
    let json = r#"{"id":1,"result":{"ok":true},"sessionId":"S1"}"#;
    let msg: CdpMessage = serde_json::from_str(json).unwrap();
    assert!(msg.is_response_for(1));
    assert!(msg.into_response().is_some());
}

#[test]
fn event_message_has_no_id() {
    let json = r#"{"method":"Page.loadEventFired","params":{"timestamp":1.0}}"#;
    let msg: CdpMessage = serde_json::from_str(json).unwrap();
    assert!(!msg.is_response_for(1));
    let event = msg.into_event().unwrap();
    assert_eq!(event.method, "Page.loadEventFired");
}

#[test]
fn request_serializes_without_absent_fields() {
    let req = CdpRequest {
        id: 7,
        method: "Target.getTargets".to_string(),
        params: None,
        session_id: None,
    };
    let json = serde_json::to_string(&req).unwrap();
    assert_eq!(json, r#"{"id":7,"method":"Target.getTargets"}"#);
}
