use super::*;

#[test]
fn default_timeout_is_thirty_seconds() {
    assert_eq!(DEFAULT_TIMEOUT, Duration::from_secs(30));
}

#[tokio::test]
async fn connect_to_invalid_url_fails() {
    let result = CdpConnection::connect("not a url").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn connect_refused_yields_connection_failed_or_websocket_error() {
    // Nothing is listening on this port, so the handshake itself fails.
    let result = CdpConnection::connect("ws://127.0.0.1:1/devtools/browser/x").await;
    assert!(result.is_err());
}
