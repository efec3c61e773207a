//! `Fetch` domain types: request interception, the CDP counterpart of BiDi
//! `network.addIntercept`/`network.continueRequest`/`network.continueResponse`.

use serde::{Deserialize, Serialize};

use super::network::Request;

/// Unique request identifier for the `Fetch` domain; shares its namespace
/// with `Network.requestId` for a given request.
pub type RequestId = String;

/// A single response header, as a name/value pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Header name.
    pub name: String,
    /// Header value.
    pub value: String,
}

/// Stage at which a request is paused for interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequestStage {
    /// Paused before the request is sent.
    #[default]
    Request,
    /// Paused after the response is received, before the body is delivered.
    Response,
}

/// A URL/resource-type filter restricting which requests are paused.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RequestPattern {
    /// Glob-style URL pattern (`*` any run, `?` one char). `None` matches all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_pattern: Option<String>,
    /// Restricts the pattern to one resource type, e.g. `"XHR"`, `"Document"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Stage the pattern applies to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_stage: Option<RequestStage>,
}

/// Parameters for `Fetch.enable`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnableParams {
    /// Only requests matching one of these patterns pause; all requests if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<RequestPattern>>,
    /// Pauses on HTTP auth challenges and requires `continueWithAuth`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_auth_requests: Option<bool>,
}

/// Parameters for `Fetch.disable`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct DisableParams {}

/// Parameters for `Fetch.continueRequest`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContinueRequestParams {
    /// Id from the triggering `requestPaused` event.
    pub request_id: RequestId,
    /// Overrides the request URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Overrides the request method.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Overrides the POST body, base64-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_data: Option<String>,
    /// Overrides the request headers entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<HeaderEntry>>,
    /// Overrides whether the response stage should also pause for this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercept_response: Option<bool>,
}

/// Parameters for `Fetch.fulfillRequest`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FulfillRequestParams {
    /// Id from the triggering `requestPaused` event.
    pub request_id: RequestId,
    /// HTTP status code to respond with.
    pub response_code: i32,
    /// Response headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
    /// Response body, base64-encoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Status line phrase; a standard phrase for `response_code` if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_phrase: Option<String>,
}

/// Parameters for `Fetch.failRequest`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailRequestParams {
    /// Id from the triggering `requestPaused` event.
    pub request_id: RequestId,
    /// Network-level reason the request should fail with.
    pub error_reason: ErrorReason,
}

/// Parameters for `Fetch.getResponseBody`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponseBodyParams {
    /// Id of the paused request to fetch the body for.
    pub request_id: RequestId,
}

/// Result of `Fetch.getResponseBody`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetResponseBodyResult {
    /// Response body, as text or base64 depending on `base64_encoded`.
    pub body: String,
    /// Whether `body` is base64-encoded (set for non-UTF-8 bodies).
    pub base64_encoded: bool,
}

/// Parameters for `Fetch.continueWithAuth`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWithAuthParams {
    /// Id from the triggering `authRequired` event.
    pub request_id: RequestId,
    /// How to respond to the challenge.
    pub auth_challenge_response: AuthChallengeResponse,
}

/// Parameters for `Fetch.continueResponse`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContinueResponseParams {
    /// Id from the triggering `requestPaused` event at the response stage.
    pub request_id: RequestId,
    /// Overrides the response status code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<i32>,
    /// Overrides the response status phrase.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_phrase: Option<String>,
    /// Overrides the response headers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
}

/// Event: `Fetch.requestPaused`.
///
/// Paused until the client calls `continueRequest`, `failRequest`,
/// `fulfillRequest`, or (at the response stage) `continueResponse`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPausedEvent {
    /// Id unique to this paused request; distinct from the `Network` request id.
    pub request_id: RequestId,
    /// Details of the request.
    pub request: Request,
    /// Owning frame.
    pub frame_id: String,
    /// Resource type of the request.
    pub resource_type: String,
    /// Error reason, present only when paused at the response stage after a failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_error_reason: Option<ErrorReason>,
    /// Response status code, present when paused at the response stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status_code: Option<i32>,
    /// Response status phrase, present when paused at the response stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status_text: Option<String>,
    /// Response headers, present when paused at the response stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_headers: Option<Vec<HeaderEntry>>,
    /// Matches the `requestId` of the corresponding `Network.requestWillBeSent`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
}

impl RequestPausedEvent {
    /// Whether this event is paused at the response stage.
    pub fn is_response_stage(&self) -> bool {
        self.response_error_reason.is_some() || self.response_status_code.is_some()
    }

    /// Whether this event is paused at the request stage.
    pub fn is_request_stage(&self) -> bool {
        !self.is_response_stage()
    }
}

/// Event: `Fetch.authRequired`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequiredEvent {
    /// Id unique to this paused request.
    pub request_id: RequestId,
    /// Details of the request.
    pub request: Request,
    /// Owning frame.
    pub frame_id: String,
    /// Resource type of the request.
    pub resource_type: String,
    /// Details of the authorization challenge.
    pub auth_challenge: AuthChallenge,
}

/// Network-level reason a `Fetch.failRequest` call should fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ErrorReason {
    /// Generic failure.
    #[default]
    Failed,
    /// Request was aborted.
    Aborted,
    /// Request timed out.
    TimedOut,
    /// Access was denied.
    AccessDenied,
    /// Connection was closed.
    ConnectionClosed,
    /// Connection was reset.
    ConnectionReset,
    /// Connection was refused.
    ConnectionRefused,
    /// Connection was aborted.
    ConnectionAborted,
    /// Connection failed.
    ConnectionFailed,
    /// Hostname could not be resolved.
    NameNotResolved,
    /// Internet is disconnected.
    InternetDisconnected,
    /// Address is unreachable.
    AddressUnreachable,
    /// Blocked by the client.
    BlockedByClient,
    /// Blocked by the response.
    BlockedByResponse,
}

/// HTTP authorization challenge, for status 401 or 407.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallenge {
    /// Whether the server or a proxy issued the challenge.
    pub source: Option<AuthChallengeSource>,
    /// Origin of the challenger.
    pub origin: String,
    /// Authentication scheme, e.g. `"basic"`, `"digest"`.
    pub scheme: String,
    /// Challenge realm, possibly empty.
    pub realm: String,
}

/// Source of an authorization challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthChallengeSource {
    /// Challenge from the destination server.
    Server,
    /// Challenge from an intermediate proxy.
    Proxy,
}

/// Response to an [`AuthChallenge`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthChallengeResponse {
    /// Decision on how to resolve the challenge.
    pub response: AuthChallengeResponseType,
    /// Username to provide; only set when providing credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password to provide; only set when providing credentials.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AuthChallengeResponse {
    /// Cancels the authentication attempt.
    pub fn cancel() -> Self {
        Self {
            response: AuthChallengeResponseType::CancelAuth,
            username: None,
            password: None,
        }
    }

    /// Supplies credentials in response to the challenge.
    pub fn provide_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            response: AuthChallengeResponseType::ProvideCredentials,
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }
}

/// Decision on how to resolve an [`AuthChallenge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthChallengeResponseType {
    /// Defer to the network stack's default behavior.
    Default,
    /// Cancel the authentication.
    CancelAuth,
    /// Provide credentials.
    ProvideCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_paused_event_detects_response_stage() {
        let json = r#"{
            "requestId": "I1",
            "request": {
                "url": "https://example.test/",
                "urlFragment": null,
                "method": "GET",
                "headers": {},
                "postData": null,
                "hasPostData": null
            },
            "frameId": "F0",
            "resourceType": "Document",
            "responseStatusCode": 200,
            "networkId": "R1"
        }"#;
        let event: RequestPausedEvent = serde_json::from_str(json).unwrap();
        assert!(event.is_response_stage());
        assert!(!event.is_request_stage());
    }

    #[test]
    fn continue_with_auth_serializes_credentials() {
        let params = ContinueWithAuthParams {
            request_id: "I1".into(),
            auth_challenge_response: AuthChallengeResponse::provide_credentials("u", "p"),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["authChallengeResponse"]["response"], "ProvideCredentials");
        assert_eq!(json["authChallengeResponse"]["username"], "u");
    }
}
