//! `Network` domain types: request/response lifecycle events the
//! mapper's request state machine is driven by.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Unique request identifier, shared between `Network` and `Fetch` events
/// for the same request.
pub type RequestId = String;

/// Unique loader identifier.
pub type LoaderId = String;

/// Unique frame identifier.
pub type FrameId = String;

/// Parameters for `Network.enable`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnableParams {
    /// Buffer size in bytes to use for storing network data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_total_buffer_size: Option<i64>,
    /// Per-resource buffer size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resource_buffer_size: Option<i64>,
}

/// HTTP request data as reported by the browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    /// Request URL.
    pub url: String,
    /// URL fragment, if stripped from `url`.
    pub url_fragment: Option<String>,
    /// HTTP request method.
    pub method: String,
    /// HTTP request headers, as sent by the renderer (pre-network-stack).
    pub headers: HashMap<String, String>,
    /// HTTP POST request body, when small enough to inline.
    pub post_data: Option<String>,
    /// Whether the request carries a POST body not inlined in `post_data`.
    pub has_post_data: Option<bool>,
}

/// HTTP response data as reported by the browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Final response URL, after redirects.
    pub url: String,
    /// HTTP response status code.
    pub status: u32,
    /// HTTP response status text.
    pub status_text: String,
    /// HTTP response headers, as the network stack received them.
    pub headers: HashMap<String, String>,
    /// Refined request headers actually transmitted over the network.
    pub request_headers: Option<HashMap<String, String>>,
    /// Resource mime type.
    pub mime_type: String,
    /// Whether the response was served from the disk cache.
    pub from_disk_cache: Option<bool>,
    /// Negotiated protocol, e.g. `"h2"`, `"http/1.1"`.
    pub protocol: Option<String>,
    /// Remote IP address that served the response.
    #[serde(rename = "remoteIPAddress")]
    pub remote_ip_address: Option<String>,
    /// Remote port that served the response.
    pub remote_port: Option<i32>,
    /// Security state of the connection, e.g. `"secure"`, `"insecure"`.
    pub security_state: Option<String>,
}

/// Origin of a request, e.g. a script `fetch()` call or a parser-driven load.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestInitiator {
    /// Initiator kind, e.g. `"parser"`, `"script"`, `"other"`.
    #[serde(rename = "type")]
    pub initiator_type: String,
    /// Initiating script URL, when known.
    pub url: Option<String>,
}

/// Event: `Network.requestWillBeSent`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWillBeSentEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Loader identifier.
    pub loader_id: LoaderId,
    /// URL of the document this request was made for.
    pub document_url: Option<String>,
    /// Request data.
    pub request: Request,
    /// Monotonic timestamp the event was issued at.
    pub timestamp: f64,
    /// Wall-clock timestamp (seconds since epoch) the event was issued at.
    pub wall_time: f64,
    /// Request initiator.
    pub initiator: RequestInitiator,
    /// Owning frame, absent for non-frame requests (e.g. service workers).
    pub frame_id: Option<FrameId>,
    /// Resource type, e.g. `"Document"`, `"Script"`, `"XHR"`, `"Fetch"`.
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    /// Redirect response, present only when this event follows a redirect.
    pub redirect_response: Option<Response>,
}

/// Event: `Network.responseReceived`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseReceivedEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Loader identifier.
    pub loader_id: LoaderId,
    /// Monotonic timestamp.
    pub timestamp: f64,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Response data.
    pub response: Response,
    /// Owning frame.
    pub frame_id: Option<FrameId>,
}

/// Event: `Network.loadingFinished`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFinishedEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Monotonic timestamp.
    pub timestamp: f64,
    /// Total bytes received on the wire, including headers.
    pub encoded_data_length: f64,
}

/// Event: `Network.loadingFailed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFailedEvent {
    /// Request identifier.
    pub request_id: RequestId,
    /// Monotonic timestamp.
    pub timestamp: f64,
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Human-readable error, e.g. `"net::ERR_NAME_NOT_RESOLVED"`.
    pub error_text: String,
    /// Whether the request was canceled rather than failed.
    pub canceled: Option<bool>,
}

/// Event: `Network.requestServedFromCache`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestServedFromCacheEvent {
    /// Request identifier.
    pub request_id: RequestId,
}

/// Parameters for `Network.setCacheDisabled`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCacheDisabledParams {
    /// Whether the HTTP cache should be bypassed entirely.
    pub cache_disabled: bool,
}

/// Parameters for `Network.setExtraHTTPHeaders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetExtraHttpHeadersParams {
    /// Extra headers applied to every subsequent request.
    pub headers: HashMap<String, String>,
}

/// A single cookie, as returned by `Network.getCookies`/`Storage.getCookies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Cookie domain.
    pub domain: String,
    /// Cookie path.
    pub path: String,
    /// Cookie expiration, as seconds since epoch, or `-1` for a session cookie.
    pub expires: f64,
    /// Cookie size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    /// Whether the cookie is marked `HttpOnly`.
    pub http_only: bool,
    /// Whether the cookie is marked `Secure`.
    pub secure: bool,
    /// Whether the cookie is a session cookie.
    pub session: bool,
    /// `SameSite` attribute, when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

/// Parameters for `Network.getCookies`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetCookiesParams {
    /// URLs to restrict the lookup to; all cookies visible to the page if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
}

/// Result of `Network.getCookies`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetCookiesResult {
    /// Matching cookies.
    pub cookies: Vec<Cookie>,
}

/// Parameters for `Network.setCookie`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookieParams {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// Cookie URL, required unless domain/path are both set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Cookie domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Cookie path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Marks the cookie `Secure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    /// Marks the cookie `HttpOnly`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// `SameSite` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
    /// Expiration, as seconds since epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
}

/// Parameters for `Network.deleteCookies`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCookiesParams {
    /// Cookie name to delete.
    pub name: String,
    /// Restricts the delete to a URL's cookie jar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Restricts the delete to a domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Restricts the delete to a path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_will_be_sent_event_deserializes_without_redirect() {
        let json = r#"{
            "requestId": "R1",
            "loaderId": "L1",
            "documentUrl": "https://example.test/",
            "request": {
                "url": "https://example.test/",
                "urlFragment": null,
                "method": "GET",
                "headers": {"Accept": "*/*"},
                "postData": null,
                "hasPostData": null
            },
            "timestamp": 1.5,
            "wallTime": 1700000000.0,
            "initiator": {"type": "other", "url": null},
            "frameId": "F0",
            "type": "Document",
            "redirectResponse": null
        }"#;
        let event: RequestWillBeSentEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.request_id, "R1");
        assert!(event.redirect_response.is_none());
        assert_eq!(event.request.method, "GET");
    }

    #[test]
    fn cookie_roundtrips_through_json() {
        let cookie = Cookie {
            name: "sid".into(),
            value: "abc".into(),
            domain: "example.test".into(),
            path: "/".into(),
            expires: -1.0,
            size: Some(6),
            http_only: true,
            secure: true,
            session: true,
            same_site: Some("Strict".into()),
        };
        let json = serde_json::to_string(&cookie).unwrap();
        let back: Cookie = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, cookie.name);
        assert_eq!(back.same_site.as_deref(), Some("Strict"));
    }
}
