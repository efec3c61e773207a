//! `network` module params/results/events (spec §4.3).

use serde::{Deserialize, Serialize};

/// A network request identifier.
pub type Request = String;
/// An intercept identifier.
pub type Intercept = String;

/// A BiDi header value: either a plain string or base64-encoded bytes
/// (spec §4.3 "Header representation invariants").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BytesValue {
    String { value: String },
    Base64 { value: String },
}

impl BytesValue {
    /// Decodes this value to raw bytes, whichever representation it used.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::String { value } => value.as_bytes().to_vec(),
            Self::Base64 { value } => {
                use base64::Engine;
                base64::engine::general_purpose::STANDARD
                    .decode(value)
                    .unwrap_or_default()
            }
        }
    }

    /// The string form, decoding base64 if necessary. Used when converting
    /// toward CDP, which always wants a plain string.
    #[must_use]
    pub fn to_cdp_string(&self) -> String {
        match self {
            Self::String { value } => value.clone(),
            Self::Base64 { .. } => String::from_utf8_lossy(&self.to_bytes()).into_owned(),
        }
    }
}

/// A single header, name plus a typed value. Order and duplicate names are
/// both preserved by storing headers as a `Vec`, never a map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Header {
    pub name: String,
    pub value: BytesValue,
}

/// A single cookie, in BiDi's representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: BytesValue,
    pub domain: String,
    pub path: String,
    pub size: i64,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<i64>,
}

/// `SameSite` cookie attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

/// Phases an intercept or a network event can occur at (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterceptPhase {
    BeforeRequestSent,
    ResponseStarted,
    AuthRequired,
}

/// A URL-matching pattern, either a whole-string pattern or a structured
/// field-by-field pattern (spec §4.3).
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UrlPattern {
    String {
        pattern: String,
    },
    Pattern {
        #[serde(default)]
        protocol: Option<String>,
        #[serde(default)]
        hostname: Option<String>,
        #[serde(default)]
        port: Option<String>,
        #[serde(default)]
        pathname: Option<String>,
        #[serde(default)]
        search: Option<String>,
    },
}

/// Parameters for `network.addIntercept`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddInterceptParams {
    pub phases: Vec<InterceptPhase>,
    #[serde(default)]
    pub url_patterns: Vec<UrlPattern>,
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

/// Result of `network.addIntercept`.
#[derive(Debug, Clone, Serialize)]
pub struct AddInterceptResult {
    pub intercept: Intercept,
}

/// Parameters for `network.removeIntercept`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveInterceptParams {
    pub intercept: Intercept,
}

/// Parameters for `network.continueRequest`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ContinueRequestParams {
    pub request: Request,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    #[serde(default)]
    pub body: Option<BytesValue>,
    #[serde(default)]
    pub cookies: Option<Vec<CookieHeader>>,
}

/// A cookie expressed in header form (name/value pair) used by
/// `continueRequest`'s cookie override.
#[derive(Debug, Clone, Deserialize)]
pub struct CookieHeader {
    pub name: String,
    pub value: BytesValue,
}

/// Parameters for `network.continueResponse`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ContinueResponseParams {
    pub request: Request,
    #[serde(default)]
    pub status_code: Option<u32>,
    #[serde(default)]
    pub reason_phrase: Option<String>,
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    #[serde(default)]
    pub cookies: Option<Vec<CookieHeader>>,
}

/// Parameters for `network.provideResponse`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProvideResponseParams {
    pub request: Request,
    #[serde(default)]
    pub status_code: Option<u32>,
    #[serde(default)]
    pub reason_phrase: Option<String>,
    #[serde(default)]
    pub headers: Option<Vec<Header>>,
    #[serde(default)]
    pub body: Option<BytesValue>,
}

/// The credentials/action a client chooses for an `authRequired` phase.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AuthCredentialsAction {
    Default,
    Cancel,
    ProvideCredentials { username: String, password: String },
}

/// Parameters for `network.continueWithAuth`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContinueWithAuthParams {
    pub request: Request,
    #[serde(flatten)]
    pub action: AuthCredentialsAction,
}

/// Parameters for `network.failRequest`.
#[derive(Debug, Clone, Deserialize)]
pub struct FailRequestParams {
    pub request: Request,
}

/// Parameters for `network.setCacheBehavior` (SPEC_FULL §C.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBehavior {
    Default,
    Bypass,
}

/// Parameters for `network.setCacheBehavior`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetCacheBehaviorParams {
    pub cache_behavior: CacheBehavior,
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
}

/// Timing data reported on network events; every field is coerced by
/// `getTiming` (spec §4.3) before being placed here.
#[derive(Debug, Clone, Serialize, Default)]
pub struct FetchTimingInfo {
    pub time_origin: f64,
    pub request_time: f64,
    pub redirect_start: f64,
    pub redirect_end: f64,
    pub fetch_start: f64,
    pub response_start: f64,
    pub response_end: f64,
}

/// Shared fields of every `network.*` lifecycle event.
#[derive(Debug, Clone, Serialize)]
pub struct BaseParameters {
    pub context: Option<String>,
    pub is_blocked: bool,
    pub navigation: Option<String>,
    pub redirect_count: u32,
    pub request: RequestData,
    pub timestamp: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intercepts: Option<Vec<Intercept>>,
}

/// The request half of a network event.
#[derive(Debug, Clone, Serialize)]
pub struct RequestData {
    pub request: Request,
    pub url: String,
    pub method: String,
    pub headers: Vec<Header>,
    pub cookies: Vec<Cookie>,
    pub headers_size: i64,
    pub body_size: Option<i64>,
    pub timings: FetchTimingInfo,
}

/// `network.beforeRequestSent` event payload.
pub type BeforeRequestSentEvent = BaseParameters;

/// The response half of `network.responseStarted`/`responseCompleted`.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseData {
    pub url: String,
    pub protocol: String,
    pub status: u32,
    pub status_text: String,
    pub from_cache: bool,
    pub headers: Vec<Header>,
    pub mime_type: String,
    pub bytes_received: i64,
    pub headers_size: i64,
    pub body_size: i64,
    pub content: ResponseContent,
}

/// Metadata about a response body without its bytes inline.
#[derive(Debug, Clone, Serialize, Default)]
pub struct ResponseContent {
    pub size: i64,
}

/// `network.responseStarted`/`responseCompleted` event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseEvent {
    #[serde(flatten)]
    pub base: BaseParameters,
    pub response: ResponseData,
}

/// `network.authRequired` event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthRequiredEvent {
    #[serde(flatten)]
    pub base: BaseParameters,
    pub response: ResponseData,
}

/// `network.fetchError` event payload.
#[derive(Debug, Clone, Serialize)]
pub struct FetchErrorEvent {
    #[serde(flatten)]
    pub base: BaseParameters,
    pub error_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_pattern_string_variant_deserializes() {
        let raw = serde_json::json!({"type": "string", "pattern": "https://a/"});
        let pattern: UrlPattern = serde_json::from_value(raw).unwrap();
        assert!(matches!(pattern, UrlPattern::String { pattern } if pattern == "https://a/"));
    }

    #[test]
    fn bytes_value_base64_decodes_to_bytes() {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"hi");
        let value = BytesValue::Base64 { value: encoded };
        assert_eq!(value.to_bytes(), b"hi");
        assert_eq!(value.to_cdp_string(), "hi");
    }

    #[test]
    fn bytes_value_string_passes_through() {
        let value = BytesValue::String {
            value: "plain".into(),
        };
        assert_eq!(value.to_cdp_string(), "plain");
    }
}
