//! `Storage` domain types: browser-scoped cookie jar access, the CDP
//! counterpart of BiDi's `storage` module.

use serde::{Deserialize, Serialize};

pub use super::network::Cookie;

/// `SameSite` attribute for a cookie being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CookieSameSite {
    /// Not sent with any cross-site requests.
    Strict,
    /// Sent with top-level navigations.
    Lax,
    /// Sent with all requests, requires `Secure`.
    None,
}

/// A cookie to be written via `Storage.setCookies`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieParam {
    /// Cookie name.
    pub name: String,
    /// Cookie value.
    pub value: String,
    /// URL the cookie applies to, required unless domain is set.
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
    pub same_site: Option<CookieSameSite>,
    /// Expiration, as seconds since epoch; a session cookie if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires: Option<f64>,
    /// Storage partition key, for partitioned cookies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
}

/// Parameters for `Storage.getCookies`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GetCookiesParams {
    /// Browser context to read cookies from; the default context if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
}

/// Result of `Storage.getCookies`.
#[derive(Debug, Clone, Deserialize)]
pub struct GetCookiesResult {
    /// Matching cookies.
    pub cookies: Vec<Cookie>,
}

/// Parameters for `Storage.setCookies`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetCookiesParams {
    /// Cookies to write.
    pub cookies: Vec<CookieParam>,
    /// Browser context to write cookies into; the default context if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
}

/// Parameters for `Storage.deleteCookies`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCookiesParams {
    /// Name of the cookie(s) to remove.
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
    /// Restricts the delete to a storage partition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partition_key: Option<String>,
    /// Browser context to delete from; the default context if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
}

/// Parameters for `Storage.clearCookies`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClearCookiesParams {
    /// Browser context to clear; the default context if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_param_omits_absent_optional_fields() {
        let param = CookieParam {
            name: "sid".into(),
            value: "abc".into(),
            url: Some("https://example.test/".into()),
            domain: None,
            path: None,
            secure: None,
            http_only: None,
            same_site: None,
            expires: None,
            partition_key: None,
        };
        let json = serde_json::to_value(&param).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn same_site_serializes_pascal_case() {
        let json = serde_json::to_value(CookieSameSite::Lax).unwrap();
        assert_eq!(json, "Lax");
    }
}
