//! `storage` module params/results (spec §2 "input/storage/other").
//!
//! Only cookie access is modeled — the mapper's storage surface is cookies
//! read/written through CDP's `Storage`/`Network` domains; it does not
//! model `localStorage`/IndexedDB, which have no CDP-level interception
//! point the mapper needs to mediate.

use serde::{Deserialize, Serialize};

use crate::network::Cookie;

/// A cookie filter used by `storage.getCookies`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CookieFilter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// The partition a storage operation applies to.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PartitionDescriptor {
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub user_context: Option<String>,
}

/// Parameters for `storage.getCookies`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GetCookiesParams {
    #[serde(default)]
    pub filter: Option<CookieFilter>,
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}

/// Result of `storage.getCookies`.
#[derive(Debug, Clone, Serialize)]
pub struct GetCookiesResult {
    pub cookies: Vec<Cookie>,
    pub partition_key: serde_json::Value,
}

/// Parameters for `storage.setCookie`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetCookieParams {
    pub cookie: Cookie,
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}

/// Result of `storage.setCookie`.
#[derive(Debug, Clone, Serialize)]
pub struct SetCookieResult {
    pub partition_key: serde_json::Value,
}

/// Parameters for `storage.deleteCookies`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DeleteCookiesParams {
    #[serde(default)]
    pub filter: Option<CookieFilter>,
    #[serde(default)]
    pub partition: Option<PartitionDescriptor>,
}
