//! `browser` module params/results (spec §3 `UserContext`).

use serde::{Deserialize, Serialize};

/// Parameters for `browser.createUserContext`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CreateUserContextParams {
    #[serde(default)]
    pub accept_insecure_certs: Option<bool>,
    #[serde(default)]
    pub proxy: Option<serde_json::Value>,
}

/// Result of `browser.createUserContext`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUserContextResult {
    pub user_context: String,
}

/// Parameters for `browser.removeUserContext`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoveUserContextParams {
    pub user_context: String,
}

/// Result of `browser.getUserContexts`.
#[derive(Debug, Clone, Serialize)]
pub struct GetUserContextsResult {
    pub user_contexts: Vec<UserContextInfo>,
}

/// A single known user context.
#[derive(Debug, Clone, Serialize)]
pub struct UserContextInfo {
    pub user_context: String,
}
