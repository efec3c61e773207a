//! `browsingContext` module params/results/events (spec §4.2).

use serde::{Deserialize, Serialize};

/// Readiness state a navigation may be told to wait for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadinessState {
    /// Resolve as soon as the navigation is committed.
    None,
    /// Resolve once `DOMContentLoaded`-equivalent has fired.
    Interactive,
    /// Resolve once the load event has fired.
    Complete,
}

/// Parameters for `browsingContext.navigate`.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigateParams {
    pub context: String,
    pub url: String,
    #[serde(default)]
    pub wait: Option<ReadinessState>,
}

/// Result of `browsingContext.navigate`.
#[derive(Debug, Clone, Serialize)]
pub struct NavigateResult {
    pub navigation: Option<String>,
    pub url: String,
}

/// Parameters for `browsingContext.reload`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReloadParams {
    pub context: String,
    #[serde(default)]
    pub ignore_cache: Option<bool>,
    #[serde(default)]
    pub wait: Option<ReadinessState>,
}

/// Parameters for `browsingContext.create`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContextType {
    Tab,
    Window,
}

/// Parameters for `browsingContext.create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateParams {
    #[serde(rename = "type")]
    pub context_type: ContextType,
    #[serde(default)]
    pub reference_context: Option<String>,
    #[serde(default)]
    pub user_context: Option<String>,
}

/// Result of `browsingContext.create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateResult {
    pub context: String,
}

/// Parameters for `browsingContext.close`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseParams {
    pub context: String,
    #[serde(default)]
    pub prompt_unload: Option<bool>,
}

/// Parameters for `browsingContext.getTree`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GetTreeParams {
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

/// Result of `browsingContext.getTree`.
#[derive(Debug, Clone, Serialize)]
pub struct GetTreeResult {
    pub contexts: Vec<ContextInfo>,
}

/// One node of the tree returned by `getTree`.
#[derive(Debug, Clone, Serialize)]
pub struct ContextInfo {
    pub context: String,
    pub url: String,
    pub children: Vec<ContextInfo>,
    pub parent: Option<String>,
    pub user_context: String,
}

/// Parameters for `browsingContext.activate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActivateParams {
    pub context: String,
}

/// Parameters for `browsingContext.traverseHistory`.
#[derive(Debug, Clone, Deserialize)]
pub struct TraverseHistoryParams {
    pub context: String,
    pub delta: i32,
}

/// Event: `browsingContext.contextCreated`.
#[derive(Debug, Clone, Serialize)]
pub struct ContextCreatedEvent {
    pub context: String,
    pub url: String,
    pub parent: Option<String>,
    pub user_context: String,
}

/// Event: `browsingContext.contextDestroyed`.
#[derive(Debug, Clone, Serialize)]
pub struct ContextDestroyedEvent {
    pub context: String,
    pub url: String,
    pub parent: Option<String>,
    pub user_context: String,
}

/// Event: `browsingContext.navigationStarted`.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationInfo {
    pub context: String,
    pub navigation: Option<String>,
    pub timestamp: u64,
    pub url: String,
}

/// Event: `browsingContext.navigationAborted`.
pub type NavigationAbortedEvent = NavigationInfo;
/// Event: `browsingContext.navigationFailed`.
pub type NavigationFailedEvent = NavigationInfo;
/// Event: `browsingContext.domContentLoaded`.
pub type DomContentLoadedEvent = NavigationInfo;
/// Event: `browsingContext.load`.
pub type LoadEvent = NavigationInfo;
/// Event: `browsingContext.navigationStarted`.
pub type NavigationStartedEvent = NavigationInfo;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_params_defaults_wait_to_none_option() {
        let raw = serde_json::json!({"context": "c1", "url": "https://example.test/"});
        let params: NavigateParams = serde_json::from_value(raw).unwrap();
        assert!(params.wait.is_none());
    }

    #[test]
    fn readiness_state_roundtrips_lowercase() {
        let json = serde_json::to_string(&ReadinessState::Complete).unwrap();
        assert_eq!(json, "\"complete\"");
    }
}
