//! `Page` domain types: navigation, frame tree, lifecycle events.

use serde::{Deserialize, Serialize};

/// Parameters for `Page.enable`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct EnableParams {}

/// Parameters for `Page.navigate`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NavigateParams {
    /// URL to navigate the frame to.
    pub url: String,
    /// Referrer URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    /// Frame id to navigate; the main frame if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<String>,
}

/// Result of `Page.navigate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateResult {
    /// Frame id that was navigated.
    pub frame_id: String,
    /// Loader id, absent when the navigation is same-document.
    pub loader_id: Option<String>,
    /// Error text if the navigation failed immediately.
    pub error_text: Option<String>,
}

/// Parameters for `Page.reload`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ReloadParams {
    /// Bypasses the cache when true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_cache: Option<bool>,
}

/// Parameters for `Page.navigateToHistoryEntry`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigateToHistoryEntryParams {
    /// History entry id to navigate to.
    pub entry_id: i64,
}

/// Result of `Page.getNavigationHistory`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetNavigationHistoryResult {
    /// Index of the current history entry.
    pub current_index: i64,
    /// All history entries.
    pub entries: Vec<NavigationEntry>,
}

/// A single history entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    /// Unique id of this entry.
    pub id: i64,
    /// Entry URL.
    pub url: String,
}

/// Parameters for `Page.getFrameTree`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GetFrameTreeParams {}

/// Result of `Page.getFrameTree`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetFrameTreeResult {
    /// Root of the frame tree.
    pub frame_tree: FrameTree,
}

/// A node in the frame tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTree {
    /// This node's frame.
    pub frame: Frame,
    /// Child frame nodes.
    #[serde(default)]
    pub child_frames: Vec<FrameTree>,
}

/// Information about a single frame.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    /// Frame unique identifier.
    pub id: String,
    /// Parent frame identifier.
    pub parent_id: Option<String>,
    /// Identifier of the loader associated with this frame.
    pub loader_id: Option<String>,
    /// Frame's name as specified in the tag.
    pub name: Option<String>,
    /// Frame document's URL without fragment.
    pub url: String,
    /// Frame document's URL fragment including the '#'.
    pub url_fragment: Option<String>,
}

/// Event: `Page.frameAttached`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAttachedEvent {
    /// Id of the attached frame.
    pub frame_id: String,
    /// Parent frame identifier.
    pub parent_frame_id: String,
}

/// Event: `Page.frameDetached`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDetachedEvent {
    /// Id of the detached frame.
    pub frame_id: String,
    /// Reason for the detach.
    pub reason: String,
}

/// Event: `Page.frameNavigated`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameNavigatedEvent {
    /// Frame that was navigated.
    pub frame: Frame,
    /// Navigation type, e.g. `"Navigation"`, `"BackForwardCacheRestore"`.
    #[serde(rename = "type")]
    pub navigation_type: Option<String>,
}

/// Event: `Page.navigatedWithinDocument`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigatedWithinDocumentEvent {
    /// Frame whose URL changed.
    pub frame_id: String,
    /// New URL of the frame.
    pub url: String,
}

/// Event: `Page.frameStartedLoading`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStartedLoadingEvent {
    /// Frame that started loading.
    pub frame_id: String,
}

/// Event: `Page.frameStoppedLoading`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStoppedLoadingEvent {
    /// Frame that stopped loading.
    pub frame_id: String,
}

/// Event: `Page.domContentEventFired`.
#[derive(Debug, Clone, Deserialize)]
pub struct DomContentEventFiredEvent {
    /// Timestamp the event fired at.
    pub timestamp: f64,
}

/// Event: `Page.loadEventFired`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadEventFiredEvent {
    /// Timestamp the event fired at.
    pub timestamp: f64,
}

/// Event: `Page.javascriptDialogOpening`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavascriptDialogOpeningEvent {
    /// URL of the page that opened the dialog.
    pub url: String,
    /// Message the dialog is displaying.
    pub message: String,
    /// Dialog type, e.g. `"alert"`, `"confirm"`, `"prompt"`, `"beforeunload"`.
    #[serde(rename = "type")]
    pub dialog_type: String,
    /// Default prompt value, for `"prompt"` dialogs.
    pub default_prompt: Option<String>,
}

/// Parameters for `Page.handleJavaScriptDialog`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleJavaScriptDialogParams {
    /// Whether to accept the dialog.
    pub accept: bool,
    /// Prompt text to supply, for `"prompt"` dialogs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_tree_deserializes_nested_children() {
        let json = r#"{
            "frameTree": {
                "frame": {"id":"F0","parentId":null,"loaderId":"L0","name":null,"url":"https://a/","urlFragment":null},
                "childFrames": [
                    {"frame": {"id":"F1","parentId":"F0","loaderId":null,"name":null,"url":"https://a/b","urlFragment":null}, "childFrames": []}
                ]
            }
        }"#;
        let result: GetFrameTreeResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.frame_tree.frame.id, "F0");
        assert_eq!(result.frame_tree.child_frames.len(), 1);
        assert_eq!(result.frame_tree.child_frames[0].frame.parent_id.as_deref(), Some("F0"));
    }

    #[test]
    fn navigate_params_omits_absent_fields() {
        let params = NavigateParams {
            url: "https://example.test/".into(),
            referrer: None,
            frame_id: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
    }
}
