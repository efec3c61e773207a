//! `Target` domain types: target discovery, browser contexts, session attach/detach.

use serde::{Deserialize, Serialize};

/// Information describing a CDP target (a page, worker, or service worker).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfo {
    /// Target identifier. Doubles as a BiDi `browsingContext` id for pages.
    pub target_id: String,
    /// Target type, e.g. `"page"`, `"iframe"`, `"worker"`.
    #[serde(rename = "type")]
    pub target_type: String,
    /// Target title.
    pub title: String,
    /// Target URL.
    pub url: String,
    /// Whether the mapper is attached to this target.
    pub attached: bool,
    /// Owning browser context id, if any.
    pub browser_context_id: Option<String>,
    /// The target that opened this one (for popups), if any.
    pub opener_id: Option<String>,
}

/// Parameters for `Target.createBrowserContext`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrowserContextParams {
    /// Whether the context should be destroyed when every target detaches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dispose_on_detach: Option<bool>,
}

/// Result of `Target.createBrowserContext`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrowserContextResult {
    /// The newly created browser context id.
    pub browser_context_id: String,
}

/// Parameters for `Target.disposeBrowserContext`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposeBrowserContextParams {
    /// Id of the browser context to dispose.
    pub browser_context_id: String,
}

/// Parameters for `Target.createTarget`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetParams {
    /// Initial URL for the new target.
    pub url: String,
    /// Browser context to create the target in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
    /// Whether the target should be created as a background tab.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<bool>,
}

/// Result of `Target.createTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTargetResult {
    /// Id of the newly created target.
    pub target_id: String,
}

/// Parameters for `Target.attachToTarget`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetParams {
    /// Target to attach to.
    pub target_id: String,
    /// Enables flat session addressing via `sessionId`.
    pub flatten: bool,
}

/// Result of `Target.attachToTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachToTargetResult {
    /// Session id to use for subsequent commands scoped to this target.
    pub session_id: String,
}

/// Parameters for `Target.closeTarget`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseTargetParams {
    /// Target to close.
    pub target_id: String,
}

/// Result of `Target.closeTarget`.
#[derive(Debug, Clone, Deserialize)]
pub struct CloseTargetResult {
    /// Whether the browser confirmed the close.
    pub success: bool,
}

/// Parameters for `Target.detachFromTarget`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetachFromTargetParams {
    /// Session to detach. Either this or the target id must be set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Parameters for `Target.setAutoAttach`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetAutoAttachParams {
    /// Auto-attach to related targets as they are created.
    pub auto_attach: bool,
    /// Pause newly attached targets until `Runtime.runIfWaitingForDebugger`.
    pub wait_for_debugger_on_start: bool,
    /// Use flat session addressing.
    pub flatten: bool,
}

/// Event: `Target.targetCreated`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetCreatedEvent {
    /// Information about the created target.
    pub target_info: TargetInfo,
}

/// Event: `Target.targetInfoChanged`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetInfoChangedEvent {
    /// Updated target info.
    pub target_info: TargetInfo,
}

/// Event: `Target.targetDestroyed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetDestroyedEvent {
    /// Id of the destroyed target.
    pub target_id: String,
}

/// Event: `Target.attachedToTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedToTargetEvent {
    /// Newly assigned session id.
    pub session_id: String,
    /// Info about the attached target.
    pub target_info: TargetInfo,
    /// True if a parent session initiated the attach.
    pub waiting_for_debugger: bool,
}

/// Event: `Target.detachedFromTarget`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachedFromTargetEvent {
    /// Session id that was detached.
    pub session_id: String,
    /// Target id, when known.
    pub target_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_target_params_serialize_camel_case() {
        let params = CreateTargetParams {
            url: "about:blank".into(),
            browser_context_id: Some("ctx1".into()),
            background: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["url"], "about:blank");
        assert_eq!(json["browserContextId"], "ctx1");
        assert!(json.get("background").is_none());
    }

    #[test]
    fn target_created_event_deserializes() {
        let json = r#"{"targetInfo":{"targetId":"T1","type":"page","title":"","url":"about:blank","attached":true,"browserContextId":"default","openerId":null}}"#;
        let event: TargetCreatedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.target_info.target_id, "T1");
        assert_eq!(event.target_info.browser_context_id.as_deref(), Some("default"));
    }
}
