//! `Browser` domain types: permissions and top-level browser management,
//! the CDP counterpart of BiDi's `permissions` and `browser` modules.

use serde::{Deserialize, Serialize};

/// Permission kind understood by `Browser.grantPermissions`/`setPermission`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionType {
    /// Accessibility events permission.
    AccessibilityEvents,
    /// Audio capture permission.
    AudioCapture,
    /// Background sync permission.
    BackgroundSync,
    /// Background fetch permission.
    BackgroundFetch,
    /// Clipboard read/write permission.
    ClipboardReadWrite,
    /// Clipboard sanitized write permission.
    ClipboardSanitizedWrite,
    /// Display capture permission.
    DisplayCapture,
    /// Durable storage permission.
    DurableStorage,
    /// Geolocation permission.
    Geolocation,
    /// Idle detection permission.
    IdleDetection,
    /// Local fonts permission.
    LocalFonts,
    /// MIDI permission.
    Midi,
    /// MIDI sysex permission.
    MidiSysex,
    /// Notifications permission.
    Notifications,
    /// Payment handler permission.
    PaymentHandler,
    /// Periodic background sync permission.
    PeriodicBackgroundSync,
    /// Screen wake lock permission.
    WakeLockScreen,
    /// Storage access permission.
    StorageAccess,
    /// Top-level storage access permission.
    TopLevelStorageAccess,
    /// Video capture permission.
    VideoCapture,
    /// Window management permission.
    WindowManagement,
}

impl PermissionType {
    /// Maps a BiDi `permissions.PermissionDescriptor.name` onto a CDP permission, if known.
    pub fn from_bidi_name(name: &str) -> Option<Self> {
        Some(match name {
            "accessibility-events" => Self::AccessibilityEvents,
            "microphone" => Self::AudioCapture,
            "background-sync" => Self::BackgroundSync,
            "background-fetch" => Self::BackgroundFetch,
            "clipboard-read" | "clipboard-write" => Self::ClipboardReadWrite,
            "display-capture" => Self::DisplayCapture,
            "durable-storage" => Self::DurableStorage,
            "geolocation" => Self::Geolocation,
            "idle-detection" => Self::IdleDetection,
            "local-fonts" => Self::LocalFonts,
            "midi" => Self::Midi,
            "notifications" => Self::Notifications,
            "payment-handler" => Self::PaymentHandler,
            "periodic-background-sync" => Self::PeriodicBackgroundSync,
            "screen-wake-lock" => Self::WakeLockScreen,
            "storage-access" => Self::StorageAccess,
            "top-level-storage-access" => Self::TopLevelStorageAccess,
            "camera" => Self::VideoCapture,
            "window-management" => Self::WindowManagement,
            _ => return None,
        })
    }
}

/// Result of a permission grant/query, mirroring BiDi's `PermissionState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum PermissionSetting {
    /// Permission is granted.
    #[default]
    Granted,
    /// Permission is denied.
    Denied,
    /// Permission requires a user prompt.
    Prompt,
}

/// Descriptor identifying which permission to act on.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionDescriptor {
    /// Permission name, matching [`PermissionType::as_str`](PermissionType).
    pub name: String,
}

impl PermissionDescriptor {
    /// Creates a descriptor for the given permission name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Parameters for `Browser.setPermission`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPermissionParams {
    /// Permission descriptor.
    pub permission: PermissionDescriptor,
    /// Value to set.
    pub setting: PermissionSetting,
    /// Origin to scope the permission to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Browser context to scope the permission to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
}

/// Parameters for `Browser.resetPermissions`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResetPermissionsParams {
    /// Browser context to reset permissions for; every context if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub browser_context_id: Option<String>,
}

/// Parameters for `Browser.close`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct CloseParams {}

/// Parameters for `Browser.getVersion`.
#[derive(Debug, Clone, Serialize, Default)]
pub struct GetVersionParams {}

/// Result of `Browser.getVersion`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetVersionResult {
    /// CDP protocol version.
    pub protocol_version: String,
    /// Product name, e.g. `"HeadlessChrome/120.0.0.0"`.
    pub product: String,
    /// Product revision.
    pub revision: String,
    /// Browser User-Agent string.
    pub user_agent: String,
    /// V8 version in use.
    pub js_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bidi_name_maps_known_permission() {
        assert_eq!(
            PermissionType::from_bidi_name("geolocation"),
            Some(PermissionType::Geolocation)
        );
        assert_eq!(PermissionType::from_bidi_name("camera"), Some(PermissionType::VideoCapture));
    }

    #[test]
    fn from_bidi_name_rejects_unknown_permission() {
        assert_eq!(PermissionType::from_bidi_name("not-a-real-permission"), None);
    }

    #[test]
    fn set_permission_params_omit_absent_scope() {
        let params = SetPermissionParams {
            permission: PermissionDescriptor::new("geolocation"),
            setting: PermissionSetting::Granted,
            origin: Some("https://example.test".into()),
            browser_context_id: None,
        };
        let json = serde_json::to_value(&params).unwrap();
        assert!(json.get("browserContextId").is_none());
        assert_eq!(json["setting"], "granted");
    }
}
