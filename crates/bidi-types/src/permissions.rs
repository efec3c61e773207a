//! `permissions` module params (W3C Permissions spec, per spec §1).

use serde::Deserialize;

/// A permission name, e.g. `"geolocation"`, `"camera"`.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionDescriptor {
    pub name: String,
}

/// The state `permissions.setPermission` grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

/// Parameters for `permissions.setPermission`.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPermissionParams {
    pub descriptor: PermissionDescriptor,
    pub state: PermissionState,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub user_context: Option<String>,
}
