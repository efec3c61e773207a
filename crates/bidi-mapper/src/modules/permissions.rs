//! `permissions` module handlers (W3C Permissions spec, per spec §1).

use std::sync::Arc;

use bidi_cdp::protocol::browser;
use bidi_types::permissions::{PermissionState, SetPermissionParams};
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;
use crate::stores::user_context::DEFAULT_USER_CONTEXT;

use super::ok;

pub async fn set_permission(
    engine: &Arc<MapperEngine>,
    params: SetPermissionParams,
) -> Result<Value, MapperError> {
    let permission_type = browser::PermissionType::from_bidi_name(&params.descriptor.name)
        .ok_or_else(|| MapperError::invalid_argument(format!("unknown permission: {}", params.descriptor.name)))?;

    let user_context = params
        .user_context
        .unwrap_or_else(|| DEFAULT_USER_CONTEXT.to_string());
    if !engine.user_contexts.read().exists(&user_context) {
        return Err(MapperError::no_such_user_context(&user_context));
    }
    let browser_context_id = engine.cdp_browser_context(&user_context);

    let setting = match params.state {
        PermissionState::Granted => browser::PermissionSetting::Granted,
        PermissionState::Denied => browser::PermissionSetting::Denied,
        PermissionState::Prompt => browser::PermissionSetting::Prompt,
    };

    let name = serde_json::to_value(permission_type)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();

    let _: Value = engine
        .cdp
        .send_command(
            "Browser.setPermission",
            Some(browser::SetPermissionParams {
                permission: browser::PermissionDescriptor::new(name),
                setting,
                origin: params.origin,
                browser_context_id,
            }),
            None,
        )
        .await?;

    ok(serde_json::json!({}))
}
