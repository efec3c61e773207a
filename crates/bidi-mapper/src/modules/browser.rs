//! `browser` module handlers (spec §3 `UserContext`).

use std::sync::Arc;

use bidi_cdp::protocol::target;
use bidi_types::browser::{
    CreateUserContextParams, CreateUserContextResult, GetUserContextsResult,
    RemoveUserContextParams, UserContextInfo,
};
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;

use super::ok;

pub async fn create_user_context(
    engine: &Arc<MapperEngine>,
    params: CreateUserContextParams,
) -> Result<Value, MapperError> {
    let created: target::CreateBrowserContextResult = engine
        .cdp
        .send_command(
            "Target.createBrowserContext",
            Some(target::CreateBrowserContextParams {
                dispose_on_detach: Some(true),
            }),
            None,
        )
        .await?;

    let user_context = engine.mint_id();
    engine.user_contexts.write().create(user_context.clone());
    engine.register_browser_context(&user_context, &created.browser_context_id);

    let _ = params.accept_insecure_certs;
    let _ = params.proxy;

    ok(CreateUserContextResult { user_context })
}

pub async fn remove_user_context(
    engine: &Arc<MapperEngine>,
    params: RemoveUserContextParams,
) -> Result<Value, MapperError> {
    engine.user_contexts.write().destroy(&params.user_context)?;

    if let Some(browser_context_id) = engine.forget_browser_context(&params.user_context) {
        let _: Value = engine
            .cdp
            .send_command(
                "Target.disposeBrowserContext",
                Some(target::DisposeBrowserContextParams { browser_context_id }),
                None,
            )
            .await?;
    }

    ok(serde_json::json!({}))
}

pub async fn get_user_contexts(engine: &Arc<MapperEngine>) -> Result<Value, MapperError> {
    let user_contexts = engine
        .user_contexts
        .read()
        .all()
        .into_iter()
        .map(|user_context| UserContextInfo { user_context })
        .collect();
    ok(GetUserContextsResult { user_contexts })
}
