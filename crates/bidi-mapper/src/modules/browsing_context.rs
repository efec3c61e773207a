//! `browsingContext` module handlers (spec §4.2).

use std::sync::Arc;

use bidi_cdp::protocol::{page, target};
use bidi_types::browsing_context::{
    ActivateParams, CloseParams, ContextCreatedEvent, ContextDestroyedEvent, ContextInfo,
    ContextType, CreateParams, CreateResult, GetTreeParams, GetTreeResult, NavigateParams,
    NavigateResult, NavigationInfo, ReadinessState, ReloadParams, TraverseHistoryParams,
};
use serde_json::Value;

use crate::engine::{now_ms, MapperEngine};
use crate::error::MapperError;
use crate::router;
use crate::stores::context::BrowsingContext;
use crate::stores::user_context::DEFAULT_USER_CONTEXT;

use super::ok;

pub(crate) fn navigation_info(context: &str, navigation: Option<String>, url: &str) -> NavigationInfo {
    NavigationInfo {
        context: context.to_string(),
        navigation,
        timestamp: now_ms(),
        url: url.to_string(),
    }
}

pub async fn navigate(engine: &Arc<MapperEngine>, params: NavigateParams) -> Result<Value, MapperError> {
    let top_level = engine.contexts.read().find_top_level(&params.context)?;
    let outcome = engine
        .contexts
        .write()
        .navigate(&params.context, &params.url)?;

    if let Some(superseded) = outcome.superseded.clone() {
        router::route(
            engine,
            "browsingContext.navigationAborted",
            &top_level,
            navigation_info(&params.context, Some(superseded), &params.url),
        );
    }

    engine.mark_navigation_started(&outcome.navigation_id);
    router::route(
        engine,
        "browsingContext.navigationStarted",
        &top_level,
        navigation_info(&params.context, Some(outcome.navigation_id.clone()), &params.url),
    );

    let session = engine.session_for(&params.context)?;
    let _: page::NavigateResult = engine
        .cdp
        .send_command(
            "Page.navigate",
            Some(page::NavigateParams {
                url: params.url.clone(),
                referrer: None,
                frame_id: None,
            }),
            Some(&session),
        )
        .await?;

    let wait = params.wait.unwrap_or(ReadinessState::None);
    let result = engine
        .wait_for_navigation(&outcome.navigation_id, wait)
        .await;
    engine.forget_navigation(&outcome.navigation_id);
    result?;

    ok(NavigateResult {
        navigation: Some(outcome.navigation_id),
        url: params.url,
    })
}

pub async fn reload(engine: &Arc<MapperEngine>, params: ReloadParams) -> Result<Value, MapperError> {
    let top_level = engine.contexts.read().find_top_level(&params.context)?;
    let url = engine.contexts.read().get(&params.context)?.url.clone();
    let outcome = engine.contexts.write().navigate(&params.context, &url)?;

    engine.mark_navigation_started(&outcome.navigation_id);
    router::route(
        engine,
        "browsingContext.navigationStarted",
        &top_level,
        navigation_info(&params.context, Some(outcome.navigation_id.clone()), &url),
    );

    let session = engine.session_for(&params.context)?;
    let _: Value = engine
        .cdp
        .send_command(
            "Page.reload",
            Some(page::ReloadParams {
                ignore_cache: params.ignore_cache,
            }),
            Some(&session),
        )
        .await?;

    let wait = params.wait.unwrap_or(ReadinessState::None);
    let result = engine
        .wait_for_navigation(&outcome.navigation_id, wait)
        .await;
    engine.forget_navigation(&outcome.navigation_id);
    result?;

    ok(NavigateResult {
        navigation: Some(outcome.navigation_id),
        url,
    })
}

pub async fn create(engine: &Arc<MapperEngine>, params: CreateParams) -> Result<Value, MapperError> {
    let user_context = params
        .user_context
        .clone()
        .unwrap_or_else(|| DEFAULT_USER_CONTEXT.to_string());
    if !engine.user_contexts.read().exists(&user_context) {
        return Err(MapperError::no_such_user_context(&user_context));
    }
    let browser_context_id = engine.cdp_browser_context(&user_context);

    let created: target::CreateTargetResult = engine
        .cdp
        .send_command(
            "Target.createTarget",
            Some(target::CreateTargetParams {
                url: "about:blank".to_string(),
                browser_context_id,
                background: Some(!matches!(params.context_type, ContextType::Window)),
            }),
            None,
        )
        .await?;

    let attached: target::AttachToTargetResult = engine
        .cdp
        .send_command(
            "Target.attachToTarget",
            Some(target::AttachToTargetParams {
                target_id: created.target_id.clone(),
                flatten: true,
            }),
            None,
        )
        .await?;

    let context_id = created.target_id;
    engine.contexts.write().create(context_id.clone(), None, &user_context)?;
    engine.register_session(&context_id, &attached.session_id);

    router::route(
        engine,
        "browsingContext.contextCreated",
        &context_id,
        ContextCreatedEvent {
            context: context_id.clone(),
            url: "about:blank".to_string(),
            parent: None,
            user_context,
        },
    );

    ok(CreateResult { context: context_id })
}

pub async fn close(engine: &Arc<MapperEngine>, params: CloseParams) -> Result<Value, MapperError> {
    let top_level = engine.contexts.read().find_top_level(&params.context)?;
    let destroyed_ids = engine.contexts.write().destroy(&params.context, true)?;

    for id in &destroyed_ids {
        let _ = engine.realms.write().destroy_for_context(id);
        let _: Result<target::CloseTargetResult, _> = engine
            .cdp
            .send_command(
                "Target.closeTarget",
                Some(target::CloseTargetParams {
                    target_id: id.clone(),
                }),
                None,
            )
            .await;
        engine.forget_session(id);
    }

    for id in &destroyed_ids {
        router::route(
            engine,
            "browsingContext.contextDestroyed",
            &top_level,
            ContextDestroyedEvent {
                context: id.clone(),
                url: String::new(),
                parent: None,
                user_context: DEFAULT_USER_CONTEXT.to_string(),
            },
        );
    }

    ok(serde_json::json!({}))
}

fn context_info(store: &crate::stores::BrowsingContextStore, ctx: &BrowsingContext) -> ContextInfo {
    ContextInfo {
        context: ctx.id.clone(),
        url: ctx.url.clone(),
        children: ctx
            .children
            .iter()
            .filter_map(|child_id| store.get(child_id).ok())
            .map(|child| context_info(store, child))
            .collect(),
        parent: ctx.parent.clone(),
        user_context: ctx.user_context.clone(),
    }
}

pub async fn get_tree(engine: &Arc<MapperEngine>, params: GetTreeParams) -> Result<Value, MapperError> {
    let store = engine.contexts.read();
    let roots = match &params.root {
        Some(root) => vec![store.get(root)?.id.clone()],
        None => store.top_level_contexts(),
    };
    let contexts = roots
        .iter()
        .filter_map(|id| store.get(id).ok())
        .map(|ctx| context_info(&store, ctx))
        .collect();
    ok(GetTreeResult { contexts })
}

pub async fn activate(engine: &Arc<MapperEngine>, params: ActivateParams) -> Result<Value, MapperError> {
    engine.contexts.read().get(&params.context)?;
    if engine.contexts.read().find_top_level(&params.context)? != params.context {
        return Err(MapperError::invalid_argument(
            "cannot activate a non-top-level context",
        ));
    }
    let session = engine.session_for(&params.context)?;
    let _: Value = engine
        .cdp
        .send_command::<Value, Value>("Target.activateTarget", None, Some(&session))
        .await?;
    ok(serde_json::json!({}))
}

pub async fn traverse_history(
    engine: &Arc<MapperEngine>,
    params: TraverseHistoryParams,
) -> Result<Value, MapperError> {
    engine.contexts.read().get(&params.context)?;
    let session = engine.session_for(&params.context)?;
    let history: page::GetNavigationHistoryResult = engine
        .cdp
        .send_command::<Value, _>("Page.getNavigationHistory", None, Some(&session))
        .await?;

    let target_index = history.current_index + i64::from(params.delta);
    let entry = history
        .entries
        .get(usize::try_from(target_index).map_err(|_| {
            MapperError::invalid_argument("traverseHistory delta is out of range")
        })?)
        .ok_or_else(|| MapperError::invalid_argument("traverseHistory delta is out of range"))?;

    let _: Value = engine
        .cdp
        .send_command(
            "Page.navigateToHistoryEntry",
            Some(page::NavigateToHistoryEntryParams { entry_id: entry.id }),
            Some(&session),
        )
        .await?;

    ok(serde_json::json!({}))
}
