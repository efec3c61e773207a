//! CDP event ingestion: translates the browser's `Page`/`Target`/
//! `Runtime`/`Network`/`Fetch` events into the BiDi events the router
//! fans out, and advances the stores' state machines accordingly (spec
//! §4.2 navigation lifecycle, §4.3 network lifecycle, §4.5 realm
//! lifecycle).
//!
//! One task drains the CDP connection's broadcast stream for the whole
//! process lifetime; everything here is a pure translation from a single
//! `CdpEvent` to zero or more store mutations plus zero or more
//! `router::route` calls. No BiDi command handler depends on this module
//! directly — they only read the stores it maintains.

use std::sync::Arc;

use bidi_cdp::protocol::{fetch, network, page, runtime, target};
use bidi_cdp::CdpEvent;
use bidi_types::browsing_context::{ContextCreatedEvent, ContextDestroyedEvent};
use bidi_types::network::{
    AuthRequiredEvent, BaseParameters, FetchErrorEvent, FetchTimingInfo, Header,
    InterceptPhase, RequestData, ResponseContent, ResponseData, ResponseEvent,
};
use bidi_types::script::{LogEntry, LogSource, RealmDestroyedEvent, RealmInfo, RemoteValue};
use serde_json::Value;
use tracing::{trace, warn};

use crate::engine::{now_ms, MapperEngine};
use crate::modules::browsing_context::navigation_info;
use crate::modules::script::remote_object_to_remote_value;
use crate::network::headers;
use crate::router;
use crate::script::log_formatter;
use crate::stores::network::{NetworkRequest, RequestPhase};
use crate::stores::realm::Realm;
use crate::stores::user_context::DEFAULT_USER_CONTEXT;

/// Spawns the event-ingestion task. The returned handle is dropped by the
/// caller; the task runs for the lifetime of the engine.
pub fn spawn_event_loop(engine: Arc<MapperEngine>) -> tokio::task::JoinHandle<()> {
    let mut events = engine.cdp.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => handle_event(&engine, event).await,
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event loop lagged behind the CDP broadcast stream");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

async fn handle_event(engine: &Arc<MapperEngine>, event: CdpEvent) {
    trace!(method = %event.method, "dispatching CDP event");
    let session_id = event.session_id.clone();

    macro_rules! params {
        () => {
            match event.params_as() {
                Ok(p) => p,
                Err(err) => {
                    warn!(method = %event.method, %err, "failed to parse CDP event params");
                    return;
                }
            }
        };
    }

    match event.method.as_str() {
        "Target.attachedToTarget" => on_attached_to_target(engine, params!()).await,
        "Target.detachedFromTarget" => on_detached_from_target(engine, params!()).await,

        "Page.frameNavigated" => {
            let Some(session_id) = session_id else { return };
            on_frame_navigated(engine, &session_id, params!()).await;
        }
        "Page.domContentEventFired" => {
            let Some(session_id) = session_id else { return };
            on_dom_content_event_fired(engine, &session_id, params!()).await;
        }
        "Page.loadEventFired" => {
            let Some(session_id) = session_id else { return };
            on_load_event_fired(engine, &session_id, params!()).await;
        }
        "Page.navigatedWithinDocument" => {
            let Some(session_id) = session_id else { return };
            on_navigated_within_document(engine, &session_id, params!()).await;
        }

        "Runtime.executionContextCreated" => {
            let Some(session_id) = session_id else { return };
            on_execution_context_created(engine, &session_id, params!()).await;
        }
        "Runtime.executionContextDestroyed" => on_execution_context_destroyed(engine, params!()).await,
        "Runtime.executionContextsCleared" => {
            let Some(session_id) = session_id else { return };
            on_execution_contexts_cleared(engine, &session_id).await;
        }
        "Runtime.consoleAPICalled" => {
            let Some(session_id) = session_id else { return };
            on_console_api_called(engine, &session_id, params!()).await;
        }
        "Runtime.exceptionThrown" => {
            let Some(session_id) = session_id else { return };
            on_exception_thrown(engine, &session_id, params!()).await;
        }

        "Network.requestWillBeSent" => {
            let Some(session_id) = session_id else { return };
            on_request_will_be_sent(engine, &session_id, params!()).await;
        }
        "Network.responseReceived" => {
            let Some(session_id) = session_id else { return };
            on_response_received(engine, &session_id, params!()).await;
        }
        "Network.loadingFinished" => {
            let Some(session_id) = session_id else { return };
            on_loading_finished(engine, &session_id, params!()).await;
        }
        "Network.loadingFailed" => {
            let Some(session_id) = session_id else { return };
            on_loading_failed(engine, &session_id, params!()).await;
        }

        "Fetch.requestPaused" => on_request_paused(engine, params!()).await,
        "Fetch.authRequired" => on_auth_required(engine, params!()).await,

        _ => {}
    }
}

// ---------------------------------------------------------------------
// Target / browsingContext lifecycle
// ---------------------------------------------------------------------

async fn on_attached_to_target(engine: &Arc<MapperEngine>, event: target::AttachedToTargetEvent) {
    let info = &event.target_info;
    if info.target_type != "page" {
        return;
    }
    engine.register_session(&info.target_id, &event.session_id);

    if engine.contexts.read().get(&info.target_id).is_ok() {
        // Already registered by the `browsingContext.create` call that
        // triggered this attach; nothing left to do.
        return;
    }

    let user_context = info
        .browser_context_id
        .as_deref()
        .and_then(|id| engine.user_context_for_cdp(id))
        .unwrap_or_else(|| DEFAULT_USER_CONTEXT.to_string());

    // Every tracked browsing context is one CDP target; a popup is a new
    // top-level context, never a child (spec §4.2 has no notion of
    // iframe-level contexts here).
    if engine
        .contexts
        .write()
        .create(info.target_id.clone(), None, &user_context)
        .is_err()
    {
        return;
    }

    router::route(
        engine,
        "browsingContext.contextCreated",
        &info.target_id,
        ContextCreatedEvent {
            context: info.target_id.clone(),
            url: info.url.clone(),
            parent: None,
            user_context,
        },
    );
}

async fn on_detached_from_target(engine: &Arc<MapperEngine>, event: target::DetachedFromTargetEvent) {
    let Some(context) = engine.context_for_session(&event.session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    let destroyed = engine.contexts.write().destroy(&context, true).unwrap_or_default();
    for id in &destroyed {
        let _ = engine.realms.write().destroy_for_context(id);
        engine.forget_session(id);
    }
    for id in &destroyed {
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
}

// ---------------------------------------------------------------------
// Page lifecycle
// ---------------------------------------------------------------------

async fn on_frame_navigated(engine: &Arc<MapperEngine>, session_id: &str, event: page::FrameNavigatedEvent) {
    if event.frame.parent_id.is_some() {
        return;
    }
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };

    let pending = engine
        .contexts
        .read()
        .get(&context)
        .ok()
        .and_then(|c| c.pending_navigation.clone());

    match pending {
        Some(nav) => {
            let _ = engine.contexts.write().response_received(&context, &nav.id);
        }
        None => {
            // Renderer-initiated navigation (e.g. a link click) with no
            // matching `browsingContext.navigate` call; track the URL
            // without a navigation id.
            let _ = engine.contexts.write().set_url(&context, &event.frame.url);
        }
    }
}

async fn on_dom_content_event_fired(
    engine: &Arc<MapperEngine>,
    session_id: &str,
    _event: page::DomContentEventFiredEvent,
) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());
    let Some(nav) = engine
        .contexts
        .read()
        .get(&context)
        .ok()
        .and_then(|c| c.pending_navigation.clone())
    else {
        return;
    };

    engine.mark_navigation_interactive(&nav.id);
    router::route(
        engine,
        "browsingContext.domContentLoaded",
        &top_level,
        navigation_info(&context, Some(nav.id), &nav.url),
    );
}

async fn on_load_event_fired(engine: &Arc<MapperEngine>, session_id: &str, _event: page::LoadEventFiredEvent) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());
    let Some(nav) = engine
        .contexts
        .read()
        .get(&context)
        .ok()
        .and_then(|c| c.pending_navigation.clone())
    else {
        return;
    };

    if engine
        .contexts
        .write()
        .load_event_fired(&context, &nav.id, &nav.url)
        .is_ok()
    {
        engine.mark_navigation_complete(&nav.id);
        router::route(
            engine,
            "browsingContext.load",
            &top_level,
            navigation_info(&context, Some(nav.id), &nav.url),
        );
    }
}

async fn on_navigated_within_document(
    engine: &Arc<MapperEngine>,
    session_id: &str,
    event: page::NavigatedWithinDocumentEvent,
) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    if event.frame_id != context {
        return;
    }
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    let _ = engine.contexts.write().set_url(&context, &event.url);

    // Same-document navigations (history.pushState, hash changes) have no
    // CDP navigation lifecycle of their own; report them as an instantly
    // complete navigation (spec §4.2 testable property #3).
    let navigation_id = engine.mint_id();
    router::route(
        engine,
        "browsingContext.navigationStarted",
        &top_level,
        navigation_info(&context, Some(navigation_id.clone()), &event.url),
    );
    router::route(
        engine,
        "browsingContext.load",
        &top_level,
        navigation_info(&context, Some(navigation_id), &event.url),
    );
}

// ---------------------------------------------------------------------
// Runtime / realm lifecycle
// ---------------------------------------------------------------------

async fn on_execution_context_created(
    engine: &Arc<MapperEngine>,
    session_id: &str,
    event: runtime::ExecutionContextCreatedEvent,
) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    let is_default = event
        .context
        .aux_data
        .as_ref()
        .and_then(|a| a.is_default)
        .unwrap_or(true);
    if !is_default {
        // Isolated worlds/workers never surface as BiDi realms (SPEC_FULL
        // §C.1): only a context's default realm is tracked.
        return;
    }

    let user_context = engine
        .contexts
        .read()
        .get(&context)
        .map(|c| c.user_context.clone())
        .unwrap_or_else(|_| DEFAULT_USER_CONTEXT.to_string());

    let realm_id = engine.mint_id();
    engine.realms.write().create(Realm {
        id: realm_id.clone(),
        context: Some(context.clone()),
        origin: event.context.origin.clone(),
        realm_type: "window".to_string(),
        sandbox: None,
        execution_context_id: Some(event.context.id),
        handles: Vec::new(),
    });

    router::route(
        engine,
        "script.realmCreated",
        &top_level,
        RealmInfo {
            realm: realm_id,
            origin: event.context.origin,
            realm_type: "window".to_string(),
            context: Some(context.clone()),
            sandbox: None,
        },
    );

    for script in engine.preload_scripts.read().applicable(&context, &user_context) {
        let _: Result<runtime::CallFunctionOnResult, _> = engine
            .cdp
            .send_command(
                "Runtime.callFunctionOn",
                Some(runtime::CallFunctionOnParams {
                    function_declaration: script.function_declaration.clone(),
                    object_id: None,
                    arguments: None,
                    silent: Some(true),
                    return_by_value: Some(false),
                    user_gesture: None,
                    await_promise: Some(true),
                    execution_context_id: Some(event.context.id),
                    object_group: None,
                }),
                Some(session_id),
            )
            .await;
    }
}

async fn on_execution_context_destroyed(
    engine: &Arc<MapperEngine>,
    event: runtime::ExecutionContextDestroyedEvent,
) {
    let Some(realm_id) = engine
        .realms
        .read()
        .find_by_execution_context(event.execution_context_id)
        .map(|r| r.id.clone())
    else {
        return;
    };
    let context = engine
        .realms
        .read()
        .get(&realm_id)
        .ok()
        .and_then(|r| r.context.clone());
    engine.realms.write().destroy(&realm_id);

    if let Some(context) = context {
        if let Ok(top_level) = engine.contexts.read().find_top_level(&context) {
            router::route(
                engine,
                "script.realmDestroyed",
                &top_level,
                RealmDestroyedEvent { realm: realm_id },
            );
        }
    }
}

async fn on_execution_contexts_cleared(engine: &Arc<MapperEngine>, session_id: &str) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    for realm in engine.realms.write().destroy_for_context(&context) {
        router::route(
            engine,
            "script.realmDestroyed",
            &top_level,
            RealmDestroyedEvent { realm: realm.id },
        );
    }
}

fn console_level(call_type: &str) -> &'static str {
    match call_type {
        "error" | "assert" => "error",
        "warning" | "warn" => "warn",
        "debug" | "trace" => "debug",
        _ => "info",
    }
}

async fn on_console_api_called(
    engine: &Arc<MapperEngine>,
    session_id: &str,
    event: runtime::ConsoleApiCalledEvent,
) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());
    let Some(realm) = engine
        .realms
        .read()
        .find_by_execution_context(event.execution_context_id)
        .map(|r| r.id.clone())
    else {
        return;
    };

    let args: Vec<RemoteValue> = {
        let mut realms = engine.realms.write();
        event
            .args
            .iter()
            .map(|obj| remote_object_to_remote_value(obj, &mut realms, &realm))
            .collect()
    };

    let text = log_formatter::format(&args).unwrap_or_default();

    router::route(
        engine,
        "log.entryAdded",
        &top_level,
        LogEntry {
            level: console_level(&event.call_type).to_string(),
            source: LogSource {
                realm,
                context: Some(context),
            },
            text,
            timestamp: now_ms(),
            args: Some(args),
        },
    );
}

async fn on_exception_thrown(engine: &Arc<MapperEngine>, session_id: &str, event: runtime::ExceptionThrownEvent) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());
    let execution_context_id = event.exception_details.execution_context_id.unwrap_or_default();
    let Some(realm) = engine
        .realms
        .read()
        .find_by_execution_context(execution_context_id)
        .map(|r| r.id.clone())
    else {
        return;
    };

    let args = event.exception_details.exception.as_ref().map(|obj| {
        let mut realms = engine.realms.write();
        remote_object_to_remote_value(obj, &mut realms, &realm)
    });

    router::route(
        engine,
        "log.entryAdded",
        &top_level,
        LogEntry {
            level: "error".to_string(),
            source: LogSource {
                realm,
                context: Some(context),
            },
            text: event.exception_details.text,
            timestamp: now_ms(),
            args: args.map(|v| vec![v]),
        },
    );
}

// ---------------------------------------------------------------------
// Network / Fetch lifecycle
// ---------------------------------------------------------------------

/// Builds the fields shared by every `network.*` event from a tracked
/// request. `cookies`/`body_size` are always empty/unknown: CDP's
/// `Network.Request` carries neither (SPEC_FULL §C.4).
fn base_parameters(req: &NetworkRequest, is_blocked: bool, intercepts: Vec<String>) -> BaseParameters {
    let headers_size = headers::headers_size(&req.headers);
    BaseParameters {
        context: Some(req.context.clone()),
        is_blocked,
        navigation: req.navigation.clone(),
        redirect_count: req.redirect_count,
        request: RequestData {
            request: req.id.clone(),
            url: req.url.clone(),
            method: req.method.clone(),
            headers: req.headers.clone(),
            cookies: Vec::new(),
            headers_size,
            body_size: None,
            timings: FetchTimingInfo::default(),
        },
        timestamp: now_ms(),
        intercepts: if intercepts.is_empty() { None } else { Some(intercepts) },
    }
}

/// Converts a CDP `Network.Response` to BiDi form. `bytes_received`/
/// `body_size` stay `0`: the byte count only becomes known at
/// `Network.loadingFinished`, by which point the response has already
/// been reported (SPEC_FULL §C.4). CDP's `Response` also carries no
/// `timing` field, so `FetchTimingInfo` on the request side is always
/// the zeroed default.
fn response_to_bidi(response: &network::Response) -> ResponseData {
    let headers = headers::headers_from_map(&response.headers);
    let headers_size = headers::headers_size(&headers);
    ResponseData {
        url: response.url.clone(),
        protocol: response.protocol.clone().unwrap_or_default(),
        status: response.status,
        status_text: response.status_text.clone(),
        from_cache: response.from_disk_cache.unwrap_or(false),
        headers,
        mime_type: response.mime_type.clone(),
        bytes_received: 0,
        headers_size,
        body_size: 0,
        content: ResponseContent::default(),
    }
}

async fn on_request_will_be_sent(
    engine: &Arc<MapperEngine>,
    session_id: &str,
    event: network::RequestWillBeSentEvent,
) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    let navigation = engine
        .contexts
        .read()
        .get(&context)
        .ok()
        .and_then(|c| c.pending_navigation.as_ref().map(|n| n.id.clone()));
    let bidi_headers = headers::headers_from_map(&event.request.headers);

    {
        let mut store = engine.network.write();
        if let Ok(existing) = store.get_mut(&event.request_id) {
            existing.url = event.request.url.clone();
            existing.method = event.request.method.clone();
            existing.headers = bidi_headers.clone();
            existing.redirect_count += 1;
            existing.phase = RequestPhase::BeforeRequestSent;
            existing.resolved = false;
            existing.blocking_intercepts.clear();
        } else {
            store.create(NetworkRequest {
                id: event.request_id.clone(),
                context: context.clone(),
                url: event.request.url.clone(),
                method: event.request.method.clone(),
                headers: bidi_headers,
                navigation,
                redirect_count: 0,
                phase: RequestPhase::BeforeRequestSent,
                blocking_intercepts: Vec::new(),
                resolved: false,
                fetch_request_id: None,
                last_response: None,
            });
        }
    }

    let intercepts = engine
        .intercepts
        .read()
        .matching(InterceptPhase::BeforeRequestSent, &event.request.url, &context);
    if !intercepts.is_empty() {
        let _ = engine.network.write().block_on(&event.request_id, intercepts.clone());
    }

    let Ok(req) = engine.network.read().get(&event.request_id).cloned() else {
        return;
    };
    router::route(
        engine,
        "network.beforeRequestSent",
        &top_level,
        base_parameters(&req, !intercepts.is_empty(), intercepts),
    );
}

async fn on_response_received(engine: &Arc<MapperEngine>, session_id: &str, event: network::ResponseReceivedEvent) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    let response_data = response_to_bidi(&event.response);

    let navigation = {
        let mut store = engine.network.write();
        let Ok(req) = store.get_mut(&event.request_id) else {
            return;
        };
        req.phase = RequestPhase::ResponseStarted;
        req.resolved = false;
        req.blocking_intercepts.clear();
        req.last_response = Some(response_data.clone());
        req.navigation.clone()
    };

    if let Some(nav_id) = navigation {
        let _ = engine.contexts.write().response_received(&context, &nav_id);
    }

    let url = match engine.network.read().get(&event.request_id) {
        Ok(req) => req.url.clone(),
        Err(_) => return,
    };
    let intercepts = engine
        .intercepts
        .read()
        .matching(InterceptPhase::ResponseStarted, &url, &context);
    if !intercepts.is_empty() {
        let _ = engine.network.write().block_on(&event.request_id, intercepts.clone());
    }

    let Ok(req) = engine.network.read().get(&event.request_id).cloned() else {
        return;
    };
    router::route(
        engine,
        "network.responseStarted",
        &top_level,
        ResponseEvent {
            base: base_parameters(&req, !intercepts.is_empty(), intercepts),
            response: response_data,
        },
    );
}

async fn on_loading_finished(engine: &Arc<MapperEngine>, session_id: &str, event: network::LoadingFinishedEvent) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    let Ok(req) = engine.network.read().get(&event.request_id).cloned() else {
        return;
    };
    let Some(response) = req.last_response.clone() else {
        return;
    };

    if let Ok(r) = engine.network.write().get_mut(&event.request_id) {
        r.phase = RequestPhase::ResponseCompleted;
    }

    router::route(
        engine,
        "network.responseCompleted",
        &top_level,
        ResponseEvent {
            base: base_parameters(&req, false, Vec::new()),
            response,
        },
    );

    engine.network.write().destroy(&event.request_id);
}

async fn on_loading_failed(engine: &Arc<MapperEngine>, session_id: &str, event: network::LoadingFailedEvent) {
    let Some(context) = engine.context_for_session(session_id) else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&context)
        .unwrap_or_else(|_| context.clone());

    let Ok(req) = engine.network.read().get(&event.request_id).cloned() else {
        return;
    };

    if let Some(nav_id) = &req.navigation {
        let _ = engine
            .contexts
            .write()
            .fail_navigation(&context, nav_id, event.canceled.unwrap_or(false));
        engine.mark_navigation_failed(nav_id);
        router::route(
            engine,
            "browsingContext.navigationFailed",
            &top_level,
            navigation_info(&context, Some(nav_id.clone()), &req.url),
        );
    }

    router::route(
        engine,
        "network.fetchError",
        &top_level,
        FetchErrorEvent {
            base: base_parameters(&req, false, Vec::new()),
            error_text: event.error_text,
        },
    );

    engine.network.write().destroy(&event.request_id);
}

/// Resolves a `Fetch` event's id back to the `Network`-domain request it
/// belongs to: prefers an explicit `network_id` hint, falls back to
/// assuming the ids are equal, and finally scans for a request already
/// tagged with this `fetch_request_id` (spec §4.3, `Fetch`/`Network` id
/// correlation).
fn correlated_network_id(
    engine: &Arc<MapperEngine>,
    network_id_hint: Option<&str>,
    fetch_request_id: &str,
) -> Option<String> {
    if let Some(hint) = network_id_hint {
        if engine.network.read().get(hint).is_ok() {
            return Some(hint.to_string());
        }
    }
    if engine.network.read().get(fetch_request_id).is_ok() {
        return Some(fetch_request_id.to_string());
    }
    engine
        .network
        .read()
        .find_by_fetch_id(fetch_request_id)
        .map(|r| r.id.clone())
}

/// Lets an unmatched `Fetch`-paused request through unmodified. `Fetch`
/// pauses every request matching its patterns (here, all of them); a
/// request with no BiDi intercept still has to be explicitly continued.
async fn auto_continue(engine: &Arc<MapperEngine>, event: &fetch::RequestPausedEvent) {
    let result: Result<Value, _> = if event.is_response_stage() {
        engine
            .cdp
            .send_command(
                "Fetch.continueResponse",
                Some(fetch::ContinueResponseParams {
                    request_id: event.request_id.clone(),
                    response_code: None,
                    response_phrase: None,
                    response_headers: None,
                }),
                None,
            )
            .await
    } else {
        engine
            .cdp
            .send_command(
                "Fetch.continueRequest",
                Some(fetch::ContinueRequestParams {
                    request_id: event.request_id.clone(),
                    url: None,
                    method: None,
                    post_data: None,
                    headers: None,
                    intercept_response: None,
                }),
                None,
            )
            .await
    };
    if let Err(err) = result {
        warn!(%err, request_id = %event.request_id, "failed to auto-continue an unmatched Fetch request");
    }
}

async fn on_request_paused(engine: &Arc<MapperEngine>, event: fetch::RequestPausedEvent) {
    let Some(network_id) = correlated_network_id(engine, event.network_id.as_deref(), &event.request_id) else {
        auto_continue(engine, &event).await;
        return;
    };

    let context = {
        let mut store = engine.network.write();
        let Ok(req) = store.get_mut(&network_id) else {
            drop(store);
            auto_continue(engine, &event).await;
            return;
        };
        req.fetch_request_id = Some(event.request_id.clone());
        req.context.clone()
    };

    let phase = if event.is_response_stage() {
        InterceptPhase::ResponseStarted
    } else {
        InterceptPhase::BeforeRequestSent
    };
    let intercepts = engine.intercepts.read().matching(phase, &event.request.url, &context);

    if intercepts.is_empty() {
        auto_continue(engine, &event).await;
        return;
    }
    let _ = engine.network.write().block_on(&network_id, intercepts);
}

async fn on_auth_required(engine: &Arc<MapperEngine>, event: fetch::AuthRequiredEvent) {
    let Some(network_id) = correlated_network_id(engine, None, &event.request_id) else {
        let _: Result<Value, _> = engine
            .cdp
            .send_command(
                "Fetch.continueWithAuth",
                Some(fetch::ContinueWithAuthParams {
                    request_id: event.request_id.clone(),
                    auth_challenge_response: fetch::AuthChallengeResponse {
                        response: fetch::AuthChallengeResponseType::Default,
                        username: None,
                        password: None,
                    },
                }),
                None,
            )
            .await;
        return;
    };

    {
        let mut store = engine.network.write();
        if let Ok(r) = store.get_mut(&network_id) {
            r.fetch_request_id = Some(event.request_id.clone());
            r.phase = RequestPhase::AuthRequired;
            r.resolved = false;
            r.blocking_intercepts.clear();
        }
    }

    let Ok(req) = engine.network.read().get(&network_id).cloned() else {
        return;
    };
    let top_level = engine
        .contexts
        .read()
        .find_top_level(&req.context)
        .unwrap_or_else(|_| req.context.clone());

    let intercepts = engine
        .intercepts
        .read()
        .matching(InterceptPhase::AuthRequired, &req.url, &req.context);
    if !intercepts.is_empty() {
        let _ = engine.network.write().block_on(&network_id, intercepts.clone());
    }

    let response = req.last_response.clone().unwrap_or_else(|| ResponseData {
        url: req.url.clone(),
        protocol: String::new(),
        status: 401,
        status_text: String::new(),
        from_cache: false,
        headers: Vec::<Header>::new(),
        mime_type: String::new(),
        bytes_received: 0,
        headers_size: 0,
        body_size: 0,
        content: ResponseContent::default(),
    });

    let blocked = !intercepts.is_empty();
    router::route(
        engine,
        "network.authRequired",
        &top_level,
        AuthRequiredEvent {
            base: base_parameters(&req, blocked, intercepts),
            response,
        },
    );

    if !blocked {
        // No BiDi intercept wants to decide this challenge; let the
        // network stack fall back to its normal (unauthenticated) path
        // rather than leaving the request paused forever.
        let _: Result<Value, _> = engine
            .cdp
            .send_command(
                "Fetch.continueWithAuth",
                Some(fetch::ContinueWithAuthParams {
                    request_id: event.request_id.clone(),
                    auth_challenge_response: fetch::AuthChallengeResponse {
                        response: fetch::AuthChallengeResponseType::Default,
                        username: None,
                        password: None,
                    },
                }),
                None,
            )
            .await;
    }
}
