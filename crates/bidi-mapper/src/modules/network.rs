//! `network` module handlers (spec §4.3).

use std::sync::Arc;

use bidi_cdp::protocol::fetch;
use bidi_types::network::{
    AddInterceptParams, AddInterceptResult, AuthCredentialsAction, CacheBehavior,
    ContinueRequestParams, ContinueResponseParams, ContinueWithAuthParams, FailRequestParams,
    ProvideResponseParams, RemoveInterceptParams, SetCacheBehaviorParams,
};
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;
use crate::network::headers;
use crate::stores::context::BrowsingContextStore;
use crate::stores::intercept::Intercept;
use crate::stores::network::RequestPhase;

use super::ok;

/// Resolves a blocked request's current phase back to a concrete
/// `Fetch` call, checking the request is in one of `allowed` phases
/// (spec §4.3 "Allowed phases") and the double-resolution guard.
fn ensure_resolvable(
    engine: &Arc<MapperEngine>,
    request: &str,
    allowed: &[RequestPhase],
) -> Result<(), MapperError> {
    let phase = engine.network.read().get(request)?.phase;
    if !allowed.contains(&phase) {
        return Err(MapperError::invalid_argument(format!(
            "request {request} is in phase {phase:?}, which does not allow this action"
        )));
    }
    engine.network.write().resolve(request)
}

/// The CDP `Fetch` domain request id to use for `request`. `Fetch` and
/// `Network` ids are not guaranteed equal: falls back to `request` itself
/// when no `Fetch.requestPaused` has been observed for it yet (e.g. a
/// request that was never actually intercepted).
fn resolve_fetch_id(engine: &Arc<MapperEngine>, request: &str) -> Result<String, MapperError> {
    Ok(engine
        .network
        .read()
        .get(request)?
        .fetch_request_id
        .clone()
        .unwrap_or_else(|| request.to_string()))
}

pub async fn add_intercept(
    engine: &Arc<MapperEngine>,
    params: AddInterceptParams,
) -> Result<Value, MapperError> {
    if let Some(contexts) = &params.contexts {
        let store: &BrowsingContextStore = &engine.contexts.read();
        for context in contexts {
            store.get(context)?;
        }
    }

    let id = engine.mint_id();
    engine.intercepts.write().add(Intercept {
        id: id.clone(),
        phases: params.phases,
        url_patterns: params.url_patterns,
        contexts: params.contexts,
    });

    ok(AddInterceptResult { intercept: id })
}

pub async fn remove_intercept(
    engine: &Arc<MapperEngine>,
    params: RemoveInterceptParams,
) -> Result<Value, MapperError> {
    engine.intercepts.write().remove(&params.intercept)?;
    ok(serde_json::json!({}))
}

pub async fn continue_request(
    engine: &Arc<MapperEngine>,
    params: ContinueRequestParams,
) -> Result<Value, MapperError> {
    ensure_resolvable(engine, &params.request, &[RequestPhase::BeforeRequestSent])?;
    let request_id = resolve_fetch_id(engine, &params.request)?;

    let cdp_headers = params
        .headers
        .as_ref()
        .map(|hs| hs.iter().map(headers::to_cdp).collect());

    let _: Value = engine
        .cdp
        .send_command(
            "Fetch.continueRequest",
            Some(fetch::ContinueRequestParams {
                request_id,
                url: params.url,
                method: params.method,
                post_data: params.body.as_ref().map(|b| b.to_cdp_string()),
                headers: cdp_headers,
                intercept_response: None,
            }),
            None,
        )
        .await?;

    ok(serde_json::json!({}))
}

pub async fn continue_response(
    engine: &Arc<MapperEngine>,
    params: ContinueResponseParams,
) -> Result<Value, MapperError> {
    ensure_resolvable(
        engine,
        &params.request,
        &[RequestPhase::ResponseStarted, RequestPhase::AuthRequired],
    )?;
    let request_id = resolve_fetch_id(engine, &params.request)?;

    let cdp_headers = params
        .headers
        .as_ref()
        .map(|hs| hs.iter().map(headers::to_cdp).collect());

    let _: Value = engine
        .cdp
        .send_command(
            "Fetch.continueResponse",
            Some(fetch::ContinueResponseParams {
                request_id,
                response_code: params.status_code.map(|c| c as i32),
                response_phrase: params.reason_phrase,
                response_headers: cdp_headers,
            }),
            None,
        )
        .await?;

    ok(serde_json::json!({}))
}

pub async fn continue_with_auth(
    engine: &Arc<MapperEngine>,
    params: ContinueWithAuthParams,
) -> Result<Value, MapperError> {
    ensure_resolvable(engine, &params.request, &[RequestPhase::AuthRequired])?;
    let request_id = resolve_fetch_id(engine, &params.request)?;

    let response = match params.action {
        AuthCredentialsAction::Default => fetch::AuthChallengeResponse {
            response: fetch::AuthChallengeResponseType::Default,
            username: None,
            password: None,
        },
        AuthCredentialsAction::Cancel => fetch::AuthChallengeResponse::cancel(),
        AuthCredentialsAction::ProvideCredentials { username, password } => {
            fetch::AuthChallengeResponse::provide_credentials(username, password)
        }
    };

    let _: Value = engine
        .cdp
        .send_command(
            "Fetch.continueWithAuth",
            Some(fetch::ContinueWithAuthParams {
                request_id,
                auth_challenge_response: response,
            }),
            None,
        )
        .await?;

    ok(serde_json::json!({}))
}

pub async fn provide_response(
    engine: &Arc<MapperEngine>,
    params: ProvideResponseParams,
) -> Result<Value, MapperError> {
    ensure_resolvable(
        engine,
        &params.request,
        &[
            RequestPhase::BeforeRequestSent,
            RequestPhase::ResponseStarted,
            RequestPhase::AuthRequired,
        ],
    )?;
    let request_id = resolve_fetch_id(engine, &params.request)?;

    let cdp_headers = params
        .headers
        .as_ref()
        .map(|hs| hs.iter().map(headers::to_cdp).collect());

    let _: Value = engine
        .cdp
        .send_command(
            "Fetch.fulfillRequest",
            Some(fetch::FulfillRequestParams {
                request_id,
                response_code: params.status_code.map_or(200, |c| c as i32),
                response_headers: cdp_headers,
                body: params.body.as_ref().map(|b| b.to_cdp_string()),
                response_phrase: params.reason_phrase,
            }),
            None,
        )
        .await?;

    ok(serde_json::json!({}))
}

pub async fn fail_request(
    engine: &Arc<MapperEngine>,
    params: FailRequestParams,
) -> Result<Value, MapperError> {
    ensure_resolvable(
        engine,
        &params.request,
        &[
            RequestPhase::BeforeRequestSent,
            RequestPhase::ResponseStarted,
            RequestPhase::AuthRequired,
        ],
    )?;
    let request_id = resolve_fetch_id(engine, &params.request)?;

    let _: Value = engine
        .cdp
        .send_command(
            "Fetch.failRequest",
            Some(fetch::FailRequestParams {
                request_id,
                error_reason: fetch::ErrorReason::Failed,
            }),
            None,
        )
        .await?;

    ok(serde_json::json!({}))
}

pub async fn set_cache_behavior(
    engine: &Arc<MapperEngine>,
    params: SetCacheBehaviorParams,
) -> Result<Value, MapperError> {
    if let Some(contexts) = &params.contexts {
        let store = engine.contexts.read();
        for context in contexts {
            store.get(context)?;
        }
    }

    let disabled = matches!(params.cache_behavior, CacheBehavior::Bypass);
    let sessions: Vec<String> = match &params.contexts {
        Some(contexts) => contexts
            .iter()
            .filter_map(|c| engine.session_for(c).ok())
            .collect(),
        None => Vec::new(),
    };

    if sessions.is_empty() {
        let _: Value = engine
            .cdp
            .send_command(
                "Network.setCacheDisabled",
                Some(serde_json::json!({ "cacheDisabled": disabled })),
                None,
            )
            .await?;
    } else {
        for session in sessions {
            let _: Value = engine
                .cdp
                .send_command(
                    "Network.setCacheDisabled",
                    Some(serde_json::json!({ "cacheDisabled": disabled })),
                    Some(&session),
                )
                .await?;
        }
    }

    ok(serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_resolvable_rejects_double_resolution() {
        let mut store = crate::stores::NetworkStore::new();
        store.create(crate::stores::network::NetworkRequest {
            id: "r1".into(),
            context: "ctx1".into(),
            url: "https://a.test/".into(),
            method: "GET".into(),
            headers: Vec::new(),
            navigation: None,
            redirect_count: 0,
            phase: RequestPhase::BeforeRequestSent,
            blocking_intercepts: Vec::new(),
            resolved: false,
            fetch_request_id: None,
            last_response: None,
        });
        assert!(store.resolve("r1").is_ok());
        assert!(store.resolve("r1").is_err());
    }

    #[test]
    fn allowed_phases_reject_a_request_not_yet_in_that_phase() {
        let mut store = crate::stores::NetworkStore::new();
        store.create(crate::stores::network::NetworkRequest {
            id: "r1".into(),
            context: "ctx1".into(),
            url: "https://a.test/".into(),
            method: "GET".into(),
            headers: Vec::new(),
            navigation: None,
            redirect_count: 0,
            phase: RequestPhase::BeforeRequestSent,
            blocking_intercepts: Vec::new(),
            resolved: false,
            fetch_request_id: None,
            last_response: None,
        });
        let phase = store.get("r1").unwrap().phase;
        let allowed = [RequestPhase::AuthRequired];
        assert!(!allowed.contains(&phase));
    }
}
