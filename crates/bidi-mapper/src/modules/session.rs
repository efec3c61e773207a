//! `session` module handlers (spec §4.4; SPEC_FULL §C.2 rounds out the
//! lifecycle with `status`/`new`/`end`).

use std::sync::Arc;

use bidi_types::session::{
    NewParams, NewResult, StatusResult, SubscribeParams, SubscribeResult, UnsubscribeParams,
};
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;

use super::ok;

/// The mapper is always a single, already-created session (spec §3
/// `Session`: "exactly one; created at startup").
const SESSION_ID: &str = "mapper-session";

pub async fn status(_engine: &Arc<MapperEngine>) -> Result<Value, MapperError> {
    ok(StatusResult {
        ready: false,
        message: "session already created".to_string(),
    })
}

pub async fn new(engine: &Arc<MapperEngine>, params: NewParams) -> Result<Value, MapperError> {
    ok(NewResult {
        session_id: SESSION_ID.to_string(),
        capabilities: params.capabilities.unwrap_or_else(|| {
            serde_json::json!({
                "acceptInsecureCerts": engine.config.accept_insecure_certs,
            })
        }),
    })
}

/// `session.end`: per spec §5 "Cancellation and timeouts", every pending
/// command should resolve with `unknown error: session ended` and the
/// transport should close every channel. Tearing down in-flight commands
/// and the socket is the concrete transport's job (spec §1 "Out of
/// scope"); this handler's own contribution is acknowledging the request.
pub async fn end(_engine: &Arc<MapperEngine>) -> Result<Value, MapperError> {
    ok(serde_json::json!({}))
}

pub async fn subscribe(
    engine: &Arc<MapperEngine>,
    params: SubscribeParams,
    channel: Option<&str>,
) -> Result<Value, MapperError> {
    match params.contexts {
        Some(contexts) if !contexts.is_empty() => {
            let mut subs = engine.subscriptions.write();
            for context in &contexts {
                let top_level = engine.contexts.read().find_top_level(context)?;
                subs.subscribe(&params.events, Some(top_level.as_str()), channel);
            }
        }
        _ => {
            engine.subscriptions.write().subscribe(&params.events, None, channel);
        }
    }
    ok(SubscribeResult::default())
}

pub async fn unsubscribe(
    engine: &Arc<MapperEngine>,
    params: UnsubscribeParams,
    channel: Option<&str>,
) -> Result<Value, MapperError> {
    let contexts: Vec<Option<String>> = match params.contexts {
        Some(contexts) if !contexts.is_empty() => {
            let store = engine.contexts.read();
            contexts
                .iter()
                .map(|c| store.find_top_level(c).map(Some))
                .collect::<Result<_, _>>()?
        }
        _ => Vec::new(),
    };

    engine
        .subscriptions
        .write()
        .unsubscribe_all(&params.events, &contexts, channel)?;
    ok(serde_json::json!({}))
}
