//! Per-module command handlers (spec §4.1 "Method dispatch"): a pure
//! mapping from the BiDi `method` string to a module entrypoint, built as
//! a static match rather than a runtime-registered table (spec §9
//! "Dynamic dispatch on method name becomes a static map built at
//! startup").

pub mod browser;
pub mod browsing_context;
pub mod input;
pub mod network;
pub mod permissions;
pub mod script;
pub mod session;
pub mod storage;

use std::sync::Arc;

use bidi_types::ErrorCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;

/// Deserializes `params` against a method's schema, translating a
/// failure into `ErrorCode::InvalidArgument` with serde's own field
/// pointer as the message (spec §4.1 "Schema validation before routing").
pub(crate) fn parse<T: DeserializeOwned>(params: Value) -> Result<T, MapperError> {
    serde_json::from_value(params).map_err(|e| MapperError::invalid_argument(e.to_string()))
}

/// Serializes a module's typed result back to the wire `Value` the
/// dispatcher embeds in the success frame.
pub(crate) fn ok<T: Serialize>(result: T) -> Result<Value, MapperError> {
    serde_json::to_value(result)
        .map_err(|e| MapperError::unknown_error(format!("failed to serialize result: {e}")))
}

/// Routes a validated `(method, params)` pair to its owning module entry
/// point. Unmapped methods fail with `ErrorCode::UnknownCommand` (spec
/// §4.1).
pub async fn handle(
    engine: &Arc<MapperEngine>,
    method: &str,
    params: Value,
    channel: Option<&str>,
) -> Result<Value, MapperError> {
    match method {
        "session.status" => session::status(engine).await,
        "session.new" => session::new(engine, parse(params)?).await,
        "session.end" => session::end(engine).await,
        "session.subscribe" => session::subscribe(engine, parse(params)?, channel).await,
        "session.unsubscribe" => session::unsubscribe(engine, parse(params)?, channel).await,

        "browsingContext.navigate" => browsing_context::navigate(engine, parse(params)?).await,
        "browsingContext.reload" => browsing_context::reload(engine, parse(params)?).await,
        "browsingContext.create" => browsing_context::create(engine, parse(params)?).await,
        "browsingContext.close" => browsing_context::close(engine, parse(params)?).await,
        "browsingContext.getTree" => browsing_context::get_tree(engine, parse(params)?).await,
        "browsingContext.activate" => browsing_context::activate(engine, parse(params)?).await,
        "browsingContext.traverseHistory" => {
            browsing_context::traverse_history(engine, parse(params)?).await
        }

        "network.addIntercept" => network::add_intercept(engine, parse(params)?).await,
        "network.removeIntercept" => network::remove_intercept(engine, parse(params)?).await,
        "network.continueRequest" => network::continue_request(engine, parse(params)?).await,
        "network.continueResponse" => network::continue_response(engine, parse(params)?).await,
        "network.continueWithAuth" => network::continue_with_auth(engine, parse(params)?).await,
        "network.provideResponse" => network::provide_response(engine, parse(params)?).await,
        "network.failRequest" => network::fail_request(engine, parse(params)?).await,
        "network.setCacheBehavior" => network::set_cache_behavior(engine, parse(params)?).await,

        "script.evaluate" => script::evaluate(engine, parse(params)?).await,
        "script.callFunction" => script::call_function(engine, parse(params)?).await,
        "script.disown" => script::disown(engine, parse(params)?).await,
        "script.addPreloadScript" => script::add_preload_script(engine, parse(params)?).await,
        "script.removePreloadScript" => {
            script::remove_preload_script(engine, parse(params)?).await
        }

        "input.performActions" => input::perform_actions(engine, parse(params)?).await,
        "input.releaseActions" => input::release_actions(engine, parse(params)?).await,

        "permissions.setPermission" => permissions::set_permission(engine, parse(params)?).await,

        "browser.createUserContext" => browser::create_user_context(engine, parse(params)?).await,
        "browser.removeUserContext" => browser::remove_user_context(engine, parse(params)?).await,
        "browser.getUserContexts" => browser::get_user_contexts(engine).await,

        "storage.getCookies" => storage::get_cookies(engine, parse(params)?).await,
        "storage.setCookie" => storage::set_cookie(engine, parse(params)?).await,
        "storage.deleteCookies" => storage::delete_cookies(engine, parse(params)?).await,

        _ => Err(MapperError::new(
            ErrorCode::UnknownCommand,
            format!("unknown command: {method}"),
        )),
    }
}
