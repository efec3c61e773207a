//! `script` module handlers (spec §4.5).
//!
//! `RemoteValue` <-> CDP `Runtime.RemoteObject`/`CallArgument` conversion
//! lives here: inline JSON for anything `Runtime.evaluate` could return by
//! value, a registered handle for anything it couldn't.

use std::sync::Arc;

use bidi_cdp::protocol::runtime;
use bidi_types::script::{
    AddPreloadScriptParams, AddPreloadScriptResult, CallFunctionParams, DisownParams,
    EvaluateParams, EvaluateResult, ExceptionDetails, JsonNumber, LocalValue,
    RemovePreloadScriptParams, RemoteValue, StackTrace, Target,
};
use serde_json::Value;

use crate::engine::MapperEngine;
use crate::error::MapperError;
use crate::stores::realm::RealmStore;

use super::ok;

fn json_to_remote_value(value: &Value) -> RemoteValue {
    match value {
        Value::Null => RemoteValue::Null,
        Value::Bool(b) => RemoteValue::Boolean { value: *b },
        Value::Number(n) => RemoteValue::Number {
            value: JsonNumber::Finite(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => RemoteValue::String { value: s.clone() },
        Value::Array(items) => RemoteValue::Array {
            value: Some(items.iter().map(json_to_remote_value).collect()),
            handle: None,
        },
        Value::Object(map) => RemoteValue::Object {
            value: Some(
                map.iter()
                    .map(|(k, v)| {
                        (
                            RemoteValue::String { value: k.clone() },
                            json_to_remote_value(v),
                        )
                    })
                    .collect(),
            ),
            handle: None,
        },
    }
}

fn remote_value_to_json(value: &RemoteValue) -> Value {
    match value {
        RemoteValue::Undefined | RemoteValue::Null => Value::Null,
        RemoteValue::String { value } | RemoteValue::BigInt { value } | RemoteValue::Date { value } => {
            Value::String(value.clone())
        }
        RemoteValue::Number {
            value: JsonNumber::Finite(n),
        } => serde_json::json!(n),
        RemoteValue::Number {
            value: JsonNumber::Special(s),
        } => Value::String(s.clone()),
        RemoteValue::Boolean { value } => Value::Bool(*value),
        RemoteValue::Array {
            value: Some(items), ..
        } => Value::Array(items.iter().map(remote_value_to_json).collect()),
        RemoteValue::Object {
            value: Some(pairs), ..
        } => {
            let mut map = serde_json::Map::new();
            for (key, value) in pairs {
                if let RemoteValue::String { value: key } = key {
                    map.insert(key.clone(), remote_value_to_json(value));
                }
            }
            Value::Object(map)
        }
        _ => Value::Null,
    }
}

/// Converts a CDP `Runtime.RemoteObject` into a BiDi `RemoteValue`,
/// registering a handle against `realm` when CDP could not return the
/// value inline.
pub(crate) fn remote_object_to_remote_value(
    obj: &runtime::RemoteObject,
    realms: &mut RealmStore,
    realm: &str,
) -> RemoteValue {
    match obj.object_type.as_str() {
        "undefined" => RemoteValue::Undefined,
        "string" => RemoteValue::String {
            value: obj
                .value
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        },
        "number" => {
            if let Some(n) = obj.value.as_ref().and_then(Value::as_f64) {
                RemoteValue::Number {
                    value: JsonNumber::Finite(n),
                }
            } else if let Some(special) = &obj.unserializable_value {
                RemoteValue::Number {
                    value: JsonNumber::Special(special.clone()),
                }
            } else {
                RemoteValue::Number {
                    value: JsonNumber::Finite(0.0),
                }
            }
        }
        "boolean" => RemoteValue::Boolean {
            value: obj.value.as_ref().and_then(Value::as_bool).unwrap_or_default(),
        },
        "bigint" => RemoteValue::BigInt {
            value: obj.unserializable_value.clone().unwrap_or_default(),
        },
        "object" if obj.subtype.as_deref() == Some("null") => RemoteValue::Null,
        _ => {
            if let Some(value) = &obj.value {
                return json_to_remote_value(value);
            }
            let handle = obj.object_id.clone();
            if let Some(handle) = &handle {
                let _ = realms.register_handle(realm, handle.clone());
            }
            match obj.subtype.as_deref() {
                Some("array") => RemoteValue::Array { value: None, handle },
                _ => RemoteValue::Object { value: None, handle },
            }
        }
    }
}

fn local_value_to_call_argument(
    value: &LocalValue,
    realms: &RealmStore,
    realm: &str,
) -> Result<runtime::CallArgument, MapperError> {
    let arg = match value {
        RemoteValue::Undefined => runtime::CallArgument {
            value: None,
            unserializable_value: None,
            object_id: None,
        },
        RemoteValue::Null => runtime::CallArgument {
            value: Some(Value::Null),
            unserializable_value: None,
            object_id: None,
        },
        RemoteValue::String { value } => runtime::CallArgument {
            value: Some(Value::String(value.clone())),
            unserializable_value: None,
            object_id: None,
        },
        RemoteValue::Number {
            value: JsonNumber::Finite(n),
        } => runtime::CallArgument {
            value: Some(serde_json::json!(n)),
            unserializable_value: None,
            object_id: None,
        },
        RemoteValue::Number {
            value: JsonNumber::Special(s),
        } => runtime::CallArgument {
            value: None,
            unserializable_value: Some(s.clone()),
            object_id: None,
        },
        RemoteValue::Boolean { value } => runtime::CallArgument {
            value: Some(Value::Bool(*value)),
            unserializable_value: None,
            object_id: None,
        },
        RemoteValue::BigInt { value } => runtime::CallArgument {
            value: None,
            unserializable_value: Some(format!("{value}n")),
            object_id: None,
        },
        RemoteValue::Array { handle: Some(h), .. }
        | RemoteValue::Object { handle: Some(h), .. }
        | RemoteValue::Node { handle: Some(h) }
        | RemoteValue::Error { handle: Some(h) } => {
            if !realms.is_handle_valid(realm, h) {
                return Err(MapperError::invalid_argument(format!("invalid handle: {h}")));
            }
            runtime::CallArgument {
                value: None,
                unserializable_value: None,
                object_id: Some(h.clone()),
            }
        }
        RemoteValue::Array { .. } | RemoteValue::Object { .. } => runtime::CallArgument {
            value: Some(remote_value_to_json(value)),
            unserializable_value: None,
            object_id: None,
        },
        RemoteValue::Map { .. } | RemoteValue::Set { .. } | RemoteValue::Date { .. } | RemoteValue::RegExp { .. } => {
            runtime::CallArgument {
                value: Some(remote_value_to_json(value)),
                unserializable_value: None,
                object_id: None,
            }
        }
        RemoteValue::Node { handle: None } | RemoteValue::Error { handle: None } => {
            return Err(MapperError::invalid_argument("argument has no handle"));
        }
    };
    Ok(arg)
}

/// Resolves a `script` module `Target` to the realm and CDP session it runs
/// against. A `Target::Context` with `sandbox: None` resolves to the
/// context's default realm; a named sandbox resolves to that realm if it
/// already exists, or fails with `no such script` otherwise (sandbox realms
/// are created lazily by the browser on first preload-script delivery).
fn resolve_target(
    engine: &Arc<MapperEngine>,
    target: &Target,
) -> Result<(String, String, Option<i64>), MapperError> {
    match target {
        Target::Realm { realm } => {
            let realms = engine.realms.read();
            let r = realms.get(realm)?;
            let context = r
                .context
                .clone()
                .ok_or_else(|| MapperError::unknown_error("realm has no owning context"))?;
            let session = engine.session_for(&context)?;
            Ok((realm.clone(), session, r.execution_context_id))
        }
        Target::Context { context, sandbox } => {
            engine.contexts.read().get(context)?;
            let session = engine.session_for(context)?;
            let realms = engine.realms.read();
            let realm = realms.realm_for_target(context, sandbox.as_deref())?;
            Ok((realm.id.clone(), session, realm.execution_context_id))
        }
    }
}

pub async fn evaluate(engine: &Arc<MapperEngine>, params: EvaluateParams) -> Result<Value, MapperError> {
    let (realm, session, context_id) = resolve_target(engine, &params.target)?;

    let result: runtime::EvaluateResult = engine
        .cdp
        .send_command(
            "Runtime.evaluate",
            Some(runtime::EvaluateParams {
                expression: params.expression,
                object_group: None,
                silent: Some(true),
                context_id,
                return_by_value: Some(true),
                await_promise: Some(params.await_promise),
                user_gesture: params.user_activation,
            }),
            Some(&session),
        )
        .await?;

    let mut realms = engine.realms.write();
    let evaluate_result = if let Some(exception) = result.exception_details {
        EvaluateResult::Exception {
            exception_details: cdp_exception_to_bidi(&exception, &mut realms, &realm),
            realm,
        }
    } else {
        EvaluateResult::Success {
            result: remote_object_to_remote_value(&result.result, &mut realms, &realm),
            realm,
        }
    };

    ok(evaluate_result)
}

pub async fn call_function(
    engine: &Arc<MapperEngine>,
    params: CallFunctionParams,
) -> Result<Value, MapperError> {
    let (realm, session, context_id) = resolve_target(engine, &params.target)?;

    let this_object_id = match &params.this {
        Some(this) => {
            let realms = engine.realms.read();
            local_value_to_call_argument(this, &realms, &realm)?.object_id
        }
        None => None,
    };

    let arguments = {
        let realms = engine.realms.read();
        params
            .arguments
            .iter()
            .map(|a| local_value_to_call_argument(a, &realms, &realm))
            .collect::<Result<Vec<_>, _>>()?
    };

    let result: runtime::CallFunctionOnResult = engine
        .cdp
        .send_command(
            "Runtime.callFunctionOn",
            Some(runtime::CallFunctionOnParams {
                function_declaration: params.function_declaration,
                object_id: this_object_id,
                arguments: Some(arguments),
                silent: Some(true),
                return_by_value: Some(true),
                user_gesture: params.user_activation,
                await_promise: Some(params.await_promise),
                execution_context_id: if this_object_id.is_none() {
                    context_id
                } else {
                    None
                },
                object_group: None,
            }),
            Some(&session),
        )
        .await?;

    let mut realms = engine.realms.write();
    let evaluate_result = if let Some(exception) = result.exception_details {
        EvaluateResult::Exception {
            exception_details: cdp_exception_to_bidi(&exception, &mut realms, &realm),
            realm,
        }
    } else {
        EvaluateResult::Success {
            result: remote_object_to_remote_value(&result.result, &mut realms, &realm),
            realm,
        }
    };

    ok(evaluate_result)
}

fn cdp_exception_to_bidi(
    exception: &runtime::ExceptionDetails,
    realms: &mut RealmStore,
    realm: &str,
) -> ExceptionDetails {
    let value = exception
        .exception
        .as_ref()
        .map(|obj| remote_object_to_remote_value(obj, realms, realm))
        .unwrap_or(RemoteValue::Undefined);

    ExceptionDetails {
        column_number: u64::try_from(exception.column_number).unwrap_or(0),
        exception: value,
        line_number: u64::try_from(exception.line_number).unwrap_or(0),
        stack_trace: StackTrace::default(),
        text: exception.text.clone(),
    }
}

pub async fn disown(engine: &Arc<MapperEngine>, params: DisownParams) -> Result<Value, MapperError> {
    let (realm, _session, _context_id) = resolve_target(engine, &params.target)?;
    for handle in &params.handles {
        let _: Result<Value, _> = engine
            .cdp
            .send_command(
                "Runtime.releaseObject",
                Some(runtime::ReleaseObjectParams {
                    object_id: handle.clone(),
                }),
                None,
            )
            .await;
    }
    engine.realms.write().disown(&realm, &params.handles)?;
    ok(serde_json::json!({}))
}

pub async fn add_preload_script(
    engine: &Arc<MapperEngine>,
    params: AddPreloadScriptParams,
) -> Result<Value, MapperError> {
    let id = engine.mint_id();
    engine
        .preload_scripts
        .write()
        .add(crate::stores::preload_script::PreloadScript {
            id: id.clone(),
            function_declaration: params.function_declaration,
            sandbox: params.sandbox,
            contexts: params.contexts,
            user_contexts: params.user_contexts,
        });
    ok(AddPreloadScriptResult { script: id })
}

pub async fn remove_preload_script(
    engine: &Arc<MapperEngine>,
    params: RemovePreloadScriptParams,
) -> Result<Value, MapperError> {
    engine.preload_scripts.write().remove(&params.script)?;
    ok(serde_json::json!({}))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_object_roundtrips_through_remote_value() {
        let json = serde_json::json!({"a": 1, "b": [true, null]});
        let remote = json_to_remote_value(&json);
        let back = remote_value_to_json(&remote);
        assert_eq!(json, back);
    }
}
