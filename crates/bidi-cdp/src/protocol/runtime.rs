//! `Runtime` domain types: execution contexts, evaluation, remote objects,
//! console/exception events consumed by the log-message formatter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique script identifier.
pub type ScriptId = String;

/// Unique execution context identifier.
pub type ExecutionContextId = i64;

/// Mirror object referencing an original JavaScript value.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    /// Object type.
    #[serde(rename = "type")]
    pub object_type: String,
    /// Object subtype hint.
    pub subtype: Option<String>,
    /// Object class name.
    pub class_name: Option<String>,
    /// Remote object value, for primitives and JSON-serializable values.
    pub value: Option<Value>,
    /// Primitive value which can not be JSON-stringified, e.g. `NaN`.
    pub unserializable_value: Option<String>,
    /// String representation of the object.
    pub description: Option<String>,
    /// Unique object identifier, used to keep handles alive on the browser side.
    pub object_id: Option<String>,
}

/// Detailed information about an exception thrown during evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionDetails {
    /// Exception id.
    pub exception_id: i64,
    /// Exception text, as typically displayed in the console.
    pub text: String,
    /// Line number of the exception location, 0-based.
    pub line_number: i64,
    /// Column number of the exception location, 0-based.
    pub column_number: i64,
    /// Script id of the exception location.
    pub script_id: Option<ScriptId>,
    /// URL of the exception location.
    pub url: Option<String>,
    /// Exception object, if any.
    pub exception: Option<RemoteObject>,
    /// Execution context the exception occurred in.
    pub execution_context_id: Option<ExecutionContextId>,
}

/// Parameters for `Runtime.evaluate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateParams {
    /// Expression to evaluate.
    pub expression: String,
    /// Symbolic group name for the result, used for later bulk release.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_group: Option<String>,
    /// Whether to silence exceptions thrown by the expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Execution context to evaluate in; the default context if absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_id: Option<ExecutionContextId>,
    /// Whether the result should be returned by value rather than by reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Whether the evaluation should await a returned promise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
    /// Whether this evaluation should be treated as initiated by a user gesture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_gesture: Option<bool>,
}

/// Result of `Runtime.evaluate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateResult {
    /// Evaluation result.
    pub result: RemoteObject,
    /// Exception details, present if evaluation threw.
    pub exception_details: Option<ExceptionDetails>,
}

/// A single argument to `Runtime.callFunctionOn`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallArgument {
    /// Primitive value or serializable object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Unserializable primitive, e.g. `"Infinity"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unserializable_value: Option<String>,
    /// Remote object handle to pass by reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
}

/// Parameters for `Runtime.callFunctionOn`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnParams {
    /// Function declaration to call.
    pub function_declaration: String,
    /// `this` object handle, when calling a method on a remote object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    /// Call arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<CallArgument>>,
    /// Whether to silence thrown exceptions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silent: Option<bool>,
    /// Whether to return the result by value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_by_value: Option<bool>,
    /// Whether to treat the call as user-gesture initiated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_gesture: Option<bool>,
    /// Whether to await a returned promise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub await_promise: Option<bool>,
    /// Execution context to call the function in, when not calling on an object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<ExecutionContextId>,
    /// Symbolic group name for the result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_group: Option<String>,
}

/// Result of `Runtime.callFunctionOn`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFunctionOnResult {
    /// Call result.
    pub result: RemoteObject,
    /// Exception details, present if the call threw.
    pub exception_details: Option<ExceptionDetails>,
}

/// Parameters for `Runtime.releaseObject`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseObjectParams {
    /// Handle of the object to release.
    pub object_id: String,
}

/// Parameters for `Runtime.releaseObjectGroup`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseObjectGroupParams {
    /// Group of handles to release.
    pub object_group: String,
}

/// Parameters for `Runtime.addBinding`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBindingParams {
    /// Name of the binding function exposed on the global object.
    pub name: String,
    /// Restricts the binding to a single execution context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_context_id: Option<ExecutionContextId>,
}

/// Event: `Runtime.bindingCalled`, carrying the argument passed to an exposed binding.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingCalledEvent {
    /// Name of the binding that was called.
    pub name: String,
    /// Argument the binding was called with, as a raw string.
    pub payload: String,
    /// Execution context the call originated from.
    pub execution_context_id: ExecutionContextId,
}

/// Description of a newly created execution context.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextDescription {
    /// Unique execution context id.
    pub id: ExecutionContextId,
    /// Execution context origin.
    pub origin: String,
    /// Human readable name for the context.
    pub name: String,
    /// Auxiliary frame/worker data, when present.
    pub aux_data: Option<ExecutionContextAuxData>,
}

/// Auxiliary data describing which frame/world an execution context belongs to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextAuxData {
    /// Owning frame id.
    pub frame_id: Option<String>,
    /// Whether this is the frame's default (main-world) context.
    pub is_default: Option<bool>,
    /// Context kind, e.g. `"default"`, `"isolated"`, `"worker"`.
    #[serde(rename = "type")]
    pub context_type: Option<String>,
}

/// Event: `Runtime.executionContextCreated`.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionContextCreatedEvent {
    /// The newly created context.
    pub context: ExecutionContextDescription,
}

/// Event: `Runtime.executionContextDestroyed`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContextDestroyedEvent {
    /// Id of the destroyed context.
    pub execution_context_id: ExecutionContextId,
}

/// Event: `Runtime.executionContextsCleared`, fired on cross-document navigation.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExecutionContextsClearedEvent {}

/// Event: `Runtime.consoleAPICalled`, the source of BiDi `log.entryAdded` messages.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleApiCalledEvent {
    /// Console method invoked, e.g. `"log"`, `"warn"`, `"error"`, `"table"`.
    #[serde(rename = "type")]
    pub call_type: String,
    /// Call arguments, in the order they were passed.
    pub args: Vec<RemoteObject>,
    /// Execution context the call originated from.
    pub execution_context_id: ExecutionContextId,
    /// Timestamp of the call.
    pub timestamp: f64,
    /// Captured stack trace, if any.
    pub stack_trace: Option<StackTrace>,
}

/// Event: `Runtime.exceptionThrown`, the source of BiDi `log.entryAdded` javascript entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionThrownEvent {
    /// Timestamp the exception occurred at.
    pub timestamp: f64,
    /// Full exception details.
    pub exception_details: ExceptionDetails,
}

/// A captured JavaScript call stack.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackTrace {
    /// Stack trace description, e.g. function name for an async stack.
    pub description: Option<String>,
    /// Call frames, innermost first.
    pub call_frames: Vec<CallFrame>,
}

/// A single frame in a captured call stack.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallFrame {
    /// Function name, empty for anonymous functions.
    pub function_name: String,
    /// Script id of the frame's source.
    pub script_id: ScriptId,
    /// Script URL.
    pub url: String,
    /// 0-based line number.
    pub line_number: i64,
    /// 0-based column number.
    pub column_number: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_object_deserializes_primitive() {
        let json = r#"{"type":"number","value":42}"#;
        let obj: RemoteObject = serde_json::from_str(json).unwrap();
        assert_eq!(obj.object_type, "number");
        assert_eq!(obj.value, Some(Value::from(42)));
    }

    #[test]
    fn console_api_called_event_deserializes() {
        let json = r#"{
            "type": "log",
            "args": [{"type":"string","value":"hello"}],
            "executionContextId": 1,
            "timestamp": 1000.0
        }"#;
        let event: ConsoleApiCalledEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.call_type, "log");
        assert_eq!(event.args.len(), 1);
        assert!(event.stack_trace.is_none());
    }

    #[test]
    fn call_argument_with_object_id_omits_value() {
        let arg = CallArgument {
            value: None,
            unserializable_value: None,
            object_id: Some("handle-1".into()),
        };
        let json = serde_json::to_value(&arg).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 1);
    }
}
