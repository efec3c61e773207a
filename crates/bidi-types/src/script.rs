//! `script` module params/results (spec §4.5).
//!
//! `RemoteValue` deliberately stops at primitives, arrays/objects, dates,
//! regexes, and opaque handles — `browsingContext.locateNodes`/DOM node
//! references are out of scope (SPEC_FULL §C.1).

use serde::{Deserialize, Serialize};

/// A realm identifier.
pub type Realm = String;
/// An opaque remote object handle, valid until its realm is destroyed or
/// `script.disown` releases it.
pub type Handle = String;

/// The BiDi `RemoteValue` tree: the result of evaluating or calling a
/// function, or an argument passed into one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RemoteValue {
    Undefined,
    Null,
    String {
        value: String,
    },
    Number {
        value: JsonNumber,
    },
    Boolean {
        value: bool,
    },
    BigInt {
        value: String,
    },
    Date {
        value: String,
    },
    #[serde(rename = "regexp")]
    RegExp {
        value: RegExpValue,
    },
    Array {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Vec<RemoteValue>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        handle: Option<Handle>,
    },
    Object {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<Vec<(RemoteValue, RemoteValue)>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        handle: Option<Handle>,
    },
    Map {
        value: Vec<(RemoteValue, RemoteValue)>,
    },
    Set {
        value: Vec<RemoteValue>,
    },
    /// An object the mapper could not, or chose not to, serialize inline;
    /// only a handle is returned.
    Node {
        handle: Option<Handle>,
    },
    /// Any other object type the wire schema does not special-case; kept
    /// as an opaque handle.
    Error {
        handle: Option<Handle>,
    },
}

/// A JSON number that also carries BiDi's special non-finite spellings
/// (`"NaN"`, `"Infinity"`, `"-Infinity"`, `"-0"`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum JsonNumber {
    Finite(f64),
    Special(String),
}

/// A regular expression value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegExpValue {
    pub pattern: String,
    #[serde(default)]
    pub flags: Option<String>,
}

/// An argument to `script.callFunction`, symmetric with `RemoteValue` but
/// additionally allowing a bare handle reference or a channel value.
pub type LocalValue = RemoteValue;

/// Target a script runs against: either a realm directly, or a context
/// (optionally a specific sandbox within it).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Target {
    Realm { realm: Realm },
    Context { context: String, sandbox: Option<String> },
}

/// Parameters for `script.evaluate`.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateParams {
    pub expression: String,
    pub target: Target,
    pub await_promise: bool,
    #[serde(default)]
    pub user_activation: Option<bool>,
}

/// The exception detail carried by an evaluation that threw.
#[derive(Debug, Clone, Serialize)]
pub struct ExceptionDetails {
    pub column_number: u64,
    pub exception: RemoteValue,
    pub line_number: u64,
    pub stack_trace: StackTrace,
    pub text: String,
}

/// A captured JS call stack.
#[derive(Debug, Clone, Serialize, Default)]
pub struct StackTrace {
    pub call_frames: Vec<StackFrame>,
}

/// A single frame of a captured call stack.
#[derive(Debug, Clone, Serialize)]
pub struct StackFrame {
    pub column_number: u64,
    pub function_name: String,
    pub line_number: u64,
    pub url: String,
}

/// Result of `script.evaluate`/`callFunction`: either the evaluation result,
/// or that it threw.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EvaluateResult {
    Success {
        result: RemoteValue,
        realm: Realm,
    },
    Exception {
        exception_details: ExceptionDetails,
        realm: Realm,
    },
}

/// Parameters for `script.callFunction`.
#[derive(Debug, Clone, Deserialize)]
pub struct CallFunctionParams {
    pub function_declaration: String,
    pub await_promise: bool,
    pub target: Target,
    #[serde(default)]
    pub arguments: Vec<LocalValue>,
    #[serde(default)]
    pub this: Option<LocalValue>,
    #[serde(default)]
    pub user_activation: Option<bool>,
}

/// Parameters for `script.disown`.
#[derive(Debug, Clone, Deserialize)]
pub struct DisownParams {
    pub handles: Vec<Handle>,
    pub target: Target,
}

/// Sandbox filter restricting which new realms a preload script applies to.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PreloadScriptTargetFilter {
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}

/// Parameters for `script.addPreloadScript`.
#[derive(Debug, Clone, Deserialize)]
pub struct AddPreloadScriptParams {
    pub function_declaration: String,
    #[serde(default)]
    pub sandbox: Option<String>,
    #[serde(default)]
    pub contexts: Option<Vec<String>>,
    #[serde(default)]
    pub user_contexts: Option<Vec<String>>,
}

/// Result of `script.addPreloadScript`.
#[derive(Debug, Clone, Serialize)]
pub struct AddPreloadScriptResult {
    pub script: String,
}

/// Parameters for `script.removePreloadScript`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemovePreloadScriptParams {
    pub script: String,
}

/// Event: `script.realmCreated`.
#[derive(Debug, Clone, Serialize)]
pub struct RealmInfo {
    pub realm: Realm,
    pub origin: String,
    #[serde(rename = "type")]
    pub realm_type: String,
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<String>,
}

/// Event: `script.realmDestroyed`.
#[derive(Debug, Clone, Serialize)]
pub struct RealmDestroyedEvent {
    pub realm: Realm,
}

/// A single remote-value argument consumed by the console-message formatter
/// (SPEC_FULL / spec §4.5).
pub type ConsoleArg = RemoteValue;

/// Extra, freeform metadata that accompanies a formatted console message.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub level: String,
    pub source: LogSource,
    pub text: String,
    pub timestamp: u64,
    pub args: Option<Vec<ConsoleArg>>,
}

/// Identifies the realm/context a log message originated from.
#[derive(Debug, Clone, Serialize)]
pub struct LogSource {
    pub realm: Realm,
    pub context: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_value_string_roundtrips() {
        let value = RemoteValue::String {
            value: "hi".into(),
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json, serde_json::json!({"type": "string", "value": "hi"}));
    }

    #[test]
    fn json_number_accepts_special_spellings() {
        let raw = serde_json::json!("NaN");
        let n: JsonNumber = serde_json::from_value(raw).unwrap();
        assert!(matches!(n, JsonNumber::Special(s) if s == "NaN"));
    }
}
