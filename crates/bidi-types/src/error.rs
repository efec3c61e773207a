//! The BiDi `ErrorCode` taxonomy (spec §7).

use serde::{Deserialize, Serialize};

/// The fixed set of error codes a BiDi error frame may carry.
///
/// Serializes exactly as its wire spelling (`"no such frame"`, etc.) — BiDi
/// error codes are space-separated words, not camelCase or kebab-case
/// identifiers, so each variant carries an explicit `rename`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Schema failure; bad URL pattern; double intercept resolution;
    /// unsubscribe of a non-existent subscription.
    #[serde(rename = "invalid argument")]
    InvalidArgument,
    /// Unknown context id.
    #[serde(rename = "no such frame")]
    NoSuchFrame,
    /// Unknown preload script.
    #[serde(rename = "no such script")]
    NoSuchScript,
    /// Unknown intercept.
    #[serde(rename = "no such intercept")]
    NoSuchIntercept,
    /// Unknown network request.
    #[serde(rename = "no such request")]
    NoSuchRequest,
    /// Unknown user context.
    #[serde(rename = "no such user context")]
    NoSuchUserContext,
    /// Unmapped method.
    #[serde(rename = "unknown command")]
    UnknownCommand,
    /// CDP failure with no specific mapping; timeouts.
    #[serde(rename = "unknown error")]
    UnknownError,
    /// Method valid but not implementable on the current browser.
    #[serde(rename = "unsupported operation")]
    UnsupportedOperation,
    /// Browser handshake failed.
    #[serde(rename = "session not created")]
    SessionNotCreated,
}

impl ErrorCode {
    /// The wire spelling of this error code, e.g. `"no such frame"`.
    #[must_use]
    pub fn as_wire_str(self) -> &'static str {
        match self {
            Self::InvalidArgument => "invalid argument",
            Self::NoSuchFrame => "no such frame",
            Self::NoSuchScript => "no such script",
            Self::NoSuchIntercept => "no such intercept",
            Self::NoSuchRequest => "no such request",
            Self::NoSuchUserContext => "no such user context",
            Self::UnknownCommand => "unknown command",
            Self::UnknownError => "unknown error",
            Self::UnsupportedOperation => "unsupported operation",
            Self::SessionNotCreated => "session not created",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_kebab_space_wire_form() {
        let json = serde_json::to_string(&ErrorCode::NoSuchFrame).unwrap();
        assert_eq!(json, "\"no such frame\"");
    }

    #[test]
    fn display_matches_wire_str() {
        assert_eq!(ErrorCode::UnknownCommand.to_string(), "unknown command");
    }
}
