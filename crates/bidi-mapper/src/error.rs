//! Module error type and CDP → BiDi `ErrorCode` fallback mapping (spec §7,
//! SPEC_FULL §C.5).

use bidi_types::ErrorCode;
use thiserror::Error;

/// The error every module handler returns; the dispatcher renders it to a
/// BiDi error frame and never leaks the underlying CDP detail to the wire,
/// only the message text.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct MapperError {
    pub code: ErrorCode,
    pub message: String,
}

impl MapperError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn no_such_frame(context: &str) -> Self {
        Self::new(ErrorCode::NoSuchFrame, format!("no such frame: {context}"))
    }

    #[must_use]
    pub fn no_such_script(script: &str) -> Self {
        Self::new(ErrorCode::NoSuchScript, format!("no such script: {script}"))
    }

    #[must_use]
    pub fn no_such_intercept(intercept: &str) -> Self {
        Self::new(
            ErrorCode::NoSuchIntercept,
            format!("no such intercept: {intercept}"),
        )
    }

    #[must_use]
    pub fn no_such_request(request: &str) -> Self {
        Self::new(ErrorCode::NoSuchRequest, format!("no such request: {request}"))
    }

    #[must_use]
    pub fn no_such_user_context(user_context: &str) -> Self {
        Self::new(
            ErrorCode::NoSuchUserContext,
            format!("no such user context: {user_context}"),
        )
    }

    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    #[must_use]
    pub fn unknown_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnknownError, message)
    }

    #[must_use]
    pub fn unsupported_operation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedOperation, message)
    }
}

/// Maps a raw CDP error message to the closest BiDi `ErrorCode`, per
/// SPEC_FULL §C.5. A handler calls this only after confirming no more
/// specific mapping applies (e.g. a known-missing frame); it exists so
/// "CDP failure with no specific mapping" (spec §7) has an explicit
/// fallback arm instead of a silent default.
#[must_use]
pub fn cdp_error_to_bidi(cdp_message: &str) -> ErrorCode {
    let lower = cdp_message.to_ascii_lowercase();
    if lower.contains("no target with given id") || lower.contains("frame with given id") {
        ErrorCode::NoSuchFrame
    } else if lower.contains("invalid header") || lower.contains("invalid url pattern") {
        ErrorCode::InvalidArgument
    } else if lower.contains("not found") && lower.contains("request") {
        ErrorCode::NoSuchRequest
    } else if lower.contains("not implemented") || lower.contains("not supported") {
        ErrorCode::UnsupportedOperation
    } else {
        ErrorCode::UnknownError
    }
}

impl From<bidi_cdp::CdpError> for MapperError {
    fn from(err: bidi_cdp::CdpError) -> Self {
        let message = err.to_string();
        let code = cdp_error_to_bidi(&message);
        Self::new(code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_missing_target_to_no_such_frame() {
        assert_eq!(
            cdp_error_to_bidi("No target with given id found"),
            ErrorCode::NoSuchFrame
        );
    }

    #[test]
    fn falls_back_to_unknown_error() {
        assert_eq!(cdp_error_to_bidi("somethingelse"), ErrorCode::UnknownError);
    }
}
