//! Malformed document errors

use super::HookError;

/// Creates a decode error for the named document
pub fn malformed(what: impl Into<String>, source: serde_json::Error) -> HookError {
    HookError::Decode {
        what: what.into(),
        source,
    }
}
