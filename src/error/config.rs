//! Configuration errors

use super::HookError;

/// Creates a missing field error
pub fn missing_field(field: impl Into<String>, document: impl Into<String>) -> HookError {
    HookError::MissingField {
        field: field.into(),
        document: document.into(),
    }
}

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, source: std::io::Error) -> HookError {
    HookError::ConfigRead {
        path: path.into(),
        source,
    }
}
