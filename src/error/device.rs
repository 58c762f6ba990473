//! Device identity errors

use super::HookError;

/// Creates an identity read error
pub fn identity_read(
    what: impl Into<String>,
    device: u32,
    path: impl Into<String>,
    source: std::io::Error,
) -> HookError {
    HookError::DeviceIdentityRead {
        what: what.into(),
        device,
        path: path.into(),
        source,
    }
}
