//! Programming and verification errors

use super::HookError;
use crate::exec::ToolError;
use crate::resolver::ProvisioningRequest;

/// Creates a program failed error for a request
pub fn failed(
    request: &ProvisioningRequest,
    output: impl Into<String>,
    source: ToolError,
) -> HookError {
    HookError::ProgramFailed {
        afu: request.afu.clone(),
        device: request.device,
        region: request.region.clone(),
        output: super::captured_output(output),
        source,
    }
}

/// Creates a verification failed error
pub fn verification_failed(
    requested: impl Into<String>,
    actual: impl Into<String>,
    device: u32,
) -> HookError {
    HookError::VerificationFailed {
        requested: requested.into(),
        actual: actual.into(),
        device,
    }
}
