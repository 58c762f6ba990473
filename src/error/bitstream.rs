//! Bitstream location and validation errors

use super::HookError;
use crate::exec::ToolError;

/// Creates a bitstream not found error
pub fn not_found(region: impl Into<String>, afu: impl Into<String>) -> HookError {
    HookError::BitstreamNotFound {
        region: region.into(),
        afu: afu.into(),
    }
}

/// Creates a stat failed error
pub fn stat_failed(path: impl Into<String>, source: std::io::Error) -> HookError {
    HookError::BitstreamStat {
        path: path.into(),
        source,
    }
}

/// Creates an info unavailable error
pub fn info_unavailable(
    region: impl Into<String>,
    afu: impl Into<String>,
    output: impl Into<String>,
    source: ToolError,
) -> HookError {
    HookError::BitstreamInfoUnavailable {
        region: region.into(),
        afu: afu.into(),
        output: super::captured_output(output),
        source,
    }
}

/// Creates a missing metadata field error
pub fn field_missing(
    region: impl Into<String>,
    afu: impl Into<String>,
    field: impl Into<String>,
) -> HookError {
    HookError::BitstreamFieldMissing {
        region: region.into(),
        afu: afu.into(),
        field: field.into(),
    }
}

/// Creates an interface mismatch error
pub fn interface_mismatch(
    region: impl Into<String>,
    interface_uuid: impl Into<String>,
) -> HookError {
    HookError::InterfaceMismatch {
        region: region.into(),
        interface_uuid: interface_uuid.into(),
    }
}

/// Creates an AFU mismatch error
pub fn afu_mismatch(afu: impl Into<String>, accelerator_type_uuid: impl Into<String>) -> HookError {
    HookError::AfuMismatch {
        afu: afu.into(),
        accelerator_type_uuid: accelerator_type_uuid.into(),
    }
}
