//! Resolution errors

use super::HookError;

/// Creates an invalid environment error
pub fn invalid_environment(message: impl Into<String>) -> HookError {
    HookError::InvalidEnvironment {
        message: message.into(),
    }
}

/// Creates a device count mismatch error
pub fn device_count_mismatch(declared: usize, allocated: usize) -> HookError {
    HookError::DeviceCountMismatch {
        declared,
        allocated,
    }
}

/// Creates a no matching device error
pub fn no_matching_device(interface_id: impl Into<String>) -> HookError {
    HookError::NoMatchingDevice {
        interface_id: interface_id.into(),
    }
}

/// Wraps any resolution failure with the stage context
pub fn context(source: HookError) -> HookError {
    HookError::Resolution {
        source: Box::new(source),
    }
}
