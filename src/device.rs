//! Hardware-reported device identities
//!
//! The FPGA driver exposes the programmed AFU and the region interface id
//! as plain text sysfs attributes. Values are read fresh on every call.

use std::path::Path;

use tracing::trace;

use crate::config::HookConfig;
use crate::error::{self, Result};

/// Reads identity attributes of FPGA devices
#[derive(Debug, Clone, Copy)]
pub struct DeviceIdentity<'a> {
    config: &'a HookConfig,
}

impl<'a> DeviceIdentity<'a> {
    pub fn new(config: &'a HookConfig) -> Self {
        Self { config }
    }

    /// AFU currently programmed into the device's port
    ///
    /// # Errors
    ///
    /// Returns `HookError::DeviceIdentityRead` if the attribute can't be read.
    pub fn programmed_afu(&self, device: u32) -> Result<String> {
        read_attribute("AFU id", device, &self.config.afu_id_path(device))
    }

    /// Interface id of the device's reconfigurable region
    ///
    /// # Errors
    ///
    /// Returns `HookError::DeviceIdentityRead` if the attribute can't be read.
    pub fn interface_id(&self, device: u32) -> Result<String> {
        read_attribute("interface id", device, &self.config.interface_id_path(device))
    }
}

fn read_attribute(what: &str, device: u32, path: &Path) -> Result<String> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| error::device::identity_read(what, device, path.display().to_string(), e))?;
    let value = data.trim().to_string();
    trace!(device, path = %path.display(), %value, "read {what}");
    Ok(value)
}
