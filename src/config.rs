//! Hook configuration
//!
//! Every filesystem location the hook touches lives in [`HookConfig`]. The
//! defaults match the Intel FPGA software stack layout; the CLI can override
//! each one.

use std::path::{Path, PathBuf};

/// Root of the bitstream repository (`<root>/<region>/<afu>.<ext>`)
pub const BITSTREAM_DIR: &str = "/srv/intel.com/fpga";

/// OPAE packager, used for `gbs-info`
pub const PACKAGER: &str = "/opt/intel/fpga-sw/opae/bin/packager";

/// OPAE configuration tool wrapper
pub const FPGACONF: &str = "/opt/intel/fpga-sw/opae/fpgaconf-wrapper";

/// OpenCL `aocl` wrapper
pub const AOCL: &str = "/opt/intel/fpga-sw/opencl/aocl-wrapper";

/// Name of the OCI runtime config inside a bundle
pub const BUNDLE_CONFIG: &str = "config.json";

/// Placeholder replaced with the device number in sysfs templates
pub const DEVICE_PLACEHOLDER: &str = "{dev}";

/// Currently programmed AFU of a device's port
pub const AFU_ID_TEMPLATE: &str = "/sys/class/fpga/intel-fpga-dev.{dev}/intel-fpga-port.{dev}/afu_id";

/// Interface id of a device's FME partial reconfiguration region
pub const INTERFACE_ID_TEMPLATE: &str =
    "/sys/class/fpga/intel-fpga-dev.{dev}/intel-fpga-fme.{dev}/pr/interface_id";

/// Paths and tool locations used by a hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookConfig {
    pub bitstream_dir: PathBuf,
    pub bundle_config: String,
    pub packager: PathBuf,
    pub fpgaconf: PathBuf,
    pub aocl: PathBuf,
    pub afu_id_template: String,
    pub interface_id_template: String,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            bitstream_dir: PathBuf::from(BITSTREAM_DIR),
            bundle_config: BUNDLE_CONFIG.to_string(),
            packager: PathBuf::from(PACKAGER),
            fpgaconf: PathBuf::from(FPGACONF),
            aocl: PathBuf::from(AOCL),
            afu_id_template: AFU_ID_TEMPLATE.to_string(),
            interface_id_template: INTERFACE_ID_TEMPLATE.to_string(),
        }
    }
}

impl HookConfig {
    /// Path of the `afu_id` file for a device
    pub fn afu_id_path(&self, device: u32) -> PathBuf {
        expand_template(&self.afu_id_template, device)
    }

    /// Path of the `interface_id` file for a device
    pub fn interface_id_path(&self, device: u32) -> PathBuf {
        expand_template(&self.interface_id_template, device)
    }

    /// Directory holding the bitstreams for a region
    pub fn region_dir(&self, region: &str) -> PathBuf {
        self.bitstream_dir.join(region)
    }

    /// Bundle config file inside a bundle root
    pub fn bundle_config_path(&self, bundle: &Path) -> PathBuf {
        bundle.join(&self.bundle_config)
    }
}

/// Only one region per device is supported, so the device, port and FME
/// numbers are all the same and every placeholder gets the device number.
fn expand_template(template: &str, device: u32) -> PathBuf {
    PathBuf::from(template.replace(DEVICE_PLACEHOLDER, &device.to_string()))
}
