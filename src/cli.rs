//! CLI definitions using clap derive API
//!
//! The hook is started by the container runtime without arguments; every
//! option defaults to the standard Intel FPGA software layout. The hidden
//! overrides exist for non-standard installations and for tests.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{self, HookConfig};

/// FPGA provisioning hook for OCI containers
///
/// Reads the container state from stdin and programs the requested AFUs into
/// the container's FPGA devices before it starts.
#[derive(Parser, Debug)]
#[command(
    name = "fpga-crihook",
    author,
    version,
    about = "OCI prestart hook that programs FPGA regions for a container",
    after_help = "Containers opt in with the annotation com.intel.fpga.mode=fpga.intel.com/region\n\
                  and request functions with FPGA_REGION_<n>/FPGA_AFU_<n> environment pairs."
)]
pub struct Cli {
    /// Enable verbose output on stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Bitstream repository root
    #[arg(long, env = "FPGA_CRIHOOK_BITSTREAM_DIR", default_value = config::BITSTREAM_DIR, hide = true)]
    pub bitstream_dir: PathBuf,

    /// Runtime config file name inside the bundle
    #[arg(long, env = "FPGA_CRIHOOK_BUNDLE_CONFIG", default_value = config::BUNDLE_CONFIG, hide = true)]
    pub bundle_config: String,

    /// OPAE packager
    #[arg(long, env = "FPGA_CRIHOOK_PACKAGER", default_value = config::PACKAGER, hide = true)]
    pub packager: PathBuf,

    /// OPAE fpgaconf wrapper
    #[arg(long, env = "FPGA_CRIHOOK_FPGACONF", default_value = config::FPGACONF, hide = true)]
    pub fpgaconf: PathBuf,

    /// OpenCL aocl wrapper
    #[arg(long, env = "FPGA_CRIHOOK_AOCL", default_value = config::AOCL, hide = true)]
    pub aocl: PathBuf,

    /// sysfs path of a device's programmed AFU id ({dev} is the device number)
    #[arg(long, env = "FPGA_CRIHOOK_AFU_ID_TEMPLATE", default_value = config::AFU_ID_TEMPLATE, hide = true)]
    pub afu_id_template: String,

    /// sysfs path of a device's interface id ({dev} is the device number)
    #[arg(
        long,
        env = "FPGA_CRIHOOK_INTERFACE_ID_TEMPLATE",
        default_value = config::INTERFACE_ID_TEMPLATE,
        hide = true
    )]
    pub interface_id_template: String,
}

impl Cli {
    pub fn hook_config(&self) -> HookConfig {
        HookConfig {
            bitstream_dir: self.bitstream_dir.clone(),
            bundle_config: self.bundle_config.clone(),
            packager: self.packager.clone(),
            fpgaconf: self.fpgaconf.clone(),
            aocl: self.aocl.clone(),
            afu_id_template: self.afu_id_template.clone(),
            interface_id_template: self.interface_id_template.clone(),
        }
    }
}
