//! Bitstream formats
//!
//! Two formats are supported, selected by the extension found in the
//! repository:
//!
//! - **gbs** (OPAE): carries the interface and accelerator type ids, which
//!   are checked against the request before programming
//! - **aocx** (OpenCL): opaque; only its placement in the repository vouches
//!   for it, so validation is a no-op
//!
//! Both implement [`Bitstream`].

pub mod locate;
pub mod opae;
pub mod opencl;

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use tracing::info;

use crate::config::HookConfig;
use crate::error::{self, Result};
use crate::exec::CommandRunner;
use crate::resolver::ProvisioningRequest;

pub use locate::{Located, locate};

/// Known bitstream formats in lookup priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitstreamFormat {
    Gbs,
    Aocx,
}

impl BitstreamFormat {
    /// Lookup order used by the locator
    pub const PRIORITY: [BitstreamFormat; 2] = [BitstreamFormat::Gbs, BitstreamFormat::Aocx];

    /// File extension including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            BitstreamFormat::Gbs => ".gbs",
            BitstreamFormat::Aocx => ".aocx",
        }
    }
}

impl fmt::Display for BitstreamFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.extension()[1..])
    }
}

/// Everything a bitstream needs to validate and program itself
#[derive(Clone, Copy)]
pub struct BitstreamContext<'a> {
    pub request: &'a ProvisioningRequest,
    pub config: &'a HookConfig,
    pub runner: &'a dyn CommandRunner,
}

/// A located bitstream that can check itself against a request and be
/// programmed into the request's device
pub trait Bitstream {
    fn path(&self) -> &Path;

    fn format(&self) -> BitstreamFormat;

    /// Check that the bitstream is built for the requested region and AFU
    fn validate(&self) -> Result<()>;

    /// Program the bitstream into the device
    fn program(&self) -> Result<()>;
}

/// Wrap a located file in the implementation for its format
pub fn open<'a>(located: Located, ctx: BitstreamContext<'a>) -> Box<dyn Bitstream + 'a> {
    match located.format {
        BitstreamFormat::Gbs => Box::new(opae::OpaeBitstream::new(located.path, ctx)),
        BitstreamFormat::Aocx => Box::new(opencl::OpenClBitstream::new(located.path, ctx)),
    }
}

/// Run a programming tool, failing with its combined output
fn run_programmer(ctx: &BitstreamContext<'_>, tool: &Path, args: Vec<OsString>) -> Result<()> {
    info!(request = %ctx.request, tool = %tool.display(), "programming device");

    let output = ctx
        .runner
        .run(tool, &args)
        .map_err(|e| error::program::failed(ctx.request, "", e))?;

    output
        .check(tool)
        .map_err(|e| error::program::failed(ctx.request, output.combined(), e))
}

fn path_arg(path: &Path) -> OsString {
    path.as_os_str().to_os_string()
}
