//! Hook pipeline
//!
//! The provisioning process:
//! 1. Decode the container state and check the opt-in annotation
//! 2. Read the bundle config (environment and devices)
//! 3. Resolve provisioning requests, one per FPGA port device
//! 4. For each request, in order:
//!    - skip if the device already runs the requested AFU
//!    - locate, validate and program the bitstream
//!    - verify the device now reports the requested AFU
//!
//! The first failure aborts the whole invocation.

use std::io::Read;

use tracing::{debug, info};

use crate::bitstream::{self, BitstreamContext};
use crate::bundle::BundleConfig;
use crate::config::HookConfig;
use crate::device::DeviceIdentity;
use crate::error::{self, Result};
use crate::exec::CommandRunner;
use crate::request::{Gate, Request, SkipReason};
use crate::resolver::{ProvisioningRequest, Resolver, normalize};

/// What a hook invocation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The container did not ask for FPGA provisioning
    Skipped(SkipReason),
    /// Every requested device runs its AFU
    Provisioned(Vec<DeviceReport>),
}

/// Final state of one device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    pub request: ProvisioningRequest,
    pub state: ProvisionState,
}

/// How a request reached its verified state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionState {
    AlreadyProgrammed,
    Programmed,
}

/// Provisioning hook bound to a configuration and a tool runner
pub struct Hook<'a> {
    config: &'a HookConfig,
    runner: &'a dyn CommandRunner,
}

impl<'a> Hook<'a> {
    pub fn new(config: &'a HookConfig, runner: &'a dyn CommandRunner) -> Self {
        Self { config, runner }
    }

    /// Run the hook on a container state document
    ///
    /// # Errors
    ///
    /// Returns the first error of any pipeline stage.
    pub fn process<R: Read>(&self, reader: R) -> Result<Outcome> {
        let request = Request::decode(reader)?;

        if let Gate::Skip(reason) = request.gate()? {
            debug!(%reason, "provisioning not requested");
            return Ok(Outcome::Skipped(reason));
        }

        let requests = self.resolve(&request).map_err(error::resolve::context)?;

        let mut reports = Vec::with_capacity(requests.len());
        for request in requests {
            let state = self.provision(&request)?;
            reports.push(DeviceReport { request, state });
        }

        Ok(Outcome::Provisioned(reports))
    }

    fn resolve(&self, request: &Request) -> Result<Vec<ProvisioningRequest>> {
        let bundle = request.bundle_path()?;
        let config = BundleConfig::load(&self.config.bundle_config_path(bundle))?;

        let env = config.env()?;
        let device_paths = config.device_paths()?;

        Resolver::new(self.identity()).resolve(env, &device_paths)
    }

    /// Bring one device to the requested AFU
    fn provision(&self, request: &ProvisioningRequest) -> Result<ProvisionState> {
        let identity = self.identity();

        if normalize(&identity.programmed_afu(request.device)?) == request.afu {
            info!(%request, "AFU already programmed");
            return Ok(ProvisionState::AlreadyProgrammed);
        }

        let located = bitstream::locate(self.config, request)?;
        let bitstream = bitstream::open(
            located,
            BitstreamContext {
                request,
                config: self.config,
                runner: self.runner,
            },
        );

        bitstream.validate()?;
        bitstream.program()?;

        let programmed = identity.programmed_afu(request.device)?;
        if normalize(&programmed) != request.afu {
            return Err(error::program::verification_failed(
                &request.afu,
                programmed,
                request.device,
            ));
        }

        info!(
            %request,
            path = %bitstream.path().display(),
            format = %bitstream.format(),
            "AFU programmed"
        );
        Ok(ProvisionState::Programmed)
    }

    fn identity(&self) -> DeviceIdentity<'a> {
        DeviceIdentity::new(self.config)
    }
}
