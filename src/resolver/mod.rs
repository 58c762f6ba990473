//! Provisioning request resolution
//!
//! This module handles:
//! - Collecting `FPGA_REGION_<n>` / `FPGA_AFU_<n>` declarations
//! - Collecting the FPGA port devices passed into the container
//! - Binding every declared region to exactly one device by interface id
//!
//! Matching ignores declaration indices: either every (region, AFU) pair
//! gets its own device or resolution fails and nothing is provisioned.

pub mod devices;
pub mod env;

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, info};

use crate::device::DeviceIdentity;
use crate::error::{self, Result};

pub use env::EnvDeclarations;

/// Canonical form of an FPGA uuid: lower case, no hyphens.
///
/// Two identifiers are the same iff their canonical forms are equal.
pub fn normalize(uuid: &str) -> String {
    uuid.replace('-', "").to_lowercase()
}

/// One AFU to be present in one device's region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningRequest {
    /// Normalized interface id of the region
    pub region: String,
    /// Normalized accelerator type id
    pub afu: String,
    pub device: u32,
}

impl fmt::Display for ProvisioningRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} on device {}", self.region, self.afu, self.device)
    }
}

/// Turns container environment and devices into provisioning requests
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    identity: DeviceIdentity<'a>,
}

impl<'a> Resolver<'a> {
    pub fn new(identity: DeviceIdentity<'a>) -> Self {
        Self { identity }
    }

    /// Resolve `env` (`KEY=VALUE` entries) against `device_paths`
    ///
    /// # Errors
    ///
    /// Returns a resolution error if the declarations are inconsistent, don't
    /// match the number of devices, or a region has no device left with that
    /// interface id. Device identity read failures are propagated.
    pub fn resolve<E, D>(&self, env: &[E], device_paths: &[D]) -> Result<Vec<ProvisioningRequest>>
    where
        E: AsRef<str>,
        D: AsRef<str>,
    {
        let decls = EnvDeclarations::parse(env)?;
        let devices = devices::port_numbers(device_paths);
        debug!(requested = decls.count(), devices = ?devices, "resolving FPGA requests");

        decls.check_counts(devices.len())?;
        decls.check_identifiers()?;
        self.bind(&decls, devices)
    }

    fn bind(
        &self,
        decls: &EnvDeclarations,
        mut devices: BTreeSet<u32>,
    ) -> Result<Vec<ProvisioningRequest>> {
        let mut requests = Vec::with_capacity(decls.count());

        for (region, afu) in decls.pairs() {
            let region = normalize(region);
            let device = self.find_device(&region, &devices)?;
            devices.remove(&device);

            let request = ProvisioningRequest {
                region,
                afu: normalize(afu),
                device,
            };
            info!(%request, "resolved FPGA request");
            requests.push(request);
        }

        Ok(requests)
    }

    fn find_device(&self, region: &str, devices: &BTreeSet<u32>) -> Result<u32> {
        for &device in devices {
            if normalize(&self.identity.interface_id(device)?) == region {
                return Ok(device);
            }
        }
        Err(error::resolve::no_matching_device(region))
    }
}
