//! OCI bundle configuration
//!
//! Reads the subset of the bundle's `config.json` the hook needs: the
//! process environment and the device nodes passed into the container.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::error::{self, Result};

/// The parts of an OCI runtime config used for provisioning
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleConfig {
    #[serde(default)]
    process: Option<Process>,
    #[serde(default)]
    linux: Option<Linux>,
    #[serde(skip)]
    source: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Process {
    #[serde(default)]
    env: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Linux {
    #[serde(default)]
    devices: Option<Vec<Device>>,
}

#[derive(Debug, Clone, Deserialize)]
struct Device {
    path: String,
}

impl BundleConfig {
    /// Load and decode a bundle config file
    ///
    /// # Errors
    ///
    /// Returns `HookError::ConfigRead` if the file can't be opened and
    /// `HookError::Decode` if it is not valid JSON.
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let file = File::open(path).map_err(|e| error::config::read_failed(&display, e))?;

        let mut config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| error::decode::malformed(&display, e))?;
        config.source = display;
        Ok(config)
    }

    /// Decode a bundle config from a string, labelling errors with `source`
    #[cfg(test)]
    pub fn from_json(json: &str, source: &str) -> Result<Self> {
        let mut config: Self =
            serde_json::from_str(json).map_err(|e| error::decode::malformed(source, e))?;
        config.source = source.to_string();
        Ok(config)
    }

    /// `process.env` entries (`KEY=VALUE`)
    ///
    /// # Errors
    ///
    /// Returns `HookError::MissingField` if `process` or `process.env` is absent.
    pub fn env(&self) -> Result<&[String]> {
        let process = self
            .process
            .as_ref()
            .ok_or_else(|| error::config::missing_field("process", &self.source))?;

        process.env.as_deref().ok_or_else(|| {
            error::config::missing_field("env", format!("the 'process' struct in {}", self.source))
        })
    }

    /// `linux.devices[].path` values
    ///
    /// # Errors
    ///
    /// Returns `HookError::MissingField` if `linux` or `linux.devices` is absent.
    pub fn device_paths(&self) -> Result<Vec<&str>> {
        let linux = self
            .linux
            .as_ref()
            .ok_or_else(|| error::config::missing_field("linux", &self.source))?;

        let devices = linux.devices.as_deref().ok_or_else(|| {
            error::config::missing_field("devices", format!("the 'linux' struct in {}", self.source))
        })?;

        Ok(devices.iter().map(|d| d.path.as_str()).collect())
    }
}
