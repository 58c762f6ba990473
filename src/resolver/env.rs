//! FPGA environment declarations
//!
//! Containers request functions with `FPGA_REGION_<n>` / `FPGA_AFU_<n>`
//! pairs. The index `<n>` only pairs a region with its AFU; it carries no
//! ordering or device meaning.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{self, Result};

pub const REGION_PREFIX: &str = "FPGA_REGION_";
pub const AFU_PREFIX: &str = "FPGA_AFU_";

/// Region and AFU declarations keyed by index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvDeclarations {
    regions: BTreeMap<String, String>,
    afus: BTreeMap<String, String>,
    indices: BTreeSet<String>,
}

impl EnvDeclarations {
    /// Collect FPGA declarations from `KEY=VALUE` entries
    ///
    /// Entries without an FPGA prefix are ignored. A later declaration of the
    /// same key replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns `HookError::InvalidEnvironment` for an FPGA entry without `=`.
    pub fn parse<S: AsRef<str>>(env: &[S]) -> Result<Self> {
        let mut decls = Self::default();

        for entry in env {
            let entry = entry.as_ref();
            let (key, value) = match entry.split_once('=') {
                Some(pair) => pair,
                None if is_fpga_key(entry) => {
                    return Err(error::resolve::invalid_environment(format!(
                        "Malformed FPGA environment variable '{entry}'"
                    )));
                }
                None => continue,
            };

            if let Some(index) = key.strip_prefix(REGION_PREFIX) {
                decls.regions.insert(index.to_string(), value.to_string());
                decls.indices.insert(index.to_string());
            } else if let Some(index) = key.strip_prefix(AFU_PREFIX) {
                decls.afus.insert(index.to_string(), value.to_string());
                decls.indices.insert(index.to_string());
            }
        }

        Ok(decls)
    }

    /// Check that regions and AFUs pair up and cover exactly `devices` devices
    ///
    /// # Errors
    ///
    /// Returns `HookError::InvalidEnvironment` or `HookError::DeviceCountMismatch`.
    pub fn check_counts(&self, devices: usize) -> Result<()> {
        if self.indices.is_empty() {
            return Err(error::resolve::invalid_environment(
                "No correct FPGA environment variables set",
            ));
        }

        if self.indices.len() != self.regions.len() || self.indices.len() != self.afus.len() {
            return Err(error::resolve::invalid_environment(format!(
                "Environment variables are set incorrectly: {} region(s) and {} AFU(s) for {} index(es)",
                self.regions.len(),
                self.afus.len(),
                self.indices.len()
            )));
        }

        if devices != self.indices.len() {
            return Err(error::resolve::device_count_mismatch(
                self.indices.len(),
                devices,
            ));
        }

        Ok(())
    }

    /// Check that every declared value is a uuid: hex digits, optionally hyphenated
    ///
    /// Values become path components in the bitstream repository, so
    /// anything else is refused before a device is touched.
    ///
    /// # Errors
    ///
    /// Returns `HookError::InvalidEnvironment` naming the offending variable.
    pub fn check_identifiers(&self) -> Result<()> {
        let declared = self
            .regions
            .iter()
            .map(|(index, value)| (REGION_PREFIX, index, value))
            .chain(self.afus.iter().map(|(index, value)| (AFU_PREFIX, index, value)));

        for (prefix, index, value) in declared {
            if !is_identifier(value) {
                return Err(error::resolve::invalid_environment(format!(
                    "{prefix}{index} is not a valid identifier: '{value}'"
                )));
            }
        }

        Ok(())
    }

    /// (region, afu) pairs, raw as declared. Only meaningful after `check_counts`.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.indices.iter().filter_map(|index| {
            let region = self.regions.get(index)?;
            let afu = self.afus.get(index)?;
            Some((region.as_str(), afu.as_str()))
        })
    }

    /// Number of distinct declaration indices
    pub fn count(&self) -> usize {
        self.indices.len()
    }
}

fn is_fpga_key(key: &str) -> bool {
    key.starts_with(REGION_PREFIX) || key.starts_with(AFU_PREFIX)
}

fn is_identifier(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_hexdigit())
        && value.chars().all(|c| c.is_ascii_hexdigit() || c == '-')
}
