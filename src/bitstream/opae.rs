//! OPAE (`.gbs`) bitstreams
//!
//! A gbs file embeds its metadata; `packager gbs-info` prints it as JSON:
//!
//! ```json
//! {
//!   "afu-image": {
//!     "interface-uuid": "ce489693-98f0-5f33-946d-560708be108a",
//!     "accelerator-clusters": [
//!       {"name": "nlb_400", "accelerator-type-uuid": "d8424dc4-a4a3-c413-f89e-433683f9040b"}
//!     ]
//!   }
//! }
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::{Bitstream, BitstreamContext, BitstreamFormat, path_arg, run_programmer};
use crate::error::{self, Result};
use crate::resolver::normalize;

/// `packager gbs-info` output
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GbsInfo {
    #[serde(rename = "afu-image", default)]
    pub afu_image: Option<AfuImage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AfuImage {
    #[serde(rename = "interface-uuid", default)]
    pub interface_uuid: Option<String>,
    #[serde(rename = "accelerator-clusters", default)]
    pub accelerator_clusters: Option<Vec<AcceleratorCluster>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcceleratorCluster {
    #[serde(rename = "accelerator-type-uuid", default)]
    pub accelerator_type_uuid: Option<String>,
}

pub struct OpaeBitstream<'a> {
    path: PathBuf,
    ctx: BitstreamContext<'a>,
}

impl<'a> OpaeBitstream<'a> {
    pub fn new(path: PathBuf, ctx: BitstreamContext<'a>) -> Self {
        Self { path, ctx }
    }

    fn info(&self) -> Result<GbsInfo> {
        let request = self.ctx.request;
        let packager = &self.ctx.config.packager;
        let args: Vec<OsString> = vec!["gbs-info".into(), "--gbs".into(), path_arg(&self.path)];

        let output = self.ctx.runner.run(packager, &args).map_err(|e| {
            error::bitstream::info_unavailable(&request.region, &request.afu, "", e)
        })?;
        output.check(packager).map_err(|e| {
            error::bitstream::info_unavailable(&request.region, &request.afu, output.combined(), e)
        })?;

        serde_json::from_slice(&output.stdout).map_err(|e| {
            error::decode::malformed(
                format!(
                    "'packager gbs-info' output for {}/{}",
                    request.region, request.afu
                ),
                e,
            )
        })
    }

    /// Check decoded metadata against the request
    fn check(&self, info: &GbsInfo) -> Result<()> {
        let request = self.ctx.request;
        let (region, afu) = (request.region.as_str(), request.afu.as_str());
        let missing = |field: &str| error::bitstream::field_missing(region, afu, field);

        let image = info.afu_image.as_ref().ok_or_else(|| missing("afu-image"))?;
        let interface_uuid = image
            .interface_uuid
            .as_deref()
            .ok_or_else(|| missing("interface-uuid"))?;
        let clusters = image
            .accelerator_clusters
            .as_deref()
            .ok_or_else(|| missing("accelerator-clusters"))?;

        if normalize(interface_uuid) != region {
            return Err(error::bitstream::interface_mismatch(region, interface_uuid));
        }

        let type_uuid = clusters
            .first()
            .and_then(|cluster| cluster.accelerator_type_uuid.as_deref())
            .ok_or_else(|| missing("accelerator-type-uuid"))?;

        if normalize(type_uuid) != afu {
            return Err(error::bitstream::afu_mismatch(afu, type_uuid));
        }

        Ok(())
    }
}

impl Bitstream for OpaeBitstream<'_> {
    fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> BitstreamFormat {
        BitstreamFormat::Gbs
    }

    fn validate(&self) -> Result<()> {
        let info = self.info()?;
        self.check(&info)?;
        debug!(path = %self.path.display(), "bitstream metadata matches request");
        Ok(())
    }

    fn program(&self) -> Result<()> {
        let args = vec![
            "-s".into(),
            self.ctx.request.device.to_string().into(),
            path_arg(&self.path),
        ];
        run_programmer(&self.ctx, &self.ctx.config.fpgaconf, args)
    }
}
