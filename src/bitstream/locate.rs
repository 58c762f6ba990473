//! Bitstream repository lookup

use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use super::BitstreamFormat;
use crate::config::HookConfig;
use crate::error::{self, Result};
use crate::resolver::ProvisioningRequest;

/// A bitstream file found in the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    pub path: PathBuf,
    pub format: BitstreamFormat,
}

/// Find `<root>/<region>/<afu><ext>`, trying formats in priority order
///
/// # Errors
///
/// Returns `HookError::BitstreamStat` if a candidate can't be inspected for
/// a reason other than not existing, and `HookError::BitstreamNotFound` if
/// no candidate exists.
pub fn locate(config: &HookConfig, request: &ProvisioningRequest) -> Result<Located> {
    let region_dir = config.region_dir(&request.region);

    for format in BitstreamFormat::PRIORITY {
        let path = region_dir.join(format!("{}{}", request.afu, format.extension()));

        match std::fs::metadata(&path) {
            Ok(_) => {
                debug!(path = %path.display(), %format, "found bitstream");
                return Ok(Located { path, format });
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(error::bitstream::stat_failed(path.display().to_string(), e)),
        }
    }

    Err(error::bitstream::not_found(&request.region, &request.afu))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HookError;
    use crate::test_fixtures::FakeHost;

    fn request() -> ProvisioningRequest {
        ProvisioningRequest {
            region: "ce48969398f05f33946d560708be108a".to_string(),
            afu: "d8424dc4a4a3c413f89e433683f9040b".to_string(),
            device: 0,
        }
    }

    #[test]
    fn test_gbs_wins_over_aocx() {
        let host = FakeHost::new();
        let request = request();
        let gbs = host.add_bitstream(&request.region, &request.afu, ".gbs");
        host.add_bitstream(&request.region, &request.afu, ".aocx");

        let located = locate(&host.config, &request).unwrap();
        assert_eq!(
            located,
            Located {
                path: gbs,
                format: BitstreamFormat::Gbs
            }
        );
    }

    #[test]
    fn test_falls_back_to_aocx() {
        let host = FakeHost::new();
        let request = request();
        let aocx = host.add_bitstream(&request.region, &request.afu, ".aocx");

        let located = locate(&host.config, &request).unwrap();
        assert_eq!(located.format, BitstreamFormat::Aocx);
        assert_eq!(located.path, aocx);
    }

    #[test]
    fn test_other_region_does_not_match() {
        let host = FakeHost::new();
        let request = request();
        host.add_bitstream("f7df405cbd7acf7222f144b0b93acd18", &request.afu, ".gbs");

        let err = locate(&host.config, &request).unwrap_err();
        assert!(matches!(err, HookError::BitstreamNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "ce48969398f05f33946d560708be108a/d8424dc4a4a3c413f89e433683f9040b: bitstream not found"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_stat_errors_propagate() {
        let host = FakeHost::new();
        let mut request = request();
        // A path component that is a regular file makes stat fail with ENOTDIR.
        host.add_bitstream("blocker", "file", "");
        request.region = "blocker/file".to_string();

        let err = locate(&host.config, &request).unwrap_err();
        assert!(matches!(err, HookError::BitstreamStat { .. }));
    }
}
