//! Container creation request decoding
//!
//! The runtime passes the container state on stdin. Only two fields matter
//! here: the annotations (which gate provisioning) and the bundle path.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{self, Result};

/// Annotation that opts a container into FPGA provisioning
pub const ANNOTATION_NAME: &str = "com.intel.fpga.mode";

/// Value the annotation must carry
pub const ANNOTATION_VALUE: &str = "fpga.intel.com/region";

const DOCUMENT: &str = "the container state";

/// Container state as delivered to the hook
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub annotations: Option<HashMap<String, String>>,
    #[serde(default)]
    pub bundle: Option<PathBuf>,
}

/// Whether provisioning applies to this container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Enabled,
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AnnotationNotSet,
    AnnotationMismatch,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::AnnotationNotSet => {
                write!(f, "annotation {ANNOTATION_NAME} is not set, skipping")
            }
            SkipReason::AnnotationMismatch => {
                write!(f, "annotation {ANNOTATION_NAME} has incorrect value, skipping")
            }
        }
    }
}

impl Request {
    /// Decode a request from a JSON stream
    ///
    /// # Errors
    ///
    /// Returns `HookError::Decode` for malformed JSON.
    pub fn decode<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|e| error::decode::malformed(DOCUMENT, e))
    }

    /// Check the provisioning annotation
    ///
    /// # Errors
    ///
    /// Returns `HookError::MissingField` if the request has no annotations at all.
    pub fn gate(&self) -> Result<Gate> {
        let annotations = self
            .annotations
            .as_ref()
            .ok_or_else(|| error::config::missing_field("annotations", DOCUMENT))?;

        Ok(match annotations.get(ANNOTATION_NAME) {
            None => Gate::Skip(SkipReason::AnnotationNotSet),
            Some(value) if value != ANNOTATION_VALUE => Gate::Skip(SkipReason::AnnotationMismatch),
            Some(_) => Gate::Enabled,
        })
    }

    /// Bundle root of the container
    ///
    /// # Errors
    ///
    /// Returns `HookError::MissingField` if no bundle is given.
    pub fn bundle_path(&self) -> Result<&Path> {
        self.bundle
            .as_deref()
            .ok_or_else(|| error::config::missing_field("bundle", DOCUMENT))
    }
}
