//! Error types and handling for the hook
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostic codes.
//!
//! Constructors are grouped by pipeline stage:
//! - [`decode`]: Malformed JSON documents
//! - [`config`]: Missing fields in the request or bundle configuration
//! - [`resolve`]: Environment/device resolution errors
//! - [`device`]: Reading hardware-reported identity files
//! - [`bitstream`]: Locating and validating bitstreams
//! - [`program`]: Programming and post-programming verification

pub mod bitstream;
pub mod config;
pub mod decode;
pub mod device;
pub mod program;
pub mod resolve;

use std::fmt::Write as _;

use miette::Diagnostic;
use thiserror::Error;

use crate::exec::ToolError;

/// Main error type for hook operations
#[derive(Error, Diagnostic, Debug)]
pub enum HookError {
    // Decode errors
    #[error("Can't decode {what}")]
    #[diagnostic(code(fpga_crihook::decode::malformed))]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    // Configuration errors
    #[error("No '{field}' field found in {document}")]
    #[diagnostic(code(fpga_crihook::config::missing_field))]
    MissingField { field: String, document: String },

    #[error("Failed to open configuration file: {path}")]
    #[diagnostic(code(fpga_crihook::config::read_failed))]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Resolution errors
    #[error("{message}")]
    #[diagnostic(
        code(fpga_crihook::resolve::invalid_environment),
        help("Set FPGA_REGION_<n> and FPGA_AFU_<n> in pairs, one pair per allocated device")
    )]
    InvalidEnvironment { message: String },

    #[error(
        "Environment variables don't correspond to allocated devices: \
         {declared} requested, {allocated} allocated"
    )]
    #[diagnostic(code(fpga_crihook::resolve::device_count_mismatch))]
    DeviceCountMismatch { declared: usize, allocated: usize },

    #[error("Can't find appropriate device for interface id {interface_id}")]
    #[diagnostic(code(fpga_crihook::resolve::no_device))]
    NoMatchingDevice { interface_id: String },

    #[error("Couldn't get FPGA region, AFU and device number")]
    #[diagnostic(code(fpga_crihook::resolve::failed))]
    Resolution {
        #[source]
        source: Box<HookError>,
    },

    // Device errors
    #[error("Failed to read {what} of device {device} from {path}")]
    #[diagnostic(code(fpga_crihook::device::read_failed))]
    DeviceIdentityRead {
        what: String,
        device: u32,
        path: String,
        #[source]
        source: std::io::Error,
    },

    // Bitstream errors
    #[error("{region}/{afu}: bitstream not found")]
    #[diagnostic(
        code(fpga_crihook::bitstream::not_found),
        help("Bitstreams are looked up as <repository>/<region>/<afu>.gbs or .aocx")
    )]
    BitstreamNotFound { region: String, afu: String },

    #[error("{path}: stat error")]
    #[diagnostic(code(fpga_crihook::bitstream::stat_failed))]
    BitstreamStat {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{region}/{afu}: can't get bitstream info{}", output_suffix(": ", .output))]
    #[diagnostic(code(fpga_crihook::bitstream::info_unavailable))]
    BitstreamInfoUnavailable {
        region: String,
        afu: String,
        output: Option<String>,
        #[source]
        source: ToolError,
    },

    #[error("{region}/{afu}: '{field}' field not found in the 'packager gbs-info' output")]
    #[diagnostic(code(fpga_crihook::bitstream::field_missing))]
    BitstreamFieldMissing {
        region: String,
        afu: String,
        field: String,
    },

    #[error(
        "Bitstream is not for this device: region({region}) and interface-uuid({interface_uuid}) don't match"
    )]
    #[diagnostic(code(fpga_crihook::bitstream::interface_mismatch))]
    InterfaceMismatch {
        region: String,
        interface_uuid: String,
    },

    #[error(
        "Incorrect bitstream: AFU({afu}) and accelerator-type-uuid({accelerator_type_uuid}) don't match"
    )]
    #[diagnostic(code(fpga_crihook::bitstream::afu_mismatch))]
    AfuMismatch {
        afu: String,
        accelerator_type_uuid: String,
    },

    // Programming errors
    #[error(
        "Failed to program AFU {afu} to socket {device}, region {region}{}",
        output_suffix(": output: ", .output)
    )]
    #[diagnostic(code(fpga_crihook::program::failed))]
    ProgramFailed {
        afu: String,
        device: u32,
        region: String,
        output: Option<String>,
        #[source]
        source: ToolError,
    },

    #[error("Programmed function {actual} instead of {requested} on device {device}")]
    #[diagnostic(
        code(fpga_crihook::program::verification_failed),
        help("The programming tool accepted the bitstream but the device reports a different AFU")
    )]
    VerificationFailed {
        requested: String,
        actual: String,
        device: u32,
    },
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, HookError>;

/// Tool output captured for an error message, `None` if there was nothing to show
pub(crate) fn captured_output(output: impl Into<String>) -> Option<String> {
    let output = output.into();
    if output.trim().is_empty() {
        None
    } else {
        Some(output)
    }
}

fn output_suffix(prefix: &str, output: &Option<String>) -> String {
    output
        .as_deref()
        .map(|output| format!("{prefix}{output}"))
        .unwrap_or_default()
}

/// Render an error with its full causal chain and help text.
///
/// The hook host only captures stdout, so the report must be self-contained.
/// Help comes from the outermost error in the chain that has any.
pub fn render(err: &HookError) -> String {
    let mut out = format!("Error: {err}");

    let mut causes = Vec::new();
    let mut help = err.help().map(|help| help.to_string());
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        causes.push(cause.to_string());
        if help.is_none() {
            help = cause
                .downcast_ref::<HookError>()
                .and_then(|inner| inner.help().map(|help| help.to_string()));
        }
        source = std::error::Error::source(cause);
    }

    if !causes.is_empty() {
        out.push_str("\n\nCaused by:");
        for (i, cause) in causes.iter().enumerate() {
            let _ = write!(out, "\n    {i}: {cause}");
        }
    }

    if let Some(help) = help {
        let _ = write!(out, "\n\nhelp: {help}");
    }

    out
}
