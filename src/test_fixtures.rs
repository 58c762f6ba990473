//! Test fixtures shared by the unit tests.
//!
//! [`FakeHost`] lays out a temporary sysfs tree and bitstream repository and
//! hands out a [`HookConfig`] pointing into it. [`FakeRunner`] stands in for
//! the vendor tools: handlers are registered per program path and every
//! invocation is recorded.
//!
//! # Usage
//!
//! ```ignore
//! let host = FakeHost::new();
//! host.set_interface_id(0, "ce48969398f05f33946d560708be108a");
//! let runner = FakeRunner::new();
//! runner.on(&host.config.fpgaconf, |_| Ok(FakeRunner::ok("")));
//! ```

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{DEVICE_PLACEHOLDER, HookConfig};
use crate::exec::{CommandRunner, ToolError, ToolOutput};

/// Temporary sysfs tree and bitstream repository
pub struct FakeHost {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub config: HookConfig,
}

impl FakeHost {
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path();
        let sys = root.join("sys");
        let config = HookConfig {
            bitstream_dir: root.join("fpga"),
            bundle_config: "config.json".to_string(),
            packager: PathBuf::from("/fake/packager"),
            fpgaconf: PathBuf::from("/fake/fpgaconf"),
            aocl: PathBuf::from("/fake/aocl"),
            afu_id_template: format!("{}/port.{DEVICE_PLACEHOLDER}/afu_id", sys.display()),
            interface_id_template: format!(
                "{}/fme.{DEVICE_PLACEHOLDER}/interface_id",
                sys.display()
            ),
        };
        Self { temp, config }
    }

    pub fn set_afu_id(&self, device: u32, value: &str) {
        write_file(&self.config.afu_id_path(device), value);
    }

    pub fn set_interface_id(&self, device: u32, value: &str) {
        write_file(&self.config.interface_id_path(device), value);
    }

    /// Create an (empty) bitstream file and return its path
    pub fn add_bitstream(&self, region: &str, afu: &str, ext: &str) -> PathBuf {
        let path = self.config.region_dir(region).join(format!("{afu}{ext}"));
        write_file(&path, "bitstream");
        path
    }
}

/// Write a file, creating parent directories
///
/// # Panics
///
/// Panics on any I/O failure.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

type Handler = Box<dyn Fn(&[OsString]) -> Result<ToolOutput, ToolError>>;

/// Scripted stand-in for the vendor tools
#[derive(Default)]
pub struct FakeRunner {
    handlers: RefCell<HashMap<PathBuf, Handler>>,
    calls: RefCell<Vec<(PathBuf, Vec<String>)>>,
}

impl FakeRunner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the behaviour of `program`
    pub fn on<F>(&self, program: &Path, handler: F)
    where
        F: Fn(&[OsString]) -> Result<ToolOutput, ToolError> + 'static,
    {
        self.handlers
            .borrow_mut()
            .insert(program.to_path_buf(), Box::new(handler));
    }

    /// Every invocation so far, as (program, args)
    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.borrow().clone()
    }

    /// Arguments of each invocation of `program`
    pub fn calls_to(&self, program: &Path) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|(p, _)| p == program)
            .map(|(_, args)| args.clone())
            .collect()
    }

    /// Successful exit with the given stdout
    #[must_use]
    pub fn ok(stdout: &str) -> ToolOutput {
        ToolOutput {
            success: true,
            status: "exit status: 0".to_string(),
            stdout: stdout.as_bytes().to_vec(),
            stderr: Vec::new(),
        }
    }

    /// Failed exit with the given stderr
    #[must_use]
    pub fn failed(stderr: &str) -> ToolOutput {
        ToolOutput {
            success: false,
            status: "exit status: 1".to_string(),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }
}

impl CommandRunner for FakeRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput, ToolError> {
        self.calls.borrow_mut().push((
            program.to_path_buf(),
            args.iter()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
        ));

        match self.handlers.borrow().get(program) {
            Some(handler) => handler(args),
            None => Err(ToolError::Launch {
                program: program.display().to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        }
    }
}
