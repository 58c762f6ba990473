//! External tool execution
//!
//! All vendor tools are run through [`CommandRunner`] so the pipeline can be
//! driven with scripted tools in tests. Execution is blocking and has no
//! timeout: a hanging tool blocks the hook until the host kills it.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

/// `PATH` used for spawned tools when the hook itself runs without one.
///
/// runc does not set `PATH` when it executes hooks.
pub const DEFAULT_PATH: &str = "/sbin:/usr/sbin:/usr/local/sbin:/usr/local/bin:/usr/bin:/bin";

/// Why a tool invocation did not succeed
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("failed to launch {program}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit { program: String, status: String },
}

/// Captured result of a finished tool
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub success: bool,
    pub status: String,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    /// Stdout followed by stderr, lossily decoded
    pub fn combined(&self) -> String {
        let mut combined = String::from_utf8_lossy(&self.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&self.stderr));
        combined
    }

    /// Turn a non-zero exit into a [`ToolError`]
    pub fn check(&self, program: &Path) -> Result<(), ToolError> {
        if self.success {
            Ok(())
        } else {
            Err(ToolError::Exit {
                program: program.display().to_string(),
                status: self.status.clone(),
            })
        }
    }
}

/// Runs external programs to completion
pub trait CommandRunner {
    /// Run `program` with `args` and wait for it to exit.
    ///
    /// # Errors
    ///
    /// Returns `ToolError::Launch` if the program could not be started.
    /// A non-zero exit is reported through [`ToolOutput::success`].
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput, ToolError>;
}

/// Runs tools as real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[OsString]) -> Result<ToolOutput, ToolError> {
        debug!(program = %program.display(), ?args, "running tool");

        let mut command = Command::new(program);
        command.args(args);
        if std::env::var_os("PATH").is_none_or(|path| path.is_empty()) {
            command.env("PATH", DEFAULT_PATH);
        }

        let output = command.output().map_err(|source| ToolError::Launch {
            program: program.display().to_string(),
            source,
        })?;

        debug!(program = %program.display(), status = %output.status, "tool finished");

        Ok(ToolOutput {
            success: output.status.success(),
            status: output.status.to_string(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
