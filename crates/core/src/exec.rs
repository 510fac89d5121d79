//! Subprocess execution for external tool invocations
//!
//! Commands run strictly in the order handed to the executor; sequencing
//! guarantees (fix before lint, commit last) belong to the planner, not here.

use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

/// Error types for subprocess execution
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("`{program}` produced non-UTF-8 output")]
    NonUtf8Output { program: String },
}

/// A fully-specified external command: program, argument list and working
/// directory, plus a human-readable name for progress reporting.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub display_name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl ToolCommand {
    pub fn new(
        display_name: impl Into<String>,
        program: impl Into<PathBuf>,
        args: Vec<String>,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }
}

/// Run a command to completion and capture its standard output.
///
/// Output must decode as UTF-8; undecodable bytes are reported as an error
/// rather than coerced. The captured text is trimmed of surrounding
/// whitespace. A non-zero exit status is an error carrying the process's
/// stderr.
pub fn run(command: &ToolCommand) -> Result<String, ExecError> {
    let program = command.program.display().to_string();

    let output = Command::new(&command.program)
        .args(&command.args)
        .current_dir(&command.cwd)
        .output()
        .map_err(|source| ExecError::Spawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(ExecError::Failed {
            program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let stdout =
        String::from_utf8(output.stdout).map_err(|_| ExecError::NonUtf8Output { program })?;

    Ok(stdout.trim().to_string())
}
