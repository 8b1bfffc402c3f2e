//! Local process execution.

use crate::error::{PkgvError, Result};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::{detect_shell, shell_flag};

/// Result of executing a local command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Raw standard output.
    pub stdout: Vec<u8>,

    /// Raw standard error.
    pub stderr: Vec<u8>,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Numeric return code, with signal termination reported as `-1`.
    pub fn returncode(&self) -> i32 {
        self.exit_code.unwrap_or(-1)
    }

    /// Standard output decoded as UTF-8 (lossy).
    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Standard error decoded as UTF-8 (lossy).
    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,
}

/// Raw output of a local process, as consumed by the validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub returncode: i32,
}

impl From<CommandResult> for ProcessOutput {
    fn from(result: CommandResult) -> Self {
        Self {
            returncode: result.returncode(),
            stdout: result.stdout,
            stderr: result.stderr,
        }
    }
}

/// Runs a shell command string on the local machine.
///
/// This trait allows mocking process execution in tests.
pub trait ProcessRunner {
    /// Run `command` and capture its output and return code.
    fn run(&self, command: &str) -> Result<ProcessOutput>;
}

/// [`ProcessRunner`] that runs commands through `sh -c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellProcessRunner;

impl ShellProcessRunner {
    /// Create a runner.
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for ShellProcessRunner {
    fn run(&self, command: &str) -> Result<ProcessOutput> {
        execute(command, &CommandOptions::default()).map(ProcessOutput::from)
    }
}

/// Execute a shell command, capturing stdout and stderr.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let shell = detect_shell();
    execute_program(&shell, [shell_flag(), command], options).map_err(|e| match e {
        PkgvError::CommandFailure { output, .. } => PkgvError::CommandFailure {
            command: command.to_string(),
            output,
        },
        other => other,
    })
}

/// Execute a program with explicit arguments (no shell involved).
pub fn execute_program<I, S>(
    program: &str,
    args: I,
    options: &CommandOptions,
) -> Result<CommandResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Spawning {}", program);

    let output = cmd.output().map_err(|e| PkgvError::CommandFailure {
        command: program.to_string(),
        output: e.to_string(),
    })?;

    Ok(CommandResult {
        exit_code: output.status.code(),
        success: output.status.success(),
        stdout: output.stdout,
        stderr: output.stderr,
        duration: start.elapsed(),
    })
}

/// Execute a program without capturing output.
///
/// For programs that fork into the background and would otherwise hold the
/// capture pipes open. The returned result has empty output buffers.
pub fn execute_status<I, S>(
    program: &str,
    args: I,
    options: &CommandOptions,
) -> Result<CommandResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let start = Instant::now();

    let mut cmd = Command::new(program);
    cmd.args(args);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::null());
    cmd.stderr(Stdio::null());

    tracing::debug!("Spawning {} (detached output)", program);

    let status = cmd.status().map_err(|e| PkgvError::CommandFailure {
        command: program.to_string(),
        output: e.to_string(),
    })?;

    Ok(CommandResult {
        exit_code: status.code(),
        success: status.success(),
        stdout: Vec::new(),
        stderr: Vec::new(),
        duration: start.elapsed(),
    })
}
