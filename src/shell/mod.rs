//! Local shell command execution.

pub mod command;
pub mod platform;

pub use command::{
    execute, execute_program, execute_status, CommandOptions, CommandResult,
    ProcessOutput, ProcessRunner, ShellProcessRunner,
};
pub use platform::{current_username, detect_shell};
