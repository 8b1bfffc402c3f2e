//! Command execution over a [`Connection`].

use crate::error::{PkgvError, Result};
use crate::remote::Connection;
use crate::shell::ProcessRunner;

/// Run `command` and return its output.
///
/// A session connection executes remotely; every other mode spawns a local
/// process (passwordless commands are already `ssh`-wrapped by the caller).
/// Output is stdout on a zero exit code and stderr otherwise. A non-zero
/// exit code fails with [`PkgvError::CommandFailure`].
pub fn execute_cmd(
    connection: &mut Connection,
    runner: &dyn ProcessRunner,
    command: &str,
) -> Result<String> {
    tracing::debug!("Running {}", command);

    let (returncode, output) = match connection {
        Connection::Session(session) => session.execute(command)?,
        Connection::Local | Connection::Passwordless { .. } => {
            let result = runner.run(command)?;
            let output = if result.returncode == 0 {
                String::from_utf8_lossy(&result.stdout).into_owned()
            } else {
                String::from_utf8_lossy(&result.stderr).into_owned()
            };
            (result.returncode, output)
        }
    };

    if returncode != 0 {
        tracing::debug!("{} exited with code {}", command, returncode);
        return Err(PkgvError::CommandFailure {
            command: command.to_string(),
            output,
        });
    }
    Ok(output)
}
