//! Credentialed ssh sessions.
//!
//! A session is opened once per validation and reused for every command.
//! [`SshSession`] implements this with an OpenSSH control master: the
//! password is supplied once through `sshpass -e` while the master
//! authenticates, and later commands multiplex over its control socket.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tempfile::TempDir;

use crate::error::Result;
use crate::shell::{execute_program, execute_status, CommandOptions};

use super::host::HostSpec;
use super::options::SshOptions;

/// An established remote session.
pub trait RemoteSession {
    /// Run `command` remotely, returning `(returncode, output)`.
    ///
    /// Output is stdout on success and stderr otherwise.
    fn execute(&mut self, command: &str) -> Result<(i32, String)>;

    /// Close the session. Calling this more than once is harmless.
    fn disconnect(&mut self) -> Result<()>;
}

/// Opens [`RemoteSession`]s for credentialed hosts.
///
/// Errors are returned as `anyhow` chains so the caller can render the
/// full cause into its own error.
pub trait SessionFactory {
    fn connect(&self, spec: &HostSpec) -> anyhow::Result<Box<dyn RemoteSession>>;
}

/// [`SessionFactory`] producing [`SshSession`]s.
#[derive(Debug, Clone, Default)]
pub struct SshSessionFactory {
    options: SshOptions,
}

impl SshSessionFactory {
    pub fn new(options: SshOptions) -> Self {
        Self { options }
    }
}

impl SessionFactory for SshSessionFactory {
    fn connect(&self, spec: &HostSpec) -> anyhow::Result<Box<dyn RemoteSession>> {
        Ok(Box::new(SshSession::open(spec, &self.options)?))
    }
}

/// ssh session multiplexed over a control master.
#[derive(Debug)]
pub struct SshSession {
    spec: HostSpec,
    options: SshOptions,
    control_dir: TempDir,
    connected: bool,
}

impl SshSession {
    /// Start the control master and wait until it has authenticated.
    pub fn open(spec: &HostSpec, options: &SshOptions) -> anyhow::Result<Self> {
        let control_dir = tempfile::Builder::new()
            .prefix("pkgv-ssh-")
            .tempdir()
            .context("creating control socket directory")?;

        let mut session = Self {
            spec: spec.clone(),
            options: options.clone(),
            control_dir,
            connected: false,
        };
        session.start_master()?;
        session.connected = true;

        tracing::debug!("ssh control master up for {}", session.spec);

        Ok(session)
    }

    fn control_path(&self) -> PathBuf {
        self.control_dir.path().join("master.sock")
    }

    fn log_path(&self) -> PathBuf {
        self.control_dir.path().join("master.log")
    }

    /// Arguments common to every ssh invocation on this session.
    fn base_args(&self) -> Vec<String> {
        let mut args = vec![
            "-p".to_string(),
            self.spec.port.to_string(),
            "-o".to_string(),
            format!("ControlPath={}", self.control_path().display()),
        ];
        args.extend(self.options.to_args());
        args
    }

    /// Arguments that start the background control master.
    fn master_args(&self) -> Vec<String> {
        let mut args = vec!["-e".to_string(), "ssh".to_string()];
        args.extend(self.base_args());
        args.extend(
            [
                "-o",
                "ControlMaster=yes",
                "-o",
                "ControlPersist=yes",
                "-o",
                "PubkeyAuthentication=no",
                "-o",
                "NumberOfPasswordPrompts=1",
                "-E",
            ]
            .map(String::from),
        );
        args.push(self.log_path().display().to_string());
        args.extend(["-f", "-N"].map(String::from));
        args.push(self.spec.destination());
        args
    }

    /// Arguments that run `command` over the master.
    fn command_args(&self, command: &str) -> Vec<String> {
        let mut args = self.base_args();
        args.extend(["-o", "ControlMaster=no", "-o", "BatchMode=yes"].map(String::from));
        args.push(self.spec.destination());
        args.push("--".to_string());
        args.push(command.to_string());
        args
    }

    /// Arguments that ask the master to exit.
    fn exit_args(&self) -> Vec<String> {
        let mut args = self.base_args();
        args.extend(["-O", "exit"].map(String::from));
        args.push(self.spec.destination());
        args
    }

    fn start_master(&self) -> anyhow::Result<()> {
        let mut options = CommandOptions::default();
        options
            .env
            .insert("SSHPASS".to_string(), self.spec.password.clone());

        // The master forks into the background and would keep capture pipes
        // open, so its diagnostics go to the log file instead.
        let result = execute_status("sshpass", self.master_args(), &options)
            .context("sshpass is required for password authentication")?;

        if !result.success {
            let log = std::fs::read_to_string(self.log_path()).unwrap_or_default();
            bail!(
                "{} (sshpass exit code {}){}",
                describe_sshpass_exit(result.returncode()),
                result.returncode(),
                if log.trim().is_empty() {
                    String::new()
                } else {
                    format!(": {}", log.trim())
                }
            );
        }
        Ok(())
    }
}

impl RemoteSession for SshSession {
    fn execute(&mut self, command: &str) -> Result<(i32, String)> {
        if !self.connected {
            return Err(anyhow::anyhow!("ssh session to {} is closed", self.spec).into());
        }

        tracing::debug!("Running on {}: {}", self.spec, command);

        let result = execute_program("ssh", self.command_args(command), &CommandOptions::default())?;
        let output = if result.success {
            result.stdout_text()
        } else {
            result.stderr_text()
        };
        Ok((result.returncode(), output))
    }

    fn disconnect(&mut self) -> Result<()> {
        if !self.connected {
            return Ok(());
        }
        self.connected = false;

        let result = execute_status("ssh", self.exit_args(), &CommandOptions::default())?;
        if !result.success {
            return Err(anyhow::anyhow!(
                "ssh control master for {} did not exit cleanly (exit code {})",
                self.spec,
                result.returncode()
            )
            .into());
        }
        tracing::debug!("ssh session to {} closed", self.spec);
        Ok(())
    }
}

impl Drop for SshSession {
    fn drop(&mut self) {
        if let Err(e) = self.disconnect() {
            tracing::warn!("{}", e);
        }
    }
}

/// Meaning of an `sshpass` exit code.
pub fn describe_sshpass_exit(code: i32) -> &'static str {
    match code {
        1 => "invalid sshpass arguments",
        2 => "conflicting sshpass arguments",
        3 => "ssh runtime error",
        4 => "unrecognized response from ssh",
        5 => "invalid or incorrect password",
        6 => "host public key is unknown",
        7 => "host public key has changed",
        255 => "ssh connection failed",
        _ => "ssh session could not be established",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SshSession {
        SshSession {
            spec: HostSpec::parse("admin:secret@node1:2222").unwrap(),
            options: SshOptions::default(),
            control_dir: TempDir::new().unwrap(),
            connected: false,
        }
    }

    #[test]
    fn master_args_never_contain_password() {
        let args = session().master_args();
        assert!(!args.iter().any(|a| a.contains("secret")));
        assert_eq!(&args[..2], &["-e".to_string(), "ssh".to_string()]);
        assert!(args.contains(&"ControlMaster=yes".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("admin@node1"));
    }

    #[test]
    fn command_args_use_port_and_control_path() {
        let session = session();
        let args = session.command_args("rpm -qa");
        assert_eq!(&args[..2], &["-p".to_string(), "2222".to_string()]);
        assert!(args
            .iter()
            .any(|a| a.starts_with("ControlPath=") && a.ends_with("master.sock")));
        assert_eq!(&args[args.len() - 2..], &["--".to_string(), "rpm -qa".to_string()]);
    }

    #[test]
    fn exit_args_request_master_exit() {
        let args = session().exit_args();
        let tail: Vec<&str> = args[args.len() - 3..].iter().map(String::as_str).collect();
        assert_eq!(tail, vec!["-O", "exit", "admin@node1"]);
    }

    #[test]
    fn closed_session_refuses_commands() {
        let mut session = session();
        assert!(session.execute("rpm -qa").is_err());
    }

    #[test]
    fn disconnect_is_idempotent_when_closed() {
        let mut session = session();
        assert!(session.disconnect().is_ok());
        assert!(session.disconnect().is_ok());
    }

    #[test]
    fn sshpass_exit_codes_are_described() {
        assert_eq!(describe_sshpass_exit(5), "invalid or incorrect password");
        assert_eq!(describe_sshpass_exit(6), "host public key is unknown");
        assert_eq!(describe_sshpass_exit(42), "ssh session could not be established");
    }
}
