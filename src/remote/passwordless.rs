//! Passwordless (key-based) ssh capability probe.

use crate::error::{PkgvError, Result};
use crate::shell::{execute_program, CommandOptions};

use super::host::{display_host, HostSpec};
use super::options::SshOptions;

/// Checks whether `local_user` can reach `host` over ssh without a password
/// prompt.
///
/// This trait allows mocking the probe in tests.
pub trait PasswordlessCheck {
    /// Succeeds silently when key-based login works, errors otherwise.
    fn check(&self, local_user: &str, host: &str) -> Result<()>;
}

/// [`PasswordlessCheck`] backed by the system `ssh` client in batch mode.
#[derive(Debug, Clone, Default)]
pub struct SshPasswordlessCheck {
    options: SshOptions,
}

impl SshPasswordlessCheck {
    /// Create a probe with the given ssh options.
    pub fn new(options: SshOptions) -> Self {
        Self { options }
    }

    /// Arguments passed to `ssh` for a probe of `host` as `local_user`.
    ///
    /// A credentialed descriptor is probed at its host and port as
    /// `local_user`; its password never reaches the command line. Any other
    /// host that already names a user is used verbatim.
    pub fn probe_args(&self, local_user: &str, host: &str) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "PasswordAuthentication=no".to_string(),
        ];
        args.extend(self.options.to_args());

        let destination = match HostSpec::parse(host) {
            Ok(spec) => {
                args.push("-p".to_string());
                args.push(spec.port.to_string());
                format!("{}@{}", local_user, spec.host)
            }
            Err(_) if host.contains('@') => host.to_string(),
            Err(_) => format!("{}@{}", local_user, host),
        };
        args.push(destination);
        args.push("/bin/true".to_string());
        args
    }
}

impl PasswordlessCheck for SshPasswordlessCheck {
    fn check(&self, local_user: &str, host: &str) -> Result<()> {
        let args = self.probe_args(local_user, host);
        let result = execute_program("ssh", &args, &CommandOptions::default())?;

        if result.success {
            Ok(())
        } else {
            Err(PkgvError::ConnectionFailure {
                host: display_host(host),
                message: format!(
                    "passwordless ssh as {} failed (exit code {}): {}",
                    local_user,
                    result.returncode(),
                    result.stderr_text().trim()
                ),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_targets_local_user_at_host() {
        let probe = SshPasswordlessCheck::default();
        let args = probe.probe_args("deploy", "node1");

        assert!(args.contains(&"BatchMode=yes".to_string()));
        assert!(args.contains(&"PasswordAuthentication=no".to_string()));
        assert_eq!(args[args.len() - 2], "deploy@node1");
        assert_eq!(args[args.len() - 1], "/bin/true");
    }

    #[test]
    fn probe_keeps_explicit_user() {
        let probe = SshPasswordlessCheck::default();
        let args = probe.probe_args("deploy", "admin@node1");

        assert_eq!(args[args.len() - 2], "admin@node1");
    }

    #[test]
    fn probe_of_descriptor_omits_password() {
        let probe = SshPasswordlessCheck::default();
        let args = probe.probe_args("deploy", "admin:hunter2@node1:2222");

        assert!(args.iter().all(|a| !a.contains("hunter2")));
        assert!(args.windows(2).any(|w| w[0] == "-p" && w[1] == "2222"));
        assert_eq!(args[args.len() - 2], "deploy@node1");
    }

    #[test]
    fn probe_applies_ssh_options() {
        let probe = SshPasswordlessCheck::new(SshOptions {
            connect_timeout: Some(2),
            ..Default::default()
        });
        let args = probe.probe_args("deploy", "node1");

        assert!(args.contains(&"ConnectTimeout=2".to_string()));
    }
}
