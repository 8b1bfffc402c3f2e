//! ssh client options shared by the probe and credentialed sessions.

use serde::{Deserialize, Serialize};

/// How the ssh client treats unknown or changed host keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyPolicy {
    /// Only connect to hosts already in `known_hosts`.
    Yes,
    /// Record new hosts, refuse changed keys.
    #[default]
    AcceptNew,
    /// Never verify host keys.
    No,
}

impl HostKeyPolicy {
    /// Value for ssh's `StrictHostKeyChecking` option.
    pub fn as_ssh_value(&self) -> &'static str {
        match self {
            HostKeyPolicy::Yes => "yes",
            HostKeyPolicy::AcceptNew => "accept-new",
            HostKeyPolicy::No => "no",
        }
    }
}

/// Options applied to every ssh invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SshOptions {
    /// Connection timeout in seconds (`None` leaves ssh's default).
    pub connect_timeout: Option<u64>,

    /// Host key verification policy.
    pub strict_host_key_checking: HostKeyPolicy,
}

impl Default for SshOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Some(10),
            strict_host_key_checking: HostKeyPolicy::default(),
        }
    }
}

impl SshOptions {
    /// Render as `-o` arguments for the ssh client.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            format!(
                "StrictHostKeyChecking={}",
                self.strict_host_key_checking.as_ssh_value()
            ),
        ];
        if let Some(timeout) = self.connect_timeout {
            args.push("-o".to_string());
            args.push(format!("ConnectTimeout={}", timeout));
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_include_timeout_and_policy() {
        let args = SshOptions::default().to_args();
        assert_eq!(
            args,
            vec![
                "-o",
                "StrictHostKeyChecking=accept-new",
                "-o",
                "ConnectTimeout=10"
            ]
        );
    }

    #[test]
    fn timeout_can_be_disabled() {
        let options = SshOptions {
            connect_timeout: None,
            strict_host_key_checking: HostKeyPolicy::No,
        };
        assert_eq!(options.to_args(), vec!["-o", "StrictHostKeyChecking=no"]);
    }

    #[test]
    fn deserializes_from_yaml() {
        let options: SshOptions =
            serde_yaml::from_str("strict_host_key_checking: yes\nconnect_timeout: 3").unwrap();
        assert_eq!(options.strict_host_key_checking, HostKeyPolicy::Yes);
        assert_eq!(options.connect_timeout, Some(3));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let options: SshOptions = serde_yaml::from_str("{}").unwrap();
        assert_eq!(options, SshOptions::default());
    }
}
