//! Package validator entry point.

use crate::error::{PkgvError, Result};
use crate::remote::{
    select_connection, Connection, PasswordlessCheck, SessionFactory, SshOptions,
    SshPasswordlessCheck, SshSessionFactory,
};
use crate::shell::{current_username, ProcessRunner, ShellProcessRunner};

use super::executor::execute_cmd;
use super::listing::find_installed;
use super::request::{PackageKind, Targets, ValidationRequest};

/// Validates that packages are installed on a local or remote host.
///
/// Each call selects its own [`Connection`] and releases it before
/// returning, whatever the outcome.
pub struct PkgValidator {
    probe: Box<dyn PasswordlessCheck>,
    sessions: Box<dyn SessionFactory>,
    runner: Box<dyn ProcessRunner>,
    local_user: Option<String>,
}

impl Default for PkgValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl PkgValidator {
    /// Validator using the system ssh client with default options.
    pub fn new() -> Self {
        Self::with_ssh_options(SshOptions::default())
    }

    /// Validator using the system ssh client with `options`.
    pub fn with_ssh_options(options: SshOptions) -> Self {
        Self::with_capabilities(
            Box::new(SshPasswordlessCheck::new(options.clone())),
            Box::new(SshSessionFactory::new(options)),
            Box::new(ShellProcessRunner::new()),
        )
    }

    /// Validator with explicit capabilities.
    ///
    /// The passwordless probe runs as the current OS user.
    pub fn with_capabilities(
        probe: Box<dyn PasswordlessCheck>,
        sessions: Box<dyn SessionFactory>,
        runner: Box<dyn ProcessRunner>,
    ) -> Self {
        Self {
            probe,
            sessions,
            runner,
            local_user: current_username(),
        }
    }

    /// Override the user the passwordless probe logs in as.
    pub fn with_local_user(mut self, user: Option<String>) -> Self {
        self.local_user = user;
        self
    }

    /// Validate packages of the kind tagged `kind` (`rpms` or `pip3s`).
    ///
    /// An unsupported tag fails before any connection is made.
    pub fn validate(&self, kind: &str, targets: &Targets, host: Option<&str>) -> Result<()> {
        let kind: PackageKind = kind.parse()?;
        self.validate_kind(kind, targets, host)
    }

    /// Validate a typed request.
    pub fn validate_request(&self, request: &ValidationRequest) -> Result<()> {
        self.validate_kind(request.kind, &request.targets, request.host.as_deref())
    }

    fn validate_kind(&self, kind: PackageKind, targets: &Targets, host: Option<&str>) -> Result<()> {
        let mut connection = select_connection(
            host,
            self.local_user.as_deref(),
            self.probe.as_ref(),
            self.sessions.as_ref(),
        )?;

        let result = match kind {
            PackageKind::Rpm => self.validate_rpm_pkgs(&mut connection, targets),
            PackageKind::Pip3 => self.validate_pip3_pkgs(&mut connection, targets),
        };

        connection.close();
        result
    }

    /// Check RPM packages via `rpm -qa`.
    pub fn validate_rpm_pkgs(&self, connection: &mut Connection, targets: &Targets) -> Result<()> {
        self.validate_packages(PackageKind::Rpm, connection, targets)
    }

    /// Check Python packages via `pip3 list`.
    pub fn validate_pip3_pkgs(&self, connection: &mut Connection, targets: &Targets) -> Result<()> {
        self.validate_packages(PackageKind::Pip3, connection, targets)
    }

    fn validate_packages(
        &self,
        kind: PackageKind,
        connection: &mut Connection,
        targets: &Targets,
    ) -> Result<()> {
        let command = connection.wrap_command(kind.list_command());
        let output = execute_cmd(connection, self.runner.as_ref(), &command)?;

        for name in targets.names() {
            let Some(installed) = find_installed(kind, &output, name) else {
                return Err(PkgvError::PackageNotInstalled {
                    manager: kind.manager().to_string(),
                    package: name.to_string(),
                });
            };

            let Some(expected) = targets.expected_version(name) else {
                tracing::debug!("{} package {} is installed", kind.manager(), name);
                continue;
            };

            if installed.version.as_deref() != Some(expected) {
                return Err(PkgvError::VersionMismatch {
                    manager: kind.manager().to_string(),
                    package: name.to_string(),
                    installed: installed.version.unwrap_or_else(|| "unknown".to_string()),
                    expected: expected.to_string(),
                });
            }
            tracing::debug!(
                "{} package {} is installed at {}",
                kind.manager(),
                name,
                expected
            );
        }

        tracing::info!(
            "{} {} package(s) validated",
            targets.len(),
            kind.manager()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{HostSpec, RemoteSession};
    use crate::shell::ProcessOutput;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        local: Vec<String>,
        remote: Vec<String>,
        probes: usize,
        connects: usize,
        disconnects: usize,
    }

    struct Probe {
        ok: bool,
        log: Rc<RefCell<Log>>,
    }

    impl PasswordlessCheck for Probe {
        fn check(&self, _local_user: &str, host: &str) -> Result<()> {
            self.log.borrow_mut().probes += 1;
            if self.ok {
                Ok(())
            } else {
                Err(PkgvError::ConnectionFailure {
                    host: host.to_string(),
                    message: "denied".into(),
                })
            }
        }
    }

    struct Session {
        output: String,
        log: Rc<RefCell<Log>>,
    }

    impl RemoteSession for Session {
        fn execute(&mut self, command: &str) -> Result<(i32, String)> {
            self.log.borrow_mut().remote.push(command.to_string());
            Ok((0, self.output.clone()))
        }

        fn disconnect(&mut self) -> Result<()> {
            self.log.borrow_mut().disconnects += 1;
            Ok(())
        }
    }

    struct Factory {
        output: String,
        log: Rc<RefCell<Log>>,
    }

    impl SessionFactory for Factory {
        fn connect(&self, _spec: &HostSpec) -> anyhow::Result<Box<dyn RemoteSession>> {
            self.log.borrow_mut().connects += 1;
            Ok(Box::new(Session {
                output: self.output.clone(),
                log: Rc::clone(&self.log),
            }))
        }
    }

    struct Runner {
        output: String,
        returncode: i32,
        log: Rc<RefCell<Log>>,
    }

    impl ProcessRunner for Runner {
        fn run(&self, command: &str) -> Result<ProcessOutput> {
            self.log.borrow_mut().local.push(command.to_string());
            Ok(ProcessOutput {
                stdout: self.output.as_bytes().to_vec(),
                stderr: b"failed".to_vec(),
                returncode: self.returncode,
            })
        }
    }

    fn validator(output: &str, probe_ok: bool) -> (PkgValidator, Rc<RefCell<Log>>) {
        validator_with_code(output, probe_ok, 0)
    }

    fn validator_with_code(
        output: &str,
        probe_ok: bool,
        returncode: i32,
    ) -> (PkgValidator, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let v = PkgValidator::with_capabilities(
            Box::new(Probe {
                ok: probe_ok,
                log: Rc::clone(&log),
            }),
            Box::new(Factory {
                output: output.to_string(),
                log: Rc::clone(&log),
            }),
            Box::new(Runner {
                output: output.to_string(),
                returncode,
                log: Rc::clone(&log),
            }),
        )
        .with_local_user(Some("tester".into()));
        (v, log)
    }

    fn plain(names: &[&str]) -> Targets {
        Targets::Plain(names.iter().map(|n| n.to_string()).collect())
    }

    fn versioned(pairs: &[(&str, &str)]) -> Targets {
        Targets::Versioned(
            pairs
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        )
    }

    const RPMS: &str = "bash-5.1.8-6.el9.x86_64\ncurl-7.76.1-26.el9.x86_64\n";

    #[test]
    fn local_plain_rpm_list_succeeds() {
        let (v, log) = validator(RPMS, true);
        v.validate("rpms", &plain(&["bash", "curl"]), None).unwrap();

        let log = log.borrow();
        assert_eq!(log.local, vec!["rpm -qa"]);
        assert_eq!(log.probes, 0);
    }

    #[test]
    fn missing_rpm_is_reported() {
        let (v, _) = validator("bash-5.1.8-6.el9.x86_64\n", true);
        let err = v
            .validate("rpms", &plain(&["bash", "curl"]), None)
            .unwrap_err();

        assert!(
            matches!(err, PkgvError::PackageNotInstalled { ref package, ref manager } if package == "curl" && manager == "rpm")
        );
    }

    #[test]
    fn plain_list_skips_version_check() {
        let (v, _) = validator("curl\n", true);
        v.validate("rpms", &plain(&["curl"]), None).unwrap();
    }

    #[test]
    fn versioned_rpms_match() {
        let (v, _) = validator(RPMS, true);
        v.validate(
            "rpms",
            &versioned(&[("bash", "5.1.8"), ("curl", "7.76.1")]),
            None,
        )
        .unwrap();
    }

    #[test]
    fn versioned_rpm_mismatch_names_package() {
        let (v, _) = validator(RPMS, true);
        let err = v
            .validate("rpms", &versioned(&[("curl", "8.0.0")]), None)
            .unwrap_err();

        match err {
            PkgvError::VersionMismatch {
                package,
                installed,
                expected,
                ..
            } => {
                assert_eq!(package, "curl");
                assert_eq!(installed, "7.76.1");
                assert_eq!(expected, "8.0.0");
            }
            other => panic!("Expected VersionMismatch, got {:?}", other),
        }
    }

    #[test]
    fn unextractable_version_is_a_mismatch() {
        let (v, _) = validator("curl\n", true);
        let err = v
            .validate("rpms", &versioned(&[("curl", "7.76.1")]), None)
            .unwrap_err();

        assert!(matches!(err, PkgvError::VersionMismatch { ref installed, .. } if installed == "unknown"));
    }

    #[test]
    fn pip3_versions_checked() {
        let (v, log) = validator("requests (2.25.1)\nPyYAML (5.4.1)\n", true);
        v.validate("pip3s", &versioned(&[("requests", "2.25.1")]), None)
            .unwrap();
        assert_eq!(log.borrow().local, vec!["pip3 list"]);

        let err = v
            .validate("pip3s", &versioned(&[("PyYAML", "6.0")]), None)
            .unwrap_err();
        assert!(err.to_string().contains("pip3 package PyYAML"));
    }

    #[test]
    fn pip3_columnar_listing_is_case_sensitive() {
        let (v, _) = validator("Package    Version\n---------- -------\nPyYAML     6.0.1\n", true);
        v.validate("pip3s", &versioned(&[("PyYAML", "6.0.1")]), None)
            .unwrap();

        let err = v
            .validate("pip3s", &versioned(&[("pyyaml", "6.0.1")]), None)
            .unwrap_err();
        assert!(matches!(
            err,
            PkgvError::PackageNotInstalled { ref manager, ref package }
                if manager == "pip3" && package == "pyyaml"
        ));
    }

    #[test]
    fn unsupported_kind_runs_nothing() {
        let (v, log) = validator(RPMS, true);
        let err = v
            .validate("debs", &plain(&["bash"]), Some("node1"))
            .unwrap_err();

        assert!(matches!(err, PkgvError::UnsupportedKind { ref kind } if kind == "debs"));
        let log = log.borrow();
        assert!(log.local.is_empty());
        assert_eq!(log.probes, 0);
        assert_eq!(log.connects, 0);
    }

    #[test]
    fn passwordless_host_wraps_command() {
        let (v, log) = validator(RPMS, true);
        v.validate("rpms", &plain(&["bash"]), Some("node1")).unwrap();

        let log = log.borrow();
        assert_eq!(log.local, vec!["ssh node1 rpm -qa"]);
        assert_eq!(log.connects, 0);
    }

    #[test]
    fn credentialed_host_uses_unwrapped_session_and_disconnects() {
        let (v, log) = validator(RPMS, false);
        v.validate("rpms", &plain(&["bash"]), Some("admin:pw@node1:22"))
            .unwrap();

        let log = log.borrow();
        assert!(log.local.is_empty());
        assert_eq!(log.remote, vec!["rpm -qa"]);
        assert_eq!(log.connects, 1);
        assert_eq!(log.disconnects, 1);
    }

    #[test]
    fn session_released_on_validation_failure() {
        let (v, log) = validator(RPMS, false);
        let err = v
            .validate("pip3s", &plain(&["requests"]), Some("admin:pw@node1:22"))
            .unwrap_err();

        assert!(matches!(err, PkgvError::PackageNotInstalled { .. }));
        assert_eq!(log.borrow().disconnects, 1);
    }

    #[test]
    fn invalid_host_fails_before_any_command() {
        let (v, log) = validator(RPMS, false);
        let err = v
            .validate("rpms", &plain(&["bash"]), Some("node1"))
            .unwrap_err();

        assert!(matches!(err, PkgvError::InvalidHostFormat { .. }));
        let log = log.borrow();
        assert!(log.local.is_empty());
        assert!(log.remote.is_empty());
        assert_eq!(log.connects, 0);
    }

    #[test]
    fn command_failure_surfaces_output() {
        let (v, _) = validator_with_code("", true, 1);
        let err = v.validate("rpms", &plain(&["bash"]), None).unwrap_err();

        assert!(
            matches!(err, PkgvError::CommandFailure { ref command, ref output } if command == "rpm -qa" && output == "failed")
        );
    }

    #[test]
    fn typed_request_entry_point() {
        let (v, _) = validator(RPMS, true);
        let request = ValidationRequest::new(PackageKind::Rpm, plain(&["curl"]), None);
        v.validate_request(&request).unwrap();
    }
}
