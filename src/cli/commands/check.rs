//! `pkgv check` command implementation.
//!
//! Runs every check in the manifest in order and stops at the first
//! failure. Checks after a failure are reported as skipped.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::args::CheckArgs;
use crate::config::{load_manifest, manifest_path, validate, CheckManifest};
use crate::error::{PkgvError, Result};
use crate::remote::{display_host, HostSpec};
use crate::ui::UserInterface;
use crate::validation::{PkgValidator, Targets};

use super::dispatcher::{describe_error, Command, CommandResult};

/// Outcome of a single manifest check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
    Skipped,
}

/// One entry of the `--json` summary.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub kind: String,
    pub host: Option<String>,
    pub packages: Targets,
    pub status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The `--json` summary.
#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub manifest: PathBuf,
    pub success: bool,
    pub checks: Vec<CheckOutcome>,
}

/// The check command implementation.
pub struct CheckCommand {
    working_dir: PathBuf,
    args: CheckArgs,
    validator: Option<PkgValidator>,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(working_dir: &Path, args: CheckArgs) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            args,
            validator: None,
        }
    }

    /// Use `validator` instead of one built from the manifest's ssh options.
    pub fn with_validator(mut self, validator: PkgValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Run the checks, filling in one outcome per check.
    fn run_checks(
        &self,
        manifest: &CheckManifest,
        validator: &PkgValidator,
        ui: &mut dyn UserInterface,
    ) -> (Vec<CheckOutcome>, Option<PkgvError>) {
        let mut outcomes = Vec::with_capacity(manifest.checks.len());
        let mut failure = None;
        // Keep stdout parseable in --json mode.
        let report = !self.args.json;

        for (index, check) in manifest.checks.iter().enumerate() {
            let host = check.effective_host(manifest).map(display_host);
            let mut outcome = CheckOutcome {
                kind: check.kind.clone(),
                host: host.clone(),
                packages: check.packages.clone(),
                status: CheckStatus::Skipped,
                error: None,
            };

            if failure.is_some() {
                outcomes.push(outcome);
                continue;
            }

            if report {
                ui.message(&format!(
                    "[{}/{}] {} on {}",
                    index + 1,
                    manifest.checks.len(),
                    check.kind,
                    host.as_deref().unwrap_or("localhost")
                ));
                for name in check.packages.names() {
                    ui.detail(name);
                }
            }

            let result = check
                .to_request(manifest)
                .and_then(|request| validator.validate_request(&request));

            match result {
                Ok(()) => {
                    outcome.status = CheckStatus::Passed;
                    if report {
                        ui.success(&format!("{} package(s) installed", check.packages.len()));
                    }
                }
                Err(e) => {
                    tracing::debug!(check = index + 1, error = %e, "check failed");
                    outcome.status = CheckStatus::Failed;
                    outcome.error = Some(e.to_string());
                    failure = Some(e);
                }
            }
            outcomes.push(outcome);
        }

        (outcomes, failure)
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let path = manifest_path(&self.working_dir, self.args.config.as_deref());
        let manifest = match load_manifest(&path) {
            Ok(m) => m,
            Err(PkgvError::ConfigNotFound { .. }) => {
                ui.error(&format!("No manifest found at {}", path.display()));
                return Ok(CommandResult::failure(2));
            }
            Err(e) => return Err(e),
        };
        validate(&manifest)?;

        let stores_password = manifest
            .host
            .iter()
            .chain(manifest.checks.iter().filter_map(|c| c.host.as_ref()))
            .any(|h| HostSpec::parse(h).is_ok());
        if stores_password {
            ui.warning("Manifest stores a host password in plain text");
        }

        let owned;
        let validator = match &self.validator {
            Some(v) => v,
            None => {
                owned = PkgValidator::with_ssh_options(manifest.ssh.clone());
                &owned
            }
        };

        let (checks, failure) = self.run_checks(&manifest, validator, ui);

        if self.args.json {
            let summary = CheckSummary {
                manifest: path,
                success: failure.is_none(),
                checks,
            };
            let json = serde_json::to_string_pretty(&summary)
                .map_err(|e| PkgvError::Other(e.into()))?;
            ui.data(&json);
        }

        match failure {
            None => {
                if !self.args.json {
                    ui.success("All checks passed");
                }
                Ok(CommandResult::success())
            }
            Some(e) => {
                ui.error(&format!("Error: {}", describe_error(&e)));
                Ok(CommandResult::failure(1))
            }
        }
    }
}
