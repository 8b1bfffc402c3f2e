//! `pkgv rpms` and `pkgv pip3s` command implementation.

use crate::cli::args::PackageArgs;
use crate::error::Result;
use crate::remote::display_host;
use crate::ui::UserInterface;
use crate::validation::{PackageKind, PkgValidator, Targets, ValidationRequest};

use super::dispatcher::{Command, CommandResult};

/// Checks one list of packages of a single kind.
pub struct ValidateCommand {
    kind: PackageKind,
    args: PackageArgs,
    validator: PkgValidator,
}

impl ValidateCommand {
    /// Create a command backed by the system ssh client.
    pub fn new(kind: PackageKind, args: PackageArgs) -> Self {
        Self {
            kind,
            args,
            validator: PkgValidator::new(),
        }
    }

    /// Replace the validator.
    pub fn with_validator(mut self, validator: PkgValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &PackageArgs {
        &self.args
    }

    fn request(&self) -> Result<ValidationRequest> {
        let targets = Targets::from_args(self.args.packages.as_slice())?;
        Ok(ValidationRequest::new(
            self.kind,
            targets,
            self.args.host.clone(),
        ))
    }
}

impl Command for ValidateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let request = self.request()?;
        let location = request
            .host
            .as_deref()
            .map(display_host)
            .unwrap_or_else(|| "localhost".to_string());

        ui.message(&format!(
            "Checking {} {} package(s) on {}",
            request.targets.len(),
            self.kind.manager(),
            location
        ));
        for name in request.targets.names() {
            match request.targets.expected_version(name) {
                Some(version) => ui.detail(&format!("{} = {}", name, version)),
                None => ui.detail(name),
            }
        }

        tracing::debug!(kind = %self.kind, host = %location, "validating packages");
        self.validator.validate_request(&request)?;

        ui.success(&format!(
            "All {} {} package(s) installed",
            request.targets.len(),
            self.kind.manager()
        ));
        Ok(CommandResult::success())
    }
}
