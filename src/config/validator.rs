//! Manifest validation rules.
//!
//! - At least one check must be defined
//! - Each check must use a supported kind
//! - Each check must name at least one package

use crate::config::schema::CheckManifest;
use crate::error::{PkgvError, Result};
use crate::validation::PackageKind;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
    /// Index of the offending check, if the error is check-specific
    pub check: Option<usize>,
}

/// Validate a manifest and return all errors.
///
/// All errors are collected rather than stopping at the first one.
pub fn validate_manifest(manifest: &CheckManifest) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if manifest.checks.is_empty() {
        errors.push(ValidationError {
            rule: "no-checks".to_string(),
            message: "Manifest defines no checks".to_string(),
            check: None,
        });
    }

    for (index, check) in manifest.checks.iter().enumerate() {
        if check.kind.parse::<PackageKind>().is_err() {
            errors.push(ValidationError {
                rule: "unsupported-kind".to_string(),
                message: format!(
                    "Check {} uses unsupported kind '{}' (expected rpms or pip3s)",
                    index + 1,
                    check.kind
                ),
                check: Some(index),
            });
        }

        if check.packages.is_empty() {
            errors.push(ValidationError {
                rule: "no-packages".to_string(),
                message: format!("Check {} lists no packages", index + 1),
                check: Some(index),
            });
        }
    }

    errors
}

/// Validate a manifest, joining all errors into one.
pub fn validate(manifest: &CheckManifest) -> Result<()> {
    let errors = validate_manifest(manifest);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(PkgvError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
