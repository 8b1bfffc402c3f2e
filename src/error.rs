//! Error types for pkgv operations.
//!
//! This module defines [`PkgvError`], the error type returned by every
//! validation call, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - The first unmet condition aborts a validation with one `PkgvError`
//! - Every validation failure carries the `EINVAL` error code
//! - Capability implementations may use `anyhow` internally; the chain is
//!   rendered into the message where it crosses into `PkgvError`

use std::path::PathBuf;
use thiserror::Error;

/// Invalid argument.
pub const EINVAL: i32 = 22;

/// Input/output error, used when an I/O failure carries no OS errno.
pub const EIO: i32 = 5;

/// Core error type for pkgv operations.
#[derive(Debug, Error)]
pub enum PkgvError {
    /// A requested package does not appear in the package listing.
    #[error("{manager} pkg {package} not installed.")]
    PackageNotInstalled { manager: String, package: String },

    /// A package is installed with a different version than expected.
    #[error(
        "Mismatched version for {manager} package {package}. Installed {installed}. Expected {expected}."
    )]
    VersionMismatch {
        manager: String,
        package: String,
        installed: String,
        expected: String,
    },

    /// The validation kind tag is not one of `rpms` or `pip3s`.
    #[error("Action parameter {kind} not supported")]
    UnsupportedKind { kind: String },

    /// Host string is not `user:password@host:port`.
    #[error("Invalid host_url format is given for passwordless ssh not configured host: {message}")]
    InvalidHostFormat { message: String },

    /// An ssh session could not be established.
    #[error("Failed to create ssh connection to {host}, Error: {message}")]
    ConnectionFailure { host: String, message: String },

    /// A command exited with a non-zero code.
    #[error("Command failure. cmd: {command} stderr: {output}")]
    CommandFailure { command: String, output: String },

    /// Check manifest not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse a check manifest.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Manifest parsed but its contents are unusable.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PkgvError {
    /// Errno-style code for this error.
    ///
    /// All validation and configuration failures report `EINVAL`. I/O errors
    /// keep their OS errno when one is available.
    pub fn code(&self) -> i32 {
        match self {
            PkgvError::Io(e) => e.raw_os_error().unwrap_or(EIO),
            _ => EINVAL,
        }
    }
}

/// Result type alias for pkgv operations.
pub type Result<T> = std::result::Result<T, PkgvError>;
