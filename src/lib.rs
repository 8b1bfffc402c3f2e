//! pkgv - Validate installed RPM and pip3 packages.
//!
//! pkgv checks that packages are installed, optionally at exact versions,
//! on the local machine or on a remote host reached over ssh.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Check manifest loading and validation
//! - [`error`] - Error types and result aliases
//! - [`remote`] - Connection selection and ssh sessions
//! - [`shell`] - Local command execution
//! - [`ui`] - Terminal output
//! - [`validation`] - Package presence and version checks
//!
//! # Example
//!
//! ```
//! use pkgv::validation::{find_installed, PackageKind, Targets};
//!
//! let targets = Targets::from_args(&["bash=5.1.8"]).unwrap();
//! assert_eq!(targets.expected_version("bash"), Some("5.1.8"));
//!
//! let listing = "bash-5.1.8-6.el9.x86_64\n";
//! let installed = find_installed(PackageKind::Rpm, listing, "bash").unwrap();
//! assert_eq!(installed.version.as_deref(), Some("5.1.8"));
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod remote;
pub mod shell;
pub mod ui;
pub mod validation;

pub use error::{PkgvError, Result};
