//! Installed-package validation.
//!
//! This module checks that RPM or pip3 packages are installed, optionally
//! at exact versions, on the local machine or a remote host.
//!
//! # Modules
//!
//! - [`executor`] - Running listing commands over a connection
//! - [`listing`] - Presence and version extraction from listings
//! - [`request`] - Package kinds, targets and requests
//! - [`validator`] - The [`PkgValidator`] entry point
//!
//! # Example
//!
//! ```no_run
//! use pkgv::validation::{PkgValidator, Targets};
//!
//! let validator = PkgValidator::new();
//! let targets = Targets::from_args(&["bash", "curl"]).unwrap();
//! validator.validate("rpms", &targets, None).unwrap();
//! ```

pub mod executor;
pub mod listing;
pub mod request;
pub mod validator;

pub use executor::execute_cmd;
pub use listing::{extract_version, find_installed, is_listed, InstalledPackage};
pub use request::{PackageKind, Targets, ValidationRequest};
pub use validator::PkgValidator;
