//! Check manifest loading, parsing, and validation.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use pkgv::config::{load_manifest, validate};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! let path = temp.path().join("pkgv.yml");
//! fs::write(&path, "checks:\n  - kind: rpms\n    packages: [bash]\n").unwrap();
//!
//! let manifest = load_manifest(&path).unwrap();
//! validate(&manifest).unwrap();
//! assert_eq!(manifest.checks[0].kind, "rpms");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{load_manifest, manifest_path, parse_manifest, DEFAULT_MANIFEST};
pub use schema::{CheckConfig, CheckManifest};
pub use validator::{validate, validate_manifest, ValidationError};
