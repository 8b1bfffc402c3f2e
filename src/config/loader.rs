//! Manifest discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::CheckManifest;
use crate::error::{PkgvError, Result};

/// Default manifest file name, looked up in the working directory.
pub const DEFAULT_MANIFEST: &str = "pkgv.yml";

/// Resolve the manifest path: the override if given, else
/// `<dir>/pkgv.yml`.
pub fn manifest_path(dir: &Path, config_override: Option<&Path>) -> PathBuf {
    match config_override {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => dir.join(path),
        None => dir.join(DEFAULT_MANIFEST),
    }
}

/// Load a manifest file.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_manifest(path: &Path) -> Result<CheckManifest> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PkgvError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PkgvError::Io(e)
        }
    })?;

    parse_manifest(&content, path)
}

/// Parse YAML content into a manifest.
///
/// `source_path` is used for error reporting only.
pub fn parse_manifest(content: &str, source_path: &Path) -> Result<CheckManifest> {
    tracing::debug!("Parsing manifest {}", source_path.display());
    serde_yaml::from_str(content).map_err(|e| PkgvError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}
