//! Validation request types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use crate::error::{PkgvError, Result};

/// Which package manager to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PackageKind {
    /// RPM packages (`rpm -qa`).
    #[serde(rename = "rpms")]
    Rpm,
    /// Python packages (`pip3 list`).
    #[serde(rename = "pip3s")]
    Pip3,
}

impl PackageKind {
    /// Tag used on the command line and in manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Rpm => "rpms",
            PackageKind::Pip3 => "pip3s",
        }
    }

    /// Package manager name used in messages.
    pub fn manager(&self) -> &'static str {
        match self {
            PackageKind::Rpm => "rpm",
            PackageKind::Pip3 => "pip3",
        }
    }

    /// Command that lists installed packages.
    pub fn list_command(&self) -> &'static str {
        match self {
            PackageKind::Rpm => "rpm -qa",
            PackageKind::Pip3 => "pip3 list",
        }
    }
}

impl FromStr for PackageKind {
    type Err = PkgvError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rpms" => Ok(PackageKind::Rpm),
            "pip3s" => Ok(PackageKind::Pip3),
            other => Err(PkgvError::UnsupportedKind {
                kind: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Packages to look for.
///
/// In a manifest, a YAML list becomes [`Targets::Plain`] and a mapping of
/// name to version becomes [`Targets::Versioned`]. Versions must be YAML
/// strings: an unquoted `5.10` would otherwise arrive as the float `5.1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Targets {
    /// Names only; versions are never checked.
    Plain(Vec<String>),
    /// Name to expected version.
    Versioned(BTreeMap<String, String>),
}

impl Targets {
    /// Build targets from `name` or `name=version` arguments.
    ///
    /// Either every argument carries a version or none does.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let versioned = args.iter().any(|a| a.as_ref().contains('='));
        if !versioned {
            return Ok(Targets::Plain(
                args.iter().map(|a| a.as_ref().to_string()).collect(),
            ));
        }

        let mut map = BTreeMap::new();
        for arg in args {
            let arg = arg.as_ref();
            let Some((name, version)) = arg.split_once('=') else {
                return Err(PkgvError::ConfigValidationError {
                    message: format!(
                        "package '{}' has no version; give every package as name=version or none",
                        arg
                    ),
                });
            };
            if name.is_empty() || version.is_empty() {
                return Err(PkgvError::ConfigValidationError {
                    message: format!("invalid package argument '{}'", arg),
                });
            }
            map.insert(name.to_string(), version.to_string());
        }
        Ok(Targets::Versioned(map))
    }

    /// Package names in check order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Targets::Plain(names) => names.iter().map(String::as_str).collect(),
            Targets::Versioned(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Expected version for `name`, if versions are checked.
    pub fn expected_version(&self, name: &str) -> Option<&str> {
        match self {
            Targets::Plain(_) => None,
            Targets::Versioned(map) => map.get(name).map(String::as_str),
        }
    }

    pub fn is_versioned(&self) -> bool {
        matches!(self, Targets::Versioned(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Targets::Plain(names) => names.len(),
            Targets::Versioned(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'de> Deserialize<'de> for Targets {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(D::Error::custom(format!(
                        "package names must be strings, got {:?}",
                        other
                    ))),
                })
                .collect::<std::result::Result<Vec<_>, _>>()
                .map(Targets::Plain),
            Value::Mapping(entries) => entries
                .into_iter()
                .map(|(name, version)| match (name, version) {
                    (Value::String(name), Value::String(version)) => Ok((name, version)),
                    (Value::String(name), _) => Err(D::Error::custom(format!(
                        "version for '{}' must be a quoted string",
                        name
                    ))),
                    (other, _) => Err(D::Error::custom(format!(
                        "package names must be strings, got {:?}",
                        other
                    ))),
                })
                .collect::<std::result::Result<BTreeMap<_, _>, _>>()
                .map(Targets::Versioned),
            _ => Err(D::Error::custom(
                "packages must be a list of names or a mapping of name to version",
            )),
        }
    }
}

/// A complete validation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRequest {
    pub kind: PackageKind,
    pub targets: Targets,
    /// `None` validates the local machine.
    pub host: Option<String>,
}

impl ValidationRequest {
    pub fn new(kind: PackageKind, targets: Targets, host: Option<String>) -> Self {
        Self {
            kind,
            targets,
            host,
        }
    }
}
