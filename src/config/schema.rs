//! Check manifest schema.

use serde::{Deserialize, Serialize};

use crate::remote::SshOptions;
use crate::validation::{PackageKind, Targets, ValidationRequest};
use crate::error::Result;

/// Top-level manifest (`pkgv.yml`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckManifest {
    /// Default host for every check (`user:password@host:port` or a bare
    /// host reachable with passwordless ssh).
    #[serde(default)]
    pub host: Option<String>,

    /// ssh client options.
    #[serde(default)]
    pub ssh: SshOptions,

    /// Checks, run in order.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

/// A single package check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckConfig {
    /// `rpms` or `pip3s`. Kept as text so an unknown tag is reported by
    /// manifest validation rather than as a parse error.
    pub kind: String,

    /// Host override for this check.
    #[serde(default)]
    pub host: Option<String>,

    /// Package names, or a mapping of name to expected version.
    pub packages: Targets,
}

impl CheckConfig {
    /// Host this check runs against, falling back to the manifest default.
    pub fn effective_host<'a>(&'a self, manifest: &'a CheckManifest) -> Option<&'a str> {
        self.host.as_deref().or(manifest.host.as_deref())
    }

    /// Build the typed request for this check.
    pub fn to_request(&self, manifest: &CheckManifest) -> Result<ValidationRequest> {
        let kind: PackageKind = self.kind.parse()?;
        Ok(ValidationRequest::new(
            kind,
            self.packages.clone(),
            self.effective_host(manifest).map(str::to_string),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PkgvError;

    const MANIFEST: &str = r#"
host: admin:secret@node1:22
ssh:
  connect_timeout: 5
checks:
  - kind: rpms
    packages: [bash, curl]
  - kind: pip3s
    host: node2
    packages:
      requests: "2.25.1"
"#;

    #[test]
    fn parses_full_manifest() {
        let manifest: CheckManifest = serde_yaml::from_str(MANIFEST).unwrap();
        assert_eq!(manifest.host.as_deref(), Some("admin:secret@node1:22"));
        assert_eq!(manifest.ssh.connect_timeout, Some(5));
        assert_eq!(manifest.checks.len(), 2);
        assert_eq!(manifest.checks[0].kind, "rpms");
        assert!(manifest.checks[1].packages.is_versioned());
    }

    #[test]
    fn check_host_overrides_default() {
        let manifest: CheckManifest = serde_yaml::from_str(MANIFEST).unwrap();
        assert_eq!(
            manifest.checks[0].effective_host(&manifest),
            Some("admin:secret@node1:22")
        );
        assert_eq!(manifest.checks[1].effective_host(&manifest), Some("node2"));
    }

    #[test]
    fn to_request_parses_kind() {
        let manifest: CheckManifest = serde_yaml::from_str(MANIFEST).unwrap();
        let request = manifest.checks[1].to_request(&manifest).unwrap();
        assert_eq!(request.kind, PackageKind::Pip3);
        assert_eq!(request.host.as_deref(), Some("node2"));
    }

    #[test]
    fn to_request_rejects_unknown_kind() {
        let check = CheckConfig {
            kind: "debs".into(),
            host: None,
            packages: Targets::Plain(vec!["bash".into()]),
        };
        let err = check.to_request(&CheckManifest::default()).unwrap_err();
        assert!(matches!(err, PkgvError::UnsupportedKind { .. }));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_yaml::from_str::<CheckManifest>("checks: []\nretries: 3\n");
        assert!(result.is_err());
    }
}
