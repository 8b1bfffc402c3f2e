//! Library integration tests.

use pkgv::PkgvError;

#[test]
fn error_types_are_public() {
    let err = PkgvError::PackageNotInstalled {
        manager: "pip3".into(),
        package: "requests".into(),
    };
    assert_eq!(err.to_string(), "pip3 pkg requests not installed.");
    assert_eq!(err.code(), pkgv::error::EINVAL);
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> pkgv::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use pkgv::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["pkgv", "pip3s", "--host", "node1", "six"]);
    match cli.command {
        Commands::Pip3s(args) => {
            assert_eq!(args.host.as_deref(), Some("node1"));
            assert_eq!(args.packages, vec!["six"]);
        }
        other => panic!("Expected Pip3s, got {:?}", other),
    }
}

#[test]
fn unsupported_kind_fails_before_connecting() {
    use pkgv::validation::{PkgValidator, Targets};

    let validator = PkgValidator::new();
    let targets = Targets::from_args(&["bash"]).unwrap();
    let err = validator
        .validate("debs", &targets, Some("admin:pw@unreachable.invalid:22"))
        .unwrap_err();

    assert!(matches!(err, PkgvError::UnsupportedKind { ref kind } if kind == "debs"));
}

#[test]
fn manifest_round_trips_through_public_api() {
    use pkgv::config::{parse_manifest, validate};
    use std::path::Path;

    let manifest = parse_manifest(
        "host: node1\nchecks:\n  - kind: pip3s\n    packages:\n      six: \"1.16.0\"\n",
        Path::new("pkgv.yml"),
    )
    .unwrap();
    validate(&manifest).unwrap();

    let request = manifest.checks[0].to_request(&manifest).unwrap();
    assert_eq!(request.host.as_deref(), Some("node1"));
    assert_eq!(request.targets.expected_version("six"), Some("1.16.0"));
}

#[test]
fn host_descriptor_parses() {
    use pkgv::remote::HostSpec;

    let spec: HostSpec = "admin:secret@node1:2222".parse().unwrap();
    assert_eq!(spec.port, 2222);
    assert_eq!(spec.to_string(), "admin@node1:2222");
}
