//! Package listing parsing.
//!
//! Presence is a plain substring test against the whole listing. Versions
//! are pulled out with per-manager patterns:
//!
//! - rpm: `<name>-<version>-` as printed by `rpm -qa`
//!   (`bash-5.1.8-4.el9.x86_64`)
//! - pip3: `<name> (<version>)` from legacy `pip list`, then the columnar
//!   `<name>   <version>` layout of current pip
//!
//! Line-anchored matches are preferred so `curl` is not read from
//! `libcurl-7.76.1-...`; an unanchored match is the fallback.

use regex::Regex;

use super::request::PackageKind;

/// A package found in a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub name: String,
    /// `None` when the name is present but no version could be extracted.
    pub version: Option<String>,
}

/// Whether `name` appears anywhere in `output`.
pub fn is_listed(output: &str, name: &str) -> bool {
    output.contains(name)
}

/// Look `name` up in a listing produced by `kind`'s list command.
pub fn find_installed(kind: PackageKind, output: &str, name: &str) -> Option<InstalledPackage> {
    if !is_listed(output, name) {
        return None;
    }
    Some(InstalledPackage {
        name: name.to_string(),
        version: extract_version(kind, output, name),
    })
}

/// Extract the installed version of `name` from a listing.
pub fn extract_version(kind: PackageKind, output: &str, name: &str) -> Option<String> {
    let name = regex::escape(name);
    let patterns = match kind {
        PackageKind::Rpm => vec![
            format!(r"(?m)^{}-(\d[\d.]*)-", name),
            format!(r"{}-(\d[\d.]*)-", name),
        ],
        PackageKind::Pip3 => vec![
            format!(r"(?m)^{} \(([^)]*)\)", name),
            format!(r"{} \(([^)]*)\)", name),
            format!(r"(?m)^{}[ \t]+(\S+)[ \t]*\r?$", name),
        ],
    };

    patterns
        .into_iter()
        .find_map(|pattern| first_capture(&pattern, output))
}

fn first_capture(pattern: &str, haystack: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
