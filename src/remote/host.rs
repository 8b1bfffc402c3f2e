//! Credentialed host descriptors.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{PkgvError, Result};

/// `user:password@host:port`, four groups.
static HOST_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+):(.+)@(.+):(\d+)").expect("HOST_URL_REGEX must compile")
});

/// A host reached with explicit credentials, parsed from
/// `user:password@host:port`.
///
/// The password is never shown by `Display` or `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl HostSpec {
    /// Parse a `user:password@host:port` string.
    ///
    /// Like the pattern search it is built on, surrounding text is tolerated;
    /// the password may contain `:` and `@`, the host is taken up to the last
    /// `:<digits>`.
    pub fn parse(input: &str) -> Result<Self> {
        let caps = HOST_URL_REGEX
            .captures(input)
            .ok_or_else(|| PkgvError::InvalidHostFormat {
                message: "expected user:password@host:port".to_string(),
            })?;

        let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
        let (Some(user), Some(password), Some(host), Some(port)) =
            (group(1), group(2), group(3), group(4))
        else {
            return Err(PkgvError::InvalidHostFormat {
                message: "expected user:password@host:port".to_string(),
            });
        };

        let port = port.parse::<u16>().map_err(|_| PkgvError::InvalidHostFormat {
            message: format!("port {} is out of range", port),
        })?;

        Ok(Self {
            user,
            password,
            host,
            port,
        })
    }

    /// `user@host` destination for the ssh client.
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// Host text safe to print: credentials are reduced to `user@host:port`.
pub fn display_host(input: &str) -> String {
    match HostSpec::parse(input) {
        Ok(spec) => spec.to_string(),
        Err(_) => input.to_string(),
    }
}

impl FromStr for HostSpec {
    type Err = PkgvError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.user, self.host, self.port)
    }
}

impl fmt::Debug for HostSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostSpec")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
