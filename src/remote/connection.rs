//! Connection mode selection.
//!
//! A [`Connection`] decides how package listings reach the target host:
//!
//! 1. No host: commands run locally.
//! 2. Passwordless ssh works: commands run locally as `ssh <host> <cmd>`.
//! 3. Otherwise: the host must be `user:password@host:port` and an explicit
//!    session is opened; commands go through that session unwrapped.

use std::fmt;

use crate::error::{PkgvError, Result};

use super::host::HostSpec;
use super::passwordless::PasswordlessCheck;
use super::session::{RemoteSession, SessionFactory};

/// A session owned by one validation call, released exactly once.
pub struct ActiveSession {
    host: String,
    session: Box<dyn RemoteSession>,
    released: bool,
}

impl ActiveSession {
    pub fn new(host: impl Into<String>, session: Box<dyn RemoteSession>) -> Self {
        Self {
            host: host.into(),
            session,
            released: false,
        }
    }

    /// Host name the session is connected to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Run a command on the session.
    pub fn execute(&mut self, command: &str) -> Result<(i32, String)> {
        self.session.execute(command)
    }

    /// Disconnect the session. Later calls do nothing.
    pub fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        tracing::debug!("Disconnecting ssh session to {}", self.host);
        self.session.disconnect()
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            tracing::warn!("Failed to disconnect from {}: {}", self.host, e);
        }
    }
}

/// How commands reach the target host for one validation call.
pub enum Connection {
    /// Run commands on this machine.
    Local,
    /// Run commands on this machine wrapped as `ssh <host> <cmd>`.
    Passwordless { host: String },
    /// Run commands through an explicit credentialed session.
    Session(ActiveSession),
}

impl Connection {
    /// Whether commands must be prefixed with `ssh <host>`.
    pub fn is_passwordless(&self) -> bool {
        matches!(self, Connection::Passwordless { .. })
    }

    /// Wrap `command` for this connection mode.
    ///
    /// Only passwordless connections are wrapped; sessions execute the
    /// command as given.
    pub fn wrap_command(&self, command: &str) -> String {
        match self {
            Connection::Passwordless { host } => format!("ssh {} {}", host, command),
            _ => command.to_string(),
        }
    }

    /// Release any session held by this connection.
    ///
    /// Disconnect failures are logged, never returned.
    pub fn close(&mut self) {
        if let Connection::Session(active) = self {
            if let Err(e) = active.release() {
                tracing::warn!("Failed to disconnect from {}: {}", active.host(), e);
            }
        }
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connection::Local => write!(f, "Local"),
            Connection::Passwordless { host } => {
                f.debug_struct("Passwordless").field("host", host).finish()
            }
            Connection::Session(active) => f
                .debug_struct("Session")
                .field("host", &active.host)
                .field("released", &active.released)
                .finish(),
        }
    }
}

/// Target for `ssh <target> <cmd>`. Credentials in a descriptor are dropped
/// and a non-default port becomes `-p <port>`.
fn ssh_target(host: &str) -> String {
    match HostSpec::parse(host) {
        Ok(spec) if spec.port == 22 => spec.host,
        Ok(spec) => format!("-p {} {}", spec.port, spec.host),
        Err(_) => host.to_string(),
    }
}

/// Choose the connection mode for `host`.
///
/// `local_user` is the account the passwordless probe logs in as; when it
/// is unknown the probe is skipped and the host must carry credentials.
pub fn select_connection(
    host: Option<&str>,
    local_user: Option<&str>,
    probe: &dyn PasswordlessCheck,
    factory: &dyn SessionFactory,
) -> Result<Connection> {
    let Some(host) = host else {
        tracing::debug!("No host given, running commands locally");
        return Ok(Connection::Local);
    };

    match local_user {
        Some(user) => match probe.check(user, host) {
            Ok(()) => {
                let target = ssh_target(host);
                tracing::info!("Passwordless ssh to {} is available", target);
                return Ok(Connection::Passwordless { host: target });
            }
            Err(e) => {
                tracing::debug!("Passwordless ssh probe failed: {}", e);
            }
        },
        None => tracing::debug!("Local user unknown, skipping passwordless ssh probe"),
    }

    let spec = HostSpec::parse(host)?;
    tracing::info!("Opening ssh session to {}", spec);

    let session = factory
        .connect(&spec)
        .map_err(|e| PkgvError::ConnectionFailure {
            host: spec.host.clone(),
            message: format!("{:#}", e),
        })?;

    Ok(Connection::Session(ActiveSession::new(spec.host, session)))
}
