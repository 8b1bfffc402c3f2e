//! Reaching remote hosts over ssh.
//!
//! # Modules
//!
//! - [`connection`] - Connection mode selection and session ownership
//! - [`host`] - `user:password@host:port` descriptors
//! - [`options`] - ssh client options
//! - [`passwordless`] - Key-based ssh probe
//! - [`session`] - Credentialed ssh sessions

pub mod connection;
pub mod host;
pub mod options;
pub mod passwordless;
pub mod session;

pub use connection::{select_connection, ActiveSession, Connection};
pub use host::{display_host, HostSpec};
pub use options::{HostKeyPolicy, SshOptions};
pub use passwordless::{PasswordlessCheck, SshPasswordlessCheck};
pub use session::{RemoteSession, SessionFactory, SshSession, SshSessionFactory};
