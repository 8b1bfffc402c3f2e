//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// pkgv - Validate installed RPM and pip3 packages on local or remote hosts.
#[derive(Debug, Parser)]
#[command(name = "pkgv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show per-package detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check that RPM packages are installed
    Rpms(PackageArgs),

    /// Check that pip3 packages are installed
    Pip3s(PackageArgs),

    /// Run every check in a manifest
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `rpms` and `pip3s` commands.
#[derive(Debug, Clone, clap::Args)]
pub struct PackageArgs {
    /// Target host: user:password@host:port, or a host reachable with passwordless ssh
    #[arg(long, env = "PKGV_HOST", value_name = "HOST")]
    pub host: Option<String>,

    /// Packages to check, as NAME or NAME=VERSION
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Path to the manifest (default: ./pkgv.yml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print a JSON summary
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
