//! pkgv CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use pkgv::cli::commands::describe_error;
use pkgv::cli::{Cli, CommandDispatcher, Commands};
use pkgv::ui::{create_ui, OutputMode};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is WARN
///
/// Logs go to stderr so listings and `--json` output stay clean.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("pkgv=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pkgv=warn"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Rpms(_) => "rpms",
        Commands::Pip3s(_) => "pip3s",
        Commands::Check(_) => "check",
        Commands::Completions(_) => "completions",
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    tracing::debug!("pkgv starting: {}", command_name(&cli.command));

    let output_mode = OutputMode::from_flags(cli.verbose, cli.quiet);

    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let working_dir = std::env::current_dir().unwrap_or_default();
    let mut ui = create_ui(output_mode);
    let dispatcher = CommandDispatcher::new(working_dir);

    match dispatcher.dispatch(&cli, ui.as_mut()) {
        Ok(result) => ExitCode::from(result.exit_code as u8),
        Err(e) => {
            ui.error(&format!("Error: {}", describe_error(&e)));
            ExitCode::from(1)
        }
    }
}
