//! `pkgv completions` command implementation.

use std::io::Write;

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Writes a completion script for the requested shell to stdout.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    /// Create a new completions command.
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    /// Render the completion script into `out`.
    pub fn render(&self, out: &mut dyn Write) {
        let mut cmd = Cli::command();
        clap_complete::generate(self.args.shell, &mut cmd, "pkgv", out);
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, _ui: &mut dyn UserInterface) -> Result<CommandResult> {
        self.render(&mut std::io::stdout());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap_complete::Shell;

    fn render(shell: Shell) -> String {
        let mut buf = Vec::new();
        CompletionsCommand::new(CompletionsArgs { shell }).render(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn bash_completions_list_subcommands() {
        let output = render(Shell::Bash);
        assert!(output.contains("pkgv"));
        assert!(output.contains("pip3s"));
        assert!(output.contains("complete"));
    }

    #[test]
    fn zsh_completions_name_the_binary() {
        assert!(render(Shell::Zsh).contains("#compdef pkgv"));
    }
}
