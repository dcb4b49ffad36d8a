//! Shell completions generation.
//!
//! The `ciao-contrib completions` command generates shell completion scripts.

use crate::cli::args::{Cli, CompletionsArgs};
use crate::ui::UserInterface;
use clap::CommandFactory;

use super::dispatcher::{Command, CommandResult};

const BIN_NAME: &str = "ciao-contrib";

/// The completions command implementation.
pub struct CompletionsCommand {
    args: CompletionsArgs,
}

impl CompletionsCommand {
    pub fn new(args: CompletionsArgs) -> Self {
        Self { args }
    }

    fn render(&self) -> String {
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        clap_complete::generate(self.args.shell, &mut cmd, BIN_NAME, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl Command for CompletionsCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> crate::error::Result<CommandResult> {
        ui.print(self.render().trim_end());
        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use clap_complete::Shell;

    #[test]
    fn generates_bash_completions() {
        let cmd = CompletionsCommand::new(CompletionsArgs { shell: Shell::Bash });
        let output = cmd.render();
        assert!(output.contains("ciao-contrib"));
        assert!(output.contains("complete"));
        assert!(output.contains("diagresp"));
    }

    #[test]
    fn generates_zsh_completions() {
        let cmd = CompletionsCommand::new(CompletionsArgs { shell: Shell::Zsh });
        assert!(cmd.render().contains("ciao-contrib"));
    }

    #[test]
    fn prints_through_ui() {
        let cmd = CompletionsCommand::new(CompletionsArgs { shell: Shell::Fish });
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();
        assert!(result.success);
        assert!(ui.printed()[0].contains("versions"));
    }
}
