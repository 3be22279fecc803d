//! `recipe commands` command implementation.

use std::io::Write;

use clap::Args;
use recipe_procedure::{Command, Procedure};

use super::recipe::RecipeArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the commands command.
#[derive(Args)]
pub(crate) struct CommandsArgs {
    #[command(flatten)]
    recipe: RecipeArgs,
}

impl CommandsArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.recipe.load_config(None)?;
        let expanded = self.recipe.expand(&config)?;
        let procedure = Procedure::parse(&expanded)?;

        if let Some(title) = &procedure.title {
            output.highlight(title);
        }
        let mut stdout = std::io::stdout().lock();
        for (i, command) in procedure.commands.iter().enumerate() {
            writeln!(stdout, "{}", format_command(i + 1, command))?;
        }
        output.info(&format!("{} commands", procedure.commands.len()));

        Ok(())
    }
}

/// One listing line: position, task name, then `keyword=value` pairs.
fn format_command(position: usize, command: &Command) -> String {
    let mut line = format!("{position:>3}. {}", command.name);
    for (keyword, value) in &command.parameters {
        line.push(' ');
        line.push_str(keyword);
        line.push('=');
        line.push_str(value);
    }
    line
}
