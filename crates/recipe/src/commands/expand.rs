//! `recipe expand` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use super::recipe::RecipeArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the expand command.
#[derive(Args)]
pub(crate) struct ExpandArgs {
    #[command(flatten)]
    recipe: RecipeArgs,

    /// Output file for the expanded procedure (default: stdout, overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ExpandArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.recipe.load_config(self.output.clone())?;
        let expanded = self.recipe.expand(&config)?;

        match &config.recipe_resolved.output {
            Some(path) => {
                std::fs::write(path, &expanded)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => std::io::stdout().lock().write_all(expanded.as_bytes())?,
        }

        Ok(())
    }
}
