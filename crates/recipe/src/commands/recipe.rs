//! Template and context inputs shared by `expand` and `commands`.

use std::path::{Path, PathBuf};

use clap::Args;
use recipe_config::{CliSettings, Config};
use recipe_template::{Context, Template};

use crate::error::CliError;

/// Where the template and its context come from.
#[derive(Args)]
pub(crate) struct RecipeArgs {
    /// Recipe template file (overrides config).
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// JSON file with context values, merged over the config `[context]`.
    #[arg(long)]
    context: Option<PathBuf>,

    /// Escape quotes in placeholders, for values inside XML attributes.
    #[arg(long)]
    attribute: bool,

    /// Path to configuration file (default: auto-discover recipe.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RecipeArgs {
    /// Load configuration, applying these arguments as overrides.
    pub(crate) fn load_config(&self, output: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            template: self.template.clone(),
            output,
            attribute_slot: self.attribute.then_some(true),
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Parse the template and assemble the context, then expand.
    pub(crate) fn expand(&self, config: &Config) -> Result<String, CliError> {
        let template_path = config.require_template()?;
        let template = read_template(template_path, config.recipe_resolved.attribute_slot)?;

        let mut context = config.context();
        if let Some(path) = &self.context {
            context.merge(read_context(path)?);
        }

        tracing::info!(
            template = %template_path.display(),
            keys = template.keys().len(),
            "Expanding recipe"
        );
        Ok(template.expand(&context)?)
    }
}

fn read_template(path: &Path, attribute_slot: bool) -> Result<Template, CliError> {
    let source = std::fs::read_to_string(path)?;
    let template = if attribute_slot {
        recipe_template::parse_attribute(&source)
    } else {
        recipe_template::parse(&source)
    };
    Ok(template?)
}

fn read_context(path: &Path) -> Result<Context, CliError> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| CliError::Json {
        path: path.display().to_string(),
        source,
    })
}
