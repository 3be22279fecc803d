//! Configuration management for recipe expansion.
//!
//! Parses `recipe.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [recipe]
//! template = "recipes/cube.xml"
//! output = "procedure.xml"
//! attribute_slot = false
//!
//! [context]
//! importonly = false
//! field_list = "${FIELDS:-0,1}"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `recipe.template`
//! - `recipe.output`
//! - every string under `[context]`, at any depth

mod expand;

use recipe_template::{Context, Mapping};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override template path.
    pub template: Option<PathBuf>,
    /// Override output path.
    pub output: Option<PathBuf>,
    /// Override attribute-slot escaping.
    pub attribute_slot: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "recipe.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Recipe section (paths are relative strings from TOML).
    recipe: RecipeConfigRaw,
    /// Root context values.
    context: Mapping,

    /// Resolved recipe configuration (set after loading).
    #[serde(skip)]
    pub recipe_resolved: RecipeConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Raw `[recipe]` section as written in TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RecipeConfigRaw {
    template: Option<String>,
    output: Option<String>,
    attribute_slot: bool,
}

/// Resolved recipe configuration with absolute paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeConfig {
    /// Template file to expand.
    pub template: Option<PathBuf>,
    /// File the expanded procedure is written to. Stdout when unset.
    pub output: Option<PathBuf>,
    /// Escape quotes in placeholders, for templates whose values land in
    /// XML attributes.
    pub attribute_slot: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`context.cube_list[0].field`").
        field: String,
        /// Error message (e.g., "${`FIELDS`} not set").
        message: String,
    },
}

/// Require an optional string field to be non-empty when present.
fn require_non_empty(value: Option<&str>, field: &str) -> Result<(), ConfigError> {
    if value.is_some_and(str::is_empty) {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `recipe.toml` in current directory and parents.
    /// Without a config file the result is empty and relies on CLI settings.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or an environment variable reference cannot be expanded.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = match config_path {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Some(path.to_path_buf())
            }
            None => std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd)),
        };

        let mut config = match discovered {
            Some(path) => Self::load_from_file(&path)?,
            None => {
                tracing::debug!("No {CONFIG_FILENAME} found, using defaults");
                Self::default()
            }
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Root context declared under `[context]`.
    #[must_use]
    pub fn context(&self) -> Context {
        Context::from(self.context.clone())
    }

    /// Get the template path.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if neither the config file nor the
    /// CLI provided one.
    pub fn require_template(&self) -> Result<&Path, ConfigError> {
        self.recipe_resolved.template.as_deref().ok_or_else(|| {
            ConfigError::Validation(
                "recipe.template must be set in config or on the command line".into(),
            )
        })
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(template) = &settings.template {
            self.recipe_resolved.template = Some(template.clone());
        }
        if let Some(output) = &settings.output {
            self.recipe_resolved.output = Some(output.clone());
        }
        if let Some(attribute_slot) = settings.attribute_slot {
            self.recipe_resolved.attribute_slot = attribute_slot;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;
        config.validate()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        tracing::debug!(
            path = %path.display(),
            context_keys = config.context.len(),
            "Loaded recipe configuration"
        );

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a path field is present but empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(self.recipe.template.as_deref(), "recipe.template")?;
        require_non_empty(self.recipe.output.as_deref(), "recipe.output")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref template) = self.recipe.template {
            self.recipe.template = Some(expand::expand_env(template, "recipe.template")?);
        }
        if let Some(ref output) = self.recipe.output {
            self.recipe.output = Some(expand::expand_env(output, "recipe.output")?);
        }
        expand::expand_mapping(&mut self.context, "context")
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.recipe_resolved = RecipeConfig {
            template: self.recipe.template.as_deref().map(|t| config_dir.join(t)),
            output: self.recipe.output.as_deref().map(|o| config_dir.join(o)),
            attribute_slot: self.recipe.attribute_slot,
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use recipe_template::Value;

    use super::*;

    const CUBE_CONFIG: &str = r#"
[recipe]
template = "recipes/cube.xml"
output = "procedure.xml"

[context]
importonly = false
cube_image = true

[[context.cube_list]]
field = "3C286"
spw = "2"
nchan = 128
"#;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILENAME);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.recipe_resolved, RecipeConfig::default());
        assert!(config.context().is_empty());
        assert!(config.require_template().is_err());
    }

    #[test]
    fn test_parse_context() {
        let config: Config = toml::from_str(CUBE_CONFIG).unwrap();
        let context = config.context();

        assert_eq!(context.get("importonly"), Some(&Value::Bool(false)));
        let Some(Value::List(cubes)) = context.get("cube_list") else {
            panic!("cube_list should be a list");
        };
        let cube = cubes[0].as_map().unwrap();
        assert_eq!(cube.get("field"), Some(&Value::from("3C286")));
        assert_eq!(cube.get("nchan"), Some(&Value::Int(128)));
    }

    #[test]
    fn test_load_resolves_paths_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), CUBE_CONFIG);

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(
            config.recipe_resolved.template,
            Some(dir.path().join("recipes/cube.xml"))
        );
        assert_eq!(
            config.recipe_resolved.output,
            Some(dir.path().join("procedure.xml"))
        );
        assert!(!config.recipe_resolved.attribute_slot);
        assert_eq!(config.config_path, Some(path));
        assert_eq!(
            config.require_template().unwrap(),
            dir.path().join("recipes/cube.xml")
        );
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[recipe\ntemplate = ");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_empty_template_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[recipe]\ntemplate = \"\"\n");
        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("recipe.template"));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), CUBE_CONFIG);
        let nested = dir.path().join("work/run1");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(Config::discover_config(&nested), Some(path));
    }

    #[test]
    fn test_discover_config_nearest_wins() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), CUBE_CONFIG);
        let nested = dir.path().join("session");
        std::fs::create_dir_all(&nested).unwrap();
        let nearest = write_config(&nested, "");

        assert_eq!(Config::discover_config(&nested), Some(nearest));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config: Config = toml::from_str(CUBE_CONFIG).unwrap();
        config.resolve_paths(Path::new("/project"));

        config.apply_cli_settings(&CliSettings {
            template: Some(PathBuf::from("other.xml")),
            output: None,
            attribute_slot: Some(true),
        });

        assert_eq!(
            config.recipe_resolved,
            RecipeConfig {
                template: Some(PathBuf::from("other.xml")),
                output: Some(PathBuf::from("/project/procedure.xml")),
                attribute_slot: true,
            }
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config: Config = toml::from_str(CUBE_CONFIG).unwrap();
        config.resolve_paths(Path::new("/project"));
        let before = config.recipe_resolved.clone();

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.recipe_resolved, before);
    }

    #[test]
    fn test_expand_env_vars_in_context_and_paths() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("RECIPE_TEST_FIELDS", "0,1,2");
            std::env::set_var("RECIPE_TEST_RECIPES", "/srv/recipes");
        }

        let toml = r#"
[recipe]
template = "${RECIPE_TEST_RECIPES}/cont.xml"

[context]
field_list = "${RECIPE_TEST_FIELDS}"
robust = "${RECIPE_TEST_ROBUST:-0.5}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.recipe_resolved.template,
            Some(PathBuf::from("/srv/recipes/cont.xml"))
        );
        let context = config.context();
        assert_eq!(context.get("field_list"), Some(&Value::from("0,1,2")));
        assert_eq!(context.get("robust"), Some(&Value::from("0.5")));

        unsafe {
            std::env::remove_var("RECIPE_TEST_FIELDS");
            std::env::remove_var("RECIPE_TEST_RECIPES");
        }
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("RECIPE_TEST_MISSING");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[context]\nvis = \"${RECIPE_TEST_MISSING}\"\n",
        );

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("context.vis"));
    }
}
