//! CLI error types.

use recipe_config::ConfigError;
use recipe_flags::FlagError;
use recipe_procedure::ProcedureError;
use recipe_template::{ExpandError, ParseError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Expand(#[from] ExpandError),

    #[error("{0}")]
    Procedure(#[from] ProcedureError),

    #[error("{0}")]
    Flags(#[from] FlagError),

    #[error("{path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}
