//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use recipe_template::{Mapping, Value};

use crate::ConfigError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, LookupError> {
        match std::env::var(var) {
            Ok(val) => Ok(Some(val)),
            Err(_) => Err(LookupError {
                var_name: var.to_owned(),
            }),
        }
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{0}}} not set", e.cause.var_name),
    })
}

/// Expand every string inside a context mapping, in place.
///
/// `prefix` names the mapping in error messages, e.g. `context`.
pub(crate) fn expand_mapping(mapping: &mut Mapping, prefix: &str) -> Result<(), ConfigError> {
    for (key, value) in mapping.iter_mut() {
        expand_value(value, &format!("{prefix}.{key}"))?;
    }
    Ok(())
}

fn expand_value(value: &mut Value, field: &str) -> Result<(), ConfigError> {
    match value {
        Value::String(s) => *s = expand_env(s, field)?,
        Value::List(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                expand_value(item, &format!("{field}[{i}]"))?;
            }
        }
        Value::Map(mapping) => expand_mapping(mapping, field)?,
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => {}
    }
    Ok(())
}

/// Error returned when environment variable lookup fails.
struct LookupError {
    var_name: String,
}
