//! Template expansion.
//!
//! Walks the parsed tree against a [`Context`], resolving `#` sections to
//! either a truthiness test or an iteration depending on the bound value.

use crate::error::ExpandError;
use crate::scope::Scope;
use crate::template::{Node, Template};
use crate::value::{Context, Mapping, Value};

/// Expand a parsed template against a context.
///
/// Missing keys in sections are falsy. Missing placeholder keys are errors.
///
/// # Example
///
/// ```
/// use recipe_template::{Context, Value, expand, parse};
///
/// let template = parse("{{#cube_list}}[{{field}}:{{spw}}]{{/cube_list}}").unwrap();
/// let cubes = vec![
///     Value::from(Context::new().with("field", "3C286").with("spw", "2")),
///     Value::from(Context::new().with("field", "J1331").with("spw", "3")),
/// ];
/// let context = Context::new().with("cube_list", cubes);
///
/// assert_eq!(expand(&template, &context).unwrap(), "[3C286:2][J1331:3]");
/// ```
pub fn expand(template: &Template, context: &Context) -> Result<String, ExpandError> {
    let mut out = String::new();
    expand_nodes(template.nodes(), Scope::root(context.as_map()), &mut out)?;
    Ok(out)
}

impl Template {
    /// Expand this template against a context. See [`expand`].
    pub fn expand(&self, context: &Context) -> Result<String, ExpandError> {
        expand(self, context)
    }
}

fn expand_nodes(nodes: &[Node], scope: Scope<'_>, out: &mut String) -> Result<(), ExpandError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Conditional { key, body } => match scope.resolve(key) {
                Some(Value::List(items)) => {
                    let frames = iteration_frames(key, items)?;
                    tracing::debug!(key = %key, count = frames.len(), "Expanding iteration section");
                    for frame in frames {
                        expand_nodes(body.nodes(), scope.push(frame), out)?;
                    }
                }
                value => {
                    if value.is_some_and(Value::is_truthy) {
                        expand_nodes(body.nodes(), scope, out)?;
                    }
                }
            },
            Node::NegatedConditional { key, body } => {
                if !scope.resolve(key).is_some_and(Value::is_truthy) {
                    expand_nodes(body.nodes(), scope, out)?;
                }
            }
            Node::Substitution { key, mode } => {
                let value = scope
                    .resolve(key)
                    .ok_or_else(|| ExpandError::UndefinedSubstitutionKey { key: key.clone() })?;
                let text = value
                    .to_scalar_string()
                    .ok_or_else(|| ExpandError::NonScalarSubstitution { key: key.clone() })?;
                mode.write(out, &text);
            }
        }
    }
    Ok(())
}

/// Check every element before emitting anything for the section.
fn iteration_frames<'v>(key: &str, items: &'v [Value]) -> Result<Vec<&'v Mapping>, ExpandError> {
    items
        .iter()
        .map(Value::as_map)
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| ExpandError::UndefinedIterationKey {
            key: key.to_owned(),
        })
}
