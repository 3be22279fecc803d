//! Parsed template tree.

use std::str::FromStr;

use crate::SubstitutionMode;
use crate::error::ParseError;

/// A parsed template: an ordered sequence of text runs and directives.
///
/// Parsing happens once; the same template can be expanded against any
/// number of contexts, concurrently if needed.
///
/// # Example
///
/// ```
/// use recipe_template::{Context, Template};
///
/// let template: Template = "{{#selfcal}}hif_selfcal{{/selfcal}}".parse().unwrap();
/// let output = template.expand(&Context::new().with("selfcal", true)).unwrap();
/// assert_eq!(output, "hif_selfcal");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

/// A node in the template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Literal text, emitted verbatim.
    Text(String),
    /// `{{#key}}…{{/key}}`: rendered when `key` is truthy, or once per
    /// element when `key` is bound to a list.
    Conditional { key: String, body: Template },
    /// `{{^key}}…{{/key}}`: rendered when `key` is absent or falsy.
    NegatedConditional { key: String, body: Template },
    /// A value placeholder.
    Substitution { key: String, mode: SubstitutionMode },
}

impl Template {
    pub(crate) fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Top-level nodes in document order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Keys referenced anywhere in the template, in first-use order,
    /// without duplicates.
    ///
    /// ```
    /// let template = recipe_template::parse("{{#a}}{{b}}{{/a}}{{^a}}{{c}}{{/a}}").unwrap();
    /// assert_eq!(template.keys(), ["a", "b", "c"]);
    /// ```
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        collect_keys(&self.nodes, &mut keys);
        keys
    }
}

fn collect_keys<'a>(nodes: &'a [Node], keys: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Conditional { key, body } | Node::NegatedConditional { key, body } => {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
                collect_keys(&body.nodes, keys);
            }
            Node::Substitution { key, .. } => {
                if !keys.contains(&key.as_str()) {
                    keys.push(key);
                }
            }
        }
    }
}

impl FromStr for Template {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse(s)
    }
}
