//! Recipe template expansion.
//!
//! Turns a parameterized recipe template plus a [`Context`] of pipeline run
//! parameters into the concrete, ordered recipe text handed to the recipe
//! executor.
//!
//! # Template syntax
//!
//! - `{{#key}}…{{/key}}`: rendered when `key` is truthy. When `key` is bound
//!   to a list of mappings the body is rendered once per element, with the
//!   element's entries shadowing outer keys.
//! - `{{^key}}…{{/key}}`: rendered when `key` is absent or falsy.
//! - `{{key}}`: escaped placeholder (`&`, `<`, `>`; quotes too when the
//!   template was parsed with [`parse_attribute`]).
//! - `{{{key}}}` or `{{&key}}`: raw placeholder for trusted, pre-formatted values.
//! - `{{! comment }}`: dropped.
//!
//! Keys may be dotted (`imaging.robust`) to reach into nested mappings. A
//! section, closing or comment tag alone on its line removes that line from
//! the output.
//!
//! Absent, `false`, `""` and `[]` are falsy; everything else is truthy.
//!
//! # Example
//!
//! ```
//! use recipe_template::{Context, render};
//!
//! let template = "{{#selfcal}}hif_selfcal {{/selfcal}}{{^selfcal}}skip {{/selfcal}}vis={{vis}}";
//! let context = Context::new().with("vis", "13A-398.ms");
//!
//! assert_eq!(render(template, &context).unwrap(), "skip vis=13A-398.ms");
//! ```

mod error;
mod escape;
mod expander;
mod parser;
mod scope;
mod template;
mod value;

pub use error::{ExpandError, ParseError, ParseErrorKind, TemplateError};
pub use escape::SubstitutionMode;
pub use expander::expand;
pub use parser::{parse, parse_attribute};
pub use template::{Node, Template};
pub use value::{Context, Mapping, Value};

/// Parse and expand in one step.
pub fn render(source: &str, context: &Context) -> Result<String, TemplateError> {
    let template = parse(source)?;
    Ok(expand(&template, context)?)
}
