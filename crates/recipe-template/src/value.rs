//! Context values.
//!
//! A [`Context`] is the root mapping of named pipeline parameters a template
//! is expanded against. Values are scalars, nested mappings, or lists; lists
//! of mappings drive iteration sections.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Mapping from key to value, used for the root context and iteration elements.
pub type Mapping = BTreeMap<String, Value>;

/// A single context value.
///
/// With the `serde` feature enabled, values deserialize untagged from any
/// self-describing format, so a JSON or TOML document maps onto a context
/// without an intermediate representation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Mapping),
}

impl Value {
    /// Section truthiness.
    ///
    /// `false`, the empty string and the empty list are falsy. Everything else,
    /// including numeric zero and an empty mapping, is truthy. Absence is
    /// handled by the caller and is always falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
            Self::List(items) => !items.is_empty(),
            Self::Int(_) | Self::Float(_) | Self::Map(_) => true,
        }
    }

    /// String form of a scalar value, or `None` for lists and mappings.
    ///
    /// ```
    /// use recipe_template::Value;
    ///
    /// assert_eq!(Value::from(true).to_scalar_string().unwrap(), "True");
    /// assert_eq!(Value::from(2.0).to_scalar_string().unwrap(), "2.0");
    /// assert_eq!(Value::from("3C286").to_scalar_string().unwrap(), "3C286");
    /// assert!(Value::List(vec![]).to_scalar_string().is_none());
    /// ```
    #[must_use]
    pub fn to_scalar_string(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Bool(true) => Some(Cow::Borrowed("True")),
            Self::Bool(false) => Some(Cow::Borrowed("False")),
            Self::Int(i) => Some(Cow::Owned(i.to_string())),
            Self::Float(f) => Some(Cow::Owned(format_float(*f))),
            Self::String(s) => Some(Cow::Borrowed(s)),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    /// Borrow the mapping if this value is one.
    #[must_use]
    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Integral floats keep one fractional digit so `2.0` never renders as `2`.
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Self::Map(map)
    }
}

impl From<Context> for Value {
    fn from(context: Context) -> Self {
        Self::Map(context.root)
    }
}

/// Root expansion context.
///
/// Built once by the caller and never mutated during expansion. Iteration
/// sections layer their elements on top of it without touching it.
///
/// # Example
///
/// ```
/// use recipe_template::{Context, Value};
///
/// let cube = Context::new().with("field", "3C286").with("spw", "2");
/// let context = Context::new()
///     .with("cube_image", true)
///     .with("cube_list", vec![Value::from(cube)]);
///
/// assert!(context.get("cube_image").is_some_and(Value::is_truthy));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Context {
    root: Mapping,
}

impl Context {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace a parameter, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.root.insert(key.into(), value.into())
    }

    /// Look up a top-level parameter.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Merge `other` into this context. Keys from `other` win.
    pub fn merge(&mut self, other: Context) {
        self.root.extend(other.root);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// The root mapping.
    #[must_use]
    pub fn as_map(&self) -> &Mapping {
        &self.root
    }
}

impl From<Mapping> for Context {
    fn from(root: Mapping) -> Self {
        Self { root }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            root: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());

        assert!(Value::from(true).is_truthy());
        assert!(Value::from("false").is_truthy());
        assert!(Value::from(0).is_truthy());
        assert!(Value::from(0.0).is_truthy());
        assert!(Value::Map(Mapping::new()).is_truthy());
        assert!(Value::List(vec![Value::from(1)]).is_truthy());
    }

    #[test]
    fn test_scalar_strings() {
        assert_eq!(Value::from(42).to_scalar_string().unwrap(), "42");
        assert_eq!(Value::from(-7).to_scalar_string().unwrap(), "-7");
        assert_eq!(Value::from(1.5).to_scalar_string().unwrap(), "1.5");
        assert_eq!(Value::from(230.0).to_scalar_string().unwrap(), "230.0");
        assert_eq!(Value::from(false).to_scalar_string().unwrap(), "False");
        assert!(Value::Map(Mapping::new()).to_scalar_string().is_none());
    }

    #[test]
    fn test_large_float_uses_display() {
        assert_eq!(format_float(1e20), "100000000000000000000");
        assert_eq!(format_float(f64::NAN), "NaN");
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Context::new().with("selfcal", false).with("field_list", "0");
        let overrides = Context::new().with("selfcal", true);
        base.merge(overrides);

        assert_eq!(base.get("selfcal"), Some(&Value::Bool(true)));
        assert_eq!(base.get("field_list"), Some(&Value::from("0")));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_from_iter() {
        let context: Context = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(context.get("b"), Some(&Value::Int(2)));
        assert!(!context.is_empty());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_json_context() {
        let json = r#"{
            "importonly": false,
            "nchan": 128,
            "width": 0.5,
            "cube_list": [{"field": "3C286", "spw": "2"}]
        }"#;
        let context: Context = serde_json::from_str(json).unwrap();

        assert_eq!(context.get("importonly"), Some(&Value::Bool(false)));
        assert_eq!(context.get("nchan"), Some(&Value::Int(128)));
        assert_eq!(context.get("width"), Some(&Value::Float(0.5)));
        let Some(Value::List(cubes)) = context.get("cube_list") else {
            panic!("expected list");
        };
        assert_eq!(
            cubes[0].as_map().and_then(|m| m.get("field")),
            Some(&Value::from("3C286"))
        );
    }
}
