//! Scope chain for iteration sections.

use crate::value::{Mapping, Value};

/// An immutable linked list of mapping frames, innermost first.
///
/// Each iteration element gets a new scope whose parent is the enclosing one.
/// Scopes live on the stack of the expanding call and are dropped when the
/// element is done, so nothing set by one element is visible to the next.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope<'a> {
    frame: &'a Mapping,
    parent: Option<&'a Scope<'a>>,
}

impl<'a> Scope<'a> {
    pub(crate) fn root(frame: &'a Mapping) -> Self {
        Self {
            frame,
            parent: None,
        }
    }

    /// A child scope with `frame` shadowing this one.
    pub(crate) fn push<'b>(&'b self, frame: &'b Mapping) -> Scope<'b>
    where
        'a: 'b,
    {
        Scope {
            frame,
            parent: Some(self),
        }
    }

    /// Resolve a possibly dotted key.
    ///
    /// The first segment is looked up innermost-first through the chain; the
    /// remaining segments descend into nested mappings from wherever the first
    /// one was found, without falling back to outer frames.
    pub(crate) fn resolve(&self, key: &str) -> Option<&'a Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;

        let mut value = self.lookup(first)?;
        for segment in segments {
            value = value.as_map()?.get(segment)?;
        }
        Some(value)
    }

    fn lookup(&self, name: &str) -> Option<&'a Value> {
        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(value) = current.frame.get(name) {
                return Some(value);
            }
            scope = current.parent;
        }
        None
    }
}
