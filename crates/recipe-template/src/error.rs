//! Error types for template parsing and expansion.

/// Malformed template: structural errors found while parsing.
///
/// Always fatal to the template. The parser never recovers, since partial
/// output would silently issue the wrong command sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed template at line {line}, column {column}: {kind}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Line of the offending tag (1-indexed).
    pub line: usize,
    /// Column of the offending tag (1-indexed, in characters).
    pub column: usize,
}

impl ParseError {
    /// Build an error positioned at byte `offset` of `source`.
    pub(crate) fn at(kind: ParseErrorKind, source: &str, offset: usize) -> Self {
        let before = &source[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Self {
            kind,
            line: before.matches('\n').count() + 1,
            column: before[line_start..].chars().count() + 1,
        }
    }
}

/// Kind of structural template error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// `{{/key}}` with no open section.
    #[error("closing tag for `{key}` has no open section")]
    UnmatchedClose { key: String },

    /// `{{/key}}` whose key differs from the innermost open section.
    #[error("closing tag for `{found}` does not match open section `{expected}`")]
    MismatchedClose { expected: String, found: String },

    /// Input ended while a section was still open.
    #[error("section `{key}` is never closed")]
    Unterminated { key: String },

    /// A tag with no key, such as `{{}}` or `{{#}}`.
    #[error("tag has an empty key")]
    EmptyKey,

    /// A tag starting with a sigil the grammar does not define.
    #[error("unrecognized tag sigil `{sigil}`")]
    UnrecognizedSigil { sigil: char },

    /// A key containing characters outside `[A-Za-z0-9_.-]`.
    #[error("invalid key `{key}`")]
    InvalidKey { key: String },

    /// An opening `{{` with no closing delimiter.
    #[error("tag is not closed (expected `{delimiter}`)")]
    UnclosedTag { delimiter: &'static str },
}

/// Semantic error found while expanding a parsed template against a context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ExpandError {
    /// A section key bound to a list whose elements are not all mappings.
    #[error("iteration over `{key}` requires a list of mappings")]
    UndefinedIterationKey { key: String },

    /// A placeholder whose key resolves to nothing.
    #[error("placeholder `{key}` is not defined")]
    UndefinedSubstitutionKey { key: String },

    /// A placeholder whose key resolves to a list or mapping.
    #[error("placeholder `{key}` does not resolve to a scalar")]
    NonScalarSubstitution { key: String },
}

/// Error from [`render`](crate::render): parse or expansion failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Expand(#[from] ExpandError),
}
