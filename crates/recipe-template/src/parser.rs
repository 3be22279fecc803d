//! Template markup parsing.
//!
//! Recognizes `{{#key}}`, `{{^key}}`, `{{/key}}`, `{{{key}}}`, `{{&key}}`,
//! `{{key}}` and `{{! comment }}` tags in a single left-to-right scan with an
//! explicit stack of open sections.

use crate::SubstitutionMode;
use crate::error::{ParseError, ParseErrorKind};
use crate::template::{Node, Template};

/// Parse template text.
///
/// `{{key}}` placeholders are recorded with [`SubstitutionMode::Escaped`].
///
/// # Example
///
/// ```
/// use recipe_template::{Node, parse};
///
/// let template = parse("{{#cube_image}}<Command>hif_makeimages</Command>{{/cube_image}}").unwrap();
/// assert!(matches!(&template.nodes()[0], Node::Conditional { key, .. } if key == "cube_image"));
///
/// assert!(parse("{{/cube_image}}").is_err());
/// ```
pub fn parse(source: &str) -> Result<Template, ParseError> {
    Parser::new(source, SubstitutionMode::Escaped).run()
}

/// Parse template text destined for an attribute-value slot.
///
/// `{{key}}` placeholders are recorded with [`SubstitutionMode::Attribute`],
/// so quote characters in values are escaped. Raw placeholders stay raw.
pub fn parse_attribute(source: &str) -> Result<Template, ParseError> {
    Parser::new(source, SubstitutionMode::Attribute).run()
}

/// One tag, as recognized at a `{{` position.
#[derive(Debug, PartialEq, Eq)]
enum Tag<'s> {
    Open { kind: SectionKind, key: &'s str },
    Close { key: &'s str },
    Substitution { key: &'s str, raw: bool },
    Comment,
}

impl Tag<'_> {
    /// Section, close and comment tags swallow their line when alone on it.
    fn may_stand_alone(&self) -> bool {
        !matches!(self, Self::Substitution { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    Conditional,
    Negated,
}

/// An open section awaiting its closing tag.
struct Frame {
    kind: SectionKind,
    key: String,
    /// Byte offset of the opening tag, for error positions.
    offset: usize,
    nodes: Vec<Node>,
}

struct Parser<'s> {
    source: &'s str,
    default_mode: SubstitutionMode,
    root: Vec<Node>,
    stack: Vec<Frame>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s str, default_mode: SubstitutionMode) -> Self {
        Self {
            source,
            default_mode,
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Template, ParseError> {
        let source = self.source;
        let mut cursor = 0;

        while let Some(found) = source[cursor..].find("{{") {
            let open = cursor + found;
            let (tag, end) = scan_tag(source, open)?;

            let (text_end, next) = if tag.may_stand_alone() {
                standalone_span(source, open, end)
                    .map_or((open, end), |(start, after)| (start.max(cursor), after))
            } else {
                (open, end)
            };

            self.push_text(&source[cursor..text_end]);
            self.apply(tag, open)?;
            cursor = next;
        }
        self.push_text(&source[cursor..]);

        if let Some(frame) = self.stack.last() {
            return Err(ParseError::at(
                ParseErrorKind::Unterminated {
                    key: frame.key.clone(),
                },
                source,
                frame.offset,
            ));
        }

        let template = Template::from_nodes(self.root);
        tracing::debug!(nodes = template.len(), "Parsed recipe template");
        Ok(template)
    }

    /// Children of the innermost open section, or the root.
    fn current(&mut self) -> &mut Vec<Node> {
        match self.stack.last_mut() {
            Some(frame) => &mut frame.nodes,
            None => &mut self.root,
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let nodes = self.current();
        // Comments and stripped lines can leave adjacent runs
        if let Some(Node::Text(previous)) = nodes.last_mut() {
            previous.push_str(text);
        } else {
            nodes.push(Node::Text(text.to_owned()));
        }
    }

    fn apply(&mut self, tag: Tag<'_>, offset: usize) -> Result<(), ParseError> {
        match tag {
            Tag::Open { kind, key } => self.stack.push(Frame {
                kind,
                key: key.to_owned(),
                offset,
                nodes: Vec::new(),
            }),
            Tag::Close { key } => {
                let Some(frame) = self.stack.pop() else {
                    return Err(ParseError::at(
                        ParseErrorKind::UnmatchedClose {
                            key: key.to_owned(),
                        },
                        self.source,
                        offset,
                    ));
                };
                if frame.key != key {
                    return Err(ParseError::at(
                        ParseErrorKind::MismatchedClose {
                            expected: frame.key,
                            found: key.to_owned(),
                        },
                        self.source,
                        offset,
                    ));
                }

                let body = Template::from_nodes(frame.nodes);
                let node = match frame.kind {
                    SectionKind::Conditional => Node::Conditional {
                        key: frame.key,
                        body,
                    },
                    SectionKind::Negated => Node::NegatedConditional {
                        key: frame.key,
                        body,
                    },
                };
                self.current().push(node);
            }
            Tag::Substitution { key, raw } => {
                let mode = if raw {
                    SubstitutionMode::Raw
                } else {
                    self.default_mode
                };
                self.current().push(Node::Substitution {
                    key: key.to_owned(),
                    mode,
                });
            }
            Tag::Comment => {}
        }
        Ok(())
    }
}

/// Recognize the tag starting at `open` (which points at `{{`).
///
/// Returns the tag and the byte offset just past its closing delimiter.
fn scan_tag(source: &str, open: usize) -> Result<(Tag<'_>, usize), ParseError> {
    let inner = open + 2;

    if source[inner..].starts_with('{') {
        let body_start = inner + 1;
        let len = source[body_start..].find("}}}").ok_or_else(|| {
            ParseError::at(
                ParseErrorKind::UnclosedTag { delimiter: "}}}" },
                source,
                open,
            )
        })?;
        let key = validate_key(&source[body_start..body_start + len], source, open)?;
        return Ok((Tag::Substitution { key, raw: true }, body_start + len + 3));
    }

    let len = source[inner..].find("}}").ok_or_else(|| {
        ParseError::at(
            ParseErrorKind::UnclosedTag { delimiter: "}}" },
            source,
            open,
        )
    })?;
    let body = source[inner..inner + len].trim();
    let end = inner + len + 2;

    let tag = match body.chars().next() {
        None => return Err(ParseError::at(ParseErrorKind::EmptyKey, source, open)),
        Some('#') => Tag::Open {
            kind: SectionKind::Conditional,
            key: validate_key(&body[1..], source, open)?,
        },
        Some('^') => Tag::Open {
            kind: SectionKind::Negated,
            key: validate_key(&body[1..], source, open)?,
        },
        Some('/') => Tag::Close {
            key: validate_key(&body[1..], source, open)?,
        },
        Some('&') => Tag::Substitution {
            key: validate_key(&body[1..], source, open)?,
            raw: true,
        },
        Some('!') => Tag::Comment,
        Some(c) if is_key_char(c) => Tag::Substitution {
            key: validate_key(body, source, open)?,
            raw: false,
        },
        Some(sigil) => {
            return Err(ParseError::at(
                ParseErrorKind::UnrecognizedSigil { sigil },
                source,
                open,
            ));
        }
    };

    Ok((tag, end))
}

/// Trim and check a key: dot-separated, non-empty segments of `[A-Za-z0-9_-]`.
fn validate_key<'s>(raw: &'s str, source: &str, open: usize) -> Result<&'s str, ParseError> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(ParseError::at(ParseErrorKind::EmptyKey, source, open));
    }
    let valid = key
        .split('.')
        .all(|segment| !segment.is_empty() && segment.chars().all(is_key_char));
    if !valid {
        return Err(ParseError::at(
            ParseErrorKind::InvalidKey {
                key: key.to_owned(),
            },
            source,
            open,
        ));
    }
    Ok(key)
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// If the tag spanning `open..end` is the only non-blank content of its line,
/// return the span of the whole line including its newline.
fn standalone_span(source: &str, open: usize, end: usize) -> Option<(usize, usize)> {
    let line_start = source[..open].rfind('\n').map_or(0, |i| i + 1);
    if !is_blank(&source[line_start..open]) {
        return None;
    }

    let rest = &source[end..];
    let (trailing, next) = match rest.find('\n') {
        Some(nl) => (&rest[..nl], end + nl + 1),
        None => (rest, source.len()),
    };
    let trailing = trailing.strip_suffix('\r').unwrap_or(trailing);

    is_blank(trailing).then_some((line_start, next))
}

fn is_blank(s: &str) -> bool {
    s.chars().all(|c| c == ' ' || c == '\t')
}
