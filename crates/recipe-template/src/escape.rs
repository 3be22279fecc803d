//! Placeholder escaping.

/// How a substitution placeholder writes its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubstitutionMode {
    /// `{{key}}` in element content: `&`, `<` and `>` are escaped.
    Escaped,
    /// `{{{key}}}` or `{{&key}}`: written verbatim. The value must be trusted.
    Raw,
    /// `{{key}}` in an attribute-value slot: like [`Escaped`](Self::Escaped),
    /// plus both quote characters.
    Attribute,
}

impl SubstitutionMode {
    /// Append `value` to `out` using this mode's escaping rules.
    ///
    /// ```
    /// use recipe_template::SubstitutionMode;
    ///
    /// let mut out = String::new();
    /// SubstitutionMode::Attribute.write(&mut out, r#"a<"b">"#);
    /// assert_eq!(out, "a&lt;&quot;b&quot;&gt;");
    /// ```
    pub fn write(self, out: &mut String, value: &str) {
        match self {
            Self::Raw => out.push_str(value),
            Self::Escaped => escape_xml(out, value, false),
            Self::Attribute => escape_xml(out, value, true),
        }
    }
}

fn escape_xml(out: &mut String, text: &str, escape_quotes: bool) {
    out.reserve(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if escape_quotes => out.push_str("&quot;"),
            '\'' if escape_quotes => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}
