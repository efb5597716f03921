// SPDX-License-Identifier: MIT OR Apache-2.0
//! A deliberately tiny interpolation language for error messages.
//!
//! Templates look like `"job {{ ID }} not found"` or `"bad name {{name|q}}"`.
//! There are no conditionals, loops or function calls, and there are no
//! errors: questionable templates produce questionable (but always
//! deterministic) output.  A lookup that misses renders as the original
//! marker, and an unknown directive renders the value followed by a visible
//! `{{?!|directive}}` marker, so mistakes show up in the message itself.
//!
//! Lookups scan an ordered `[(key, value)]` table linearly.  Error details
//! are small, keep their insertion order, and never need a hash map.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use std::fmt;

/// Marker that opens an interpolation.
pub const OPEN: &str = "{{";
/// Marker that closes an interpolation.
pub const CLOSE: &str = "}}";

/// Prefix of the marker emitted after a value whose directive is unknown.
const UNKNOWN_DIRECTIVE_MARKER: &str = "{{?!|";

// ---------------------------------------------------------------------------
// Segment / Directive
// ---------------------------------------------------------------------------

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text emitted verbatim.
    Literal(String),
    /// A lookup of `name` in the details table, post-processed by `process`.
    Interpolation {
        /// Lookup key, trimmed of surrounding whitespace.
        name: String,
        /// Raw directive text after the `|`, trimmed; empty if none.
        process: String,
    },
}

impl Segment {
    /// Shorthand for a [`Segment::Literal`].
    pub fn literal(text: impl Into<String>) -> Self {
        Self::Literal(text.into())
    }

    /// Shorthand for a [`Segment::Interpolation`] without a directive.
    pub fn interp(name: impl Into<String>) -> Self {
        Self::Interpolation {
            name: name.into(),
            process: String::new(),
        }
    }

    /// Shorthand for a [`Segment::Interpolation`] with a directive.
    pub fn interp_with(name: impl Into<String>, process: impl Into<String>) -> Self {
        Self::Interpolation {
            name: name.into(),
            process: process.into(),
        }
    }
}

/// Post-processing applied to an interpolated value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    /// No directive: the value is emitted as-is.
    Plain,
    /// `q`: the value is emitted quoted and escaped.
    Quote,
    /// Anything else.  Never an error; see [`Directive::apply`].
    Unknown(&'a str),
}

impl<'a> Directive<'a> {
    /// Classify raw directive text.
    pub fn parse(process: &'a str) -> Self {
        match process {
            "" => Self::Plain,
            "q" => Self::Quote,
            other => Self::Unknown(other),
        }
    }

    /// Write `value` to `out` with this directive applied.
    pub fn apply(self, value: &str, out: &mut String) {
        match self {
            Self::Plain => out.push_str(value),
            Self::Quote => out.push_str(&quote(value)),
            Self::Unknown(process) => {
                out.push_str(value);
                out.push_str(UNKNOWN_DIRECTIVE_MARKER);
                out.push_str(process);
                out.push_str(CLOSE);
            }
        }
    }
}

/// Quote a value for embedding in a message.
///
/// The value is wrapped in double quotes.  Quotes and backslashes are
/// escaped, as are control characters: the usual short forms (`\n`, `\t`,
/// `\a`, `\v`, ...) where one exists, `\xHH` for other ASCII controls and
/// `\uHHHH` for the rest.  Every other character, combining marks included,
/// is copied as-is.
pub fn quote(value: &str) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{07}' => out.push_str("\\a"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{0B}' => out.push_str("\\v"),
            c if c.is_ascii_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split a template string into segments.
///
/// The scan is not recursive: the first `}}` after an opener ends the
/// marker, whatever else the body contains.
///
/// ```
/// use serum_template::{parse, Segment};
///
/// assert_eq!(
///     parse("a {{ b | q }} c"),
///     vec![
///         Segment::literal("a "),
///         Segment::interp_with("b", "q"),
///         Segment::literal(" c"),
///     ],
/// );
/// ```
pub fn parse(template: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = template;
    loop {
        let Some(start) = rest.find(OPEN) else {
            segments.push(Segment::Literal(rest.to_owned()));
            return segments;
        };
        let body_start = start + OPEN.len();
        let Some(end) = rest[body_start..].find(CLOSE) else {
            // Dangling opener: everything left, opener included, is literal.
            segments.push(Segment::Literal(rest.to_owned()));
            return segments;
        };
        if start > 0 {
            segments.push(Segment::Literal(rest[..start].to_owned()));
        }
        if end == 0 {
            // "{{}}" is kept as text rather than treated as a lookup.
            let marker_end = body_start + CLOSE.len();
            segments.push(Segment::Literal(rest[start..marker_end].to_owned()));
        } else {
            let body = &rest[body_start..body_start + end];
            let (name, process) = match body.split_once('|') {
                Some((name, process)) => (name.trim(), process.trim()),
                None => (body.trim(), ""),
            };
            segments.push(Segment::interp_with(name, process));
        }
        rest = &rest[body_start + end + CLOSE.len()..];
        if rest.is_empty() {
            return segments;
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render segments against an ordered table.  Never fails.
///
/// The first row whose key matches wins.  A miss renders the marker back as
/// `{{name}}`.
pub fn render<K, V>(segments: &[Segment], table: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            // A body of only whitespace parses to an empty name; it renders as nothing.
            Segment::Interpolation { name, .. } if name.is_empty() => {}
            Segment::Interpolation { name, process } => {
                match table.iter().find(|(k, _)| k.as_ref() == name) {
                    Some((_, value)) => Directive::parse(process).apply(value.as_ref(), &mut out),
                    None => {
                        out.push_str(OPEN);
                        out.push_str(name);
                        out.push_str(CLOSE);
                    }
                }
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// A parsed template, reusable against any details table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse `template` once.
    pub fn parse(template: &str) -> Self {
        Self {
            segments: parse(template),
        }
    }

    /// The parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render against `table`.  See [`render`].
    pub fn render<K, V>(&self, table: &[(K, V)]) -> String
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        render(&self.segments, table)
    }

    /// Names looked up by this template, in order of appearance.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Interpolation { name, .. } if !name.is_empty() => Some(name.as_str()),
            _ => None,
        })
    }
}

impl From<&str> for Template {
    fn from(template: &str) -> Self {
        Self::parse(template)
    }
}

impl fmt::Display for Template {
    /// Re-serialises the template in normalised form (`{{name|process}}`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => f.write_str(text)?,
                Segment::Interpolation { name, process } if process.is_empty() => {
                    write!(f, "{OPEN}{name}{CLOSE}")?
                }
                Segment::Interpolation { name, process } => {
                    write!(f, "{OPEN}{name}|{process}{CLOSE}")?
                }
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
