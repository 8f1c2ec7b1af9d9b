//! Fixed-pattern Turtle reading and writing.
//!
//! Only the exact one-subject shapes written by [`Person::to_turtle`](crate::Person::to_turtle)
//! and [`TransformedPerson::to_turtle`](crate::TransformedPerson::to_turtle) are understood.
//! This is not a Turtle parser: prefixes are assumed, not read, and any statement
//! that does not follow the expected layout is reported as missing.

use crate::error::ParseError;
use regex::{Captures, Regex};

/// Anything that can be written as a Turtle document.
pub trait ToTurtle {
    fn to_turtle(&self) -> String;
}

#[expect(clippy::expect_used)]
pub(crate) fn pattern(regex: &str) -> Regex {
    Regex::new(regex).expect("invalid built-in pattern")
}

/// Writes `iri` as `prefix:local` when it is in `namespace` and the local part is a plain name, else as `<iri>`.
pub(crate) fn write_iri(out: &mut String, iri: &str, prefix: &str, namespace: &str) {
    match iri.strip_prefix(namespace) {
        Some(local) if is_plain_local_name(local) => {
            out.push_str(prefix);
            out.push(':');
            out.push_str(local);
        }
        _ => {
            out.push('<');
            out.push_str(iri);
            out.push('>');
        }
    }
}

fn is_plain_local_name(local: &str) -> bool {
    !local.is_empty()
        && !local.starts_with('-')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Writes a string literal with the Turtle `ECHAR` escapes.
pub(crate) fn write_string(out: &mut String, value: &str) {
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('b') => result.push('\u{8}'),
            Some('f') => result.push('\u{c}'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

/// Regular expression matching a string literal as the object of `predicate`.
pub(crate) fn string_object(predicate: &str) -> Regex {
    pattern(&format!(
        r#"{}\s+"((?:[^"\\]|\\.)*)""#,
        regex::escape(predicate)
    ))
}

/// Regular expression matching the subject of a `subject a class` statement.
///
/// The first group is the local name of a prefixed subject, the second the IRI of a full one.
pub(crate) fn typed_subject(prefix: &str, class: &str) -> Regex {
    pattern(&format!(
        r"(?m)^\s*(?:{}:([A-Za-z0-9_][A-Za-z0-9_\-]*)|<([^<>\s]*)>)\s+a\s+{}\s*;",
        regex::escape(prefix),
        regex::escape(class)
    ))
}

pub(crate) fn find<'a>(
    regex: &Regex,
    document: &'a str,
    name: &'static str,
) -> Result<Captures<'a>, ParseError> {
    regex
        .captures(document)
        .ok_or(ParseError::MissingPattern { pattern: name })
}

pub(crate) fn string_capture(captures: &Captures<'_>) -> String {
    captures.get(1).map_or_else(String::new, |m| unescape(m.as_str()))
}

/// Returns the subject IRI captured by a [`typed_subject`] expression.
pub(crate) fn subject_capture(captures: &Captures<'_>, namespace: &str) -> String {
    if let Some(local) = captures.get(1) {
        format!("{namespace}{}", local.as_str())
    } else {
        captures
            .get(2)
            .map_or_else(String::new, |m| m.as_str().to_owned())
    }
}

/// Splits a document holding several record blocks into one document per block.
///
/// Prefix declarations are kept at the top of each block.
pub fn split_blocks(document: &str) -> Vec<String> {
    let mut prefixes = String::new();
    let mut blocks = Vec::new();
    let mut current = String::new();
    for line in document.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("@prefix") || trimmed.to_ascii_uppercase().starts_with("PREFIX") {
            if !prefixes.lines().any(|prefix| prefix == trimmed) {
                prefixes.push_str(trimmed);
                prefixes.push('\n');
            }
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        current.push_str(line);
        current.push('\n');
        if trimmed.ends_with('.') {
            blocks.push(format!("{prefixes}\n{current}"));
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        blocks.push(format!("{prefixes}\n{current}"));
    }
    blocks
}
