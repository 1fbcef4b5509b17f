//! Tag-delimited template renderer.
//!
//! Text outside tags is copied as-is. Recognised tags:
//!
//! | Tag            | Output                                        |
//! |----------------|-----------------------------------------------|
//! | `<%= path %>`  | metadata value at `path`, HTML-escaped        |
//! | `<%- path %>`  | metadata value at `path`, unescaped           |
//! | `<%# ... %>`   | nothing (comment)                             |
//! | `<%%`          | a literal `<%`                                |
//!
//! A tag closed with `-%>` also swallows the line break that follows it.
//! `path` is a dotted chain of identifiers and array indices such as
//! `owner.name` or `friends.0`. Code tags (`<% ... %>`) and any other
//! expression are syntax errors: templates carry data, never logic.

use archetype_core::{
    application::ports::TemplateRenderer,
    domain::{Metadata, TemplateError},
};
use serde_json::Value;

const OPEN: &str = "<%";
const CLOSE: &str = "%>";

/// Renderer for `<%= %>` style templates, bound to metadata values only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagRenderer;

impl TagRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateRenderer for TagRenderer {
    fn render(&self, template: &str, metadata: &Metadata) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(template.len());
        let mut cursor = 0;

        while let Some(found) = template[cursor..].find(OPEN) {
            let start = cursor + found;
            out.push_str(&template[cursor..start]);

            let after_open = start + OPEN.len();
            if template[after_open..].starts_with('%') {
                out.push_str(OPEN);
                cursor = after_open + 1;
                continue;
            }

            let tag = Tag::parse(template, start)?;
            tag.evaluate(template, metadata, &mut out)?;
            cursor = tag.end;
        }

        out.push_str(&template[cursor..]);
        Ok(out)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Escaped,
    Raw,
    Comment,
    Code,
}

/// A parsed tag; offsets index into the template text.
#[derive(Debug)]
struct Tag<'t> {
    kind: TagKind,
    body: &'t str,
    start: usize,
    end: usize,
}

impl<'t> Tag<'t> {
    fn parse(template: &'t str, start: usize) -> Result<Self, TemplateError> {
        let after_open = start + OPEN.len();
        let (kind, body_start) = match template.as_bytes().get(after_open) {
            Some(b'=') => (TagKind::Escaped, after_open + 1),
            Some(b'-') => (TagKind::Raw, after_open + 1),
            Some(b'#') => (TagKind::Comment, after_open + 1),
            _ => (TagKind::Code, after_open),
        };

        let close = template[body_start..]
            .find(CLOSE)
            .map(|offset| body_start + offset)
            .ok_or_else(|| syntax_error(template, start, "unterminated tag, expected '%>'"))?;

        let mut body = &template[body_start..close];
        let mut end = close + CLOSE.len();

        if let Some(trimmed) = body.strip_suffix('-') {
            body = trimmed;
            let rest = &template[end..];
            if rest.starts_with("\r\n") {
                end += 2;
            } else if rest.starts_with('\n') {
                end += 1;
            }
        }

        Ok(Self {
            kind,
            body,
            start,
            end,
        })
    }

    fn evaluate(
        &self,
        template: &str,
        metadata: &Metadata,
        out: &mut String,
    ) -> Result<(), TemplateError> {
        let escape = match self.kind {
            TagKind::Comment => return Ok(()),
            TagKind::Code => {
                return Err(syntax_error(
                    template,
                    self.start,
                    "code tags are not supported, use '<%=' or '<%-'",
                ));
            }
            TagKind::Escaped => true,
            TagKind::Raw => false,
        };

        let expression = self.body.trim();
        let segments = parse_path(expression)
            .ok_or_else(|| {
                let message = if expression.is_empty() {
                    "empty expression".to_string()
                } else {
                    format!("unsupported expression '{expression}'")
                };
                syntax_error(template, self.start, message)
            })?;

        let value = metadata
            .resolve(segments.iter().copied())
            .ok_or_else(|| TemplateError::UndefinedReference {
                name: expression.to_string(),
            })?;

        let text = display(value);
        if escape {
            escape_html(&text, out);
        } else {
            out.push_str(&text);
        }
        Ok(())
    }
}

/// Split `owner.friends.0` into segments. The first segment must be an
/// identifier; later ones may also be array indices.
fn parse_path(expression: &str) -> Option<Vec<&str>> {
    let segments: Vec<&str> = expression.split('.').map(str::trim).collect();
    let (head, tail) = segments.split_first()?;

    if !is_identifier(head) {
        return None;
    }
    if !tail.iter().all(|s| is_identifier(s) || is_index(s)) {
        return None;
    }
    Some(segments)
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Text form of a metadata value.
fn display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => value.to_string(),
        Value::Array(items) => items.iter().map(display).collect::<Vec<_>>().join(","),
    }
}

fn escape_html(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Build a syntax error positioned at byte `offset` (1-based line/column).
fn syntax_error(template: &str, offset: usize, message: impl Into<String>) -> TemplateError {
    let before = &template[..offset];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;

    TemplateError::Syntax {
        line,
        column,
        message: message.into(),
    }
}
