//! Placeholder discovery and substitution

use super::session::RenderSession;
use crate::error::GeneratorError;

/// Opening placeholder delimiter
pub const OPEN: &str = "{{";

/// Closing placeholder delimiter
pub const CLOSE: &str = "}}";

/// Find the distinct placeholder names in `text`, in first-seen order
///
/// Only upper-case identifiers (`[A-Z][A-Z0-9_]*`) between the delimiters count
/// as placeholders, so `${{ matrix.node }}` in a workflow file is left alone.
/// Nested delimiters are not supported: `{{A{{B}}}}` is scanned as the single
/// token body `A{{B`, which is not an identifier.
pub fn find_placeholders(text: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            break;
        };
        let body = &after_open[..end];
        if is_placeholder_name(body) && !names.contains(&body) {
            names.push(body);
        }
        rest = &after_open[end + CLOSE.len()..];
    }

    names
}

fn is_placeholder_name(body: &str) -> bool {
    let mut chars = body.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn token(name: &str) -> String {
    format!("{}{}{}", OPEN, name, CLOSE)
}

/// Substitute every placeholder known to the session's schema
///
/// Names with no schema entry stay in the output untouched.
pub fn render(session: &mut RenderSession, text: &str) -> Result<String, GeneratorError> {
    let names: Vec<String> = find_placeholders(text)
        .into_iter()
        .filter(|name| session.schema().contains(name))
        .map(str::to_string)
        .collect();
    substitute(session, text, &names)
}

/// Substitute every placeholder, failing on the first one that cannot be resolved
pub fn render_strict(session: &mut RenderSession, text: &str) -> Result<String, GeneratorError> {
    let names: Vec<String> = find_placeholders(text)
        .into_iter()
        .map(str::to_string)
        .collect();
    substitute(session, text, &names)
}

fn substitute(
    session: &mut RenderSession,
    text: &str,
    names: &[String],
) -> Result<String, GeneratorError> {
    let mut values = Vec::with_capacity(names.len());
    for name in names {
        values.push((token(name), session.get_value(name)?.to_string()));
    }

    // Single left-to-right pass: substituted values are never rescanned.
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        let after_open = &rest[start..];
        match values
            .iter()
            .find(|(token, _)| after_open.starts_with(token.as_str()))
        {
            Some((token, value)) => {
                output.push_str(&rest[..start]);
                output.push_str(value);
                rest = &after_open[token.len()..];
            }
            None => {
                output.push_str(&rest[..start + OPEN.len()]);
                rest = &after_open[OPEN.len()..];
            }
        }
    }
    output.push_str(rest);

    Ok(output)
}
