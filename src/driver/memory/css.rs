//! Compound CSS selector matching for the in-memory driver.
//!
//! Supports one compound selector: an optional type or universal selector
//! followed by any number of `#id`, `.class`, `[attr]` and `[attr=value]`
//! parts, with CSS escapes in identifiers and strings. Combinators,
//! pseudo-classes and selector lists are reported as invalid selectors.

use std::iter::Peekable;
use std::str::Chars;

use crate::error::{Error, Result};

use super::MemoryNode;

// ============================================================================
// Types
// ============================================================================

/// One simple-selector condition.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Condition {
    Id(String),
    Class(String),
    HasAttribute(String),
    AttributeEquals(String, String),
}

/// A parsed compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CompoundSelector {
    tag: Option<String>,
    conditions: Vec<Condition>,
}

impl CompoundSelector {
    /// Returns `true` if `node` satisfies every part of the selector.
    pub(crate) fn matches(&self, node: &MemoryNode) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(node.tag())
        {
            return false;
        }

        self.conditions.iter().all(|condition| match condition {
            Condition::Id(id) => node.attribute("id") == Some(id.as_str()),
            Condition::Class(class) => node.has_class(class),
            Condition::HasAttribute(name) => node.attribute(name).is_some(),
            Condition::AttributeEquals(name, value) => {
                node.attribute(name) == Some(value.as_str())
            }
        })
    }
}

// ============================================================================
// Parser
// ============================================================================

/// Parses a compound selector.
///
/// # Errors
///
/// Returns [`Error::InvalidSelector`] for empty input, unsupported syntax,
/// or malformed escapes and strings.
pub(crate) fn parse(selector: &str) -> Result<CompoundSelector> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_selector(selector, "empty selector"));
    }

    let fail = |message: &str| Error::invalid_selector(selector, message);
    let mut chars = trimmed.chars().peekable();
    let mut tag = None;
    let mut conditions = Vec::new();

    match chars.peek() {
        Some('*') => {
            chars.next();
        }
        Some(&c) if is_ident_char(c) || c == '\\' => {
            tag = Some(read_ident(&mut chars).map_err(|m| fail(m))?);
        }
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => conditions.push(Condition::Id(read_ident(&mut chars).map_err(|m| fail(m))?)),
            '.' => {
                conditions.push(Condition::Class(read_ident(&mut chars).map_err(|m| fail(m))?))
            }
            '[' => conditions.push(read_attribute(&mut chars).map_err(|m| fail(m))?),
            c if c.is_whitespace() || matches!(c, '>' | '+' | '~') => {
                return Err(fail("combinators are not supported"));
            }
            ':' => return Err(fail("pseudo-classes are not supported")),
            ',' => return Err(fail("selector lists are not supported")),
            _ => return Err(fail("unexpected character")),
        }
    }

    Ok(CompoundSelector { tag, conditions })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || !c.is_ascii()
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

fn read_escape(chars: &mut Peekable<Chars<'_>>) -> std::result::Result<char, &'static str> {
    let Some(&first) = chars.peek() else {
        return Err("dangling escape");
    };

    if first.is_ascii_hexdigit() {
        let mut hex = String::new();
        while hex.len() < 6
            && let Some(c) = chars.next_if(char::is_ascii_hexdigit)
        {
            hex.push(c);
        }
        chars.next_if(|c| c.is_whitespace());
        let code = u32::from_str_radix(&hex, 16).unwrap_or(0);
        return Ok(match char::from_u32(code) {
            Some('\0') | None => '\u{FFFD}',
            Some(c) => c,
        });
    }

    if first == '\n' {
        return Err("escaped newline outside a string");
    }
    chars.next();
    Ok(first)
}

fn read_ident(chars: &mut Peekable<Chars<'_>>) -> std::result::Result<String, &'static str> {
    let mut ident = String::new();
    loop {
        match chars.peek() {
            Some('\\') => {
                chars.next();
                ident.push(read_escape(chars)?);
            }
            Some(&c) if is_ident_char(c) => {
                chars.next();
                ident.push(c);
            }
            _ => break,
        }
    }
    if ident.is_empty() {
        return Err("expected identifier");
    }
    Ok(ident)
}

fn read_string(
    chars: &mut Peekable<Chars<'_>>,
    quote: char,
) -> std::result::Result<String, &'static str> {
    let mut value = String::new();
    loop {
        match chars.next() {
            None => return Err("unterminated string"),
            Some(c) if c == quote => return Ok(value),
            Some('\n') => return Err("newline in string"),
            Some('\\') => {
                if chars.next_if_eq(&'\n').is_some() {
                    continue;
                }
                value.push(read_escape(chars)?);
            }
            Some(c) => value.push(c),
        }
    }
}

fn read_attribute(chars: &mut Peekable<Chars<'_>>) -> std::result::Result<Condition, &'static str> {
    skip_whitespace(chars);
    let name = read_ident(chars)?;
    skip_whitespace(chars);

    match chars.next() {
        Some(']') => Ok(Condition::HasAttribute(name)),
        Some('=') => {
            skip_whitespace(chars);
            let value = match chars.peek() {
                Some(&q) if q == '"' || q == '\'' => {
                    chars.next();
                    read_string(chars, q)?
                }
                _ => read_ident(chars)?,
            };
            skip_whitespace(chars);
            match chars.next() {
                Some(']') => Ok(Condition::AttributeEquals(name, value)),
                _ => Err("expected ']'"),
            }
        }
        Some(_) => Err("unsupported attribute operator"),
        None => Err("unterminated attribute selector"),
    }
}

// ============================================================================
// Tests
// ============================================================================
