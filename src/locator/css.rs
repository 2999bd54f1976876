//! CSS selector construction from attribute predicates.

use super::attributes::{AttributePredicates, TEXT_KEY};
use super::selector::MATCH_ALL_SELECTOR;

// ============================================================================
// Escaping
// ============================================================================

/// Escapes a string for use inside a CSS attribute selector.
///
/// `[a-zA-Z0-9_-]` pass through. Control characters become hex escapes
/// terminated by a space, NUL becomes U+FFFD, and every other character is
/// prefixed with a backslash.
#[must_use]
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            c if c.is_ascii_alphanumeric() || c == '_' || c == '-' => out.push(c),
            '\u{1}'..='\u{1f}' | '\u{7f}' => {
                out.push_str(&format!("\\{:x} ", c as u32));
            }
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// Escapes an attribute name so it parses as a CSS identifier.
///
/// Same as [`escape`], except that a leading digit (or a digit right after a
/// leading `-`) becomes a hex escape and a lone `-` is backslash-escaped.
#[must_use]
pub fn escape_identifier(name: &str) -> String {
    if name == "-" {
        return String::from("\\-");
    }

    let mut out = String::with_capacity(name.len() + 4);
    let mut chars = name.chars();
    let leading_dash = name.starts_with('-');
    if leading_dash {
        chars.next();
        out.push('-');
    }
    if let Some(c) = chars.clone().next().filter(char::is_ascii_digit) {
        chars.next();
        out.push_str(&format!("\\{:x} ", c as u32));
    }
    out.push_str(&escape(chars.as_str()));
    out
}

// ============================================================================
// Selector Optimization
// ============================================================================

/// Folds string-valued attribute predicates into `selector`.
///
/// Every entry whose key is not `text` and whose value is a plain string is
/// appended as `[key="value"]` and removed from `attributes`. What remains in
/// `attributes` afterwards must be applied as a post-filter. A leading
/// universal selector is dropped once anything else follows it.
pub fn optimize_selector(selector: &str, attributes: &mut AttributePredicates) -> String {
    let mut buffer = String::from(selector);

    for (key, value) in attributes.iter() {
        if key == TEXT_KEY {
            continue;
        }
        if let Some(expected) = value.as_str() {
            buffer.push('[');
            buffer.push_str(&escape_identifier(key));
            buffer.push_str("=\"");
            buffer.push_str(&escape(expected));
            buffer.push_str("\"]");
        }
    }

    attributes.retain(|key, value| key == TEXT_KEY || value.as_str().is_none());

    if buffer.starts_with(MATCH_ALL_SELECTOR) && buffer.len() > MATCH_ALL_SELECTOR.len() {
        buffer.drain(..MATCH_ALL_SELECTOR.len());
    }

    buffer
}

// ============================================================================
// Tests
// ============================================================================
