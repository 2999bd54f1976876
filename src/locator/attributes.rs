//! Attribute predicates applied to located elements.
//!
//! A predicate set maps an attribute name to the value it must have. The
//! key `text` matches the element's text content instead of an attribute.
//! String values can be folded into a CSS selector; everything else stays
//! behind as a residual predicate and is checked against each element.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Predicate key matched against text content rather than an attribute.
pub const TEXT_KEY: &str = "text";

// ============================================================================
// AttributeValue
// ============================================================================

/// Custom matcher over an attribute value (`None` when absent).
pub type MatcherFn = Arc<dyn Fn(Option<&str>) -> bool + Send + Sync>;

/// Expected value of one attribute predicate.
#[derive(Clone)]
pub enum AttributeValue {
    /// Exact string equality. The only foldable form.
    Equals(String),
    /// Whole-value regular expression match.
    Pattern(Regex),
    /// Arbitrary matcher.
    Matcher(MatcherFn),
}

impl AttributeValue {
    /// Creates an anchored pattern predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the pattern does not compile.
    pub fn pattern(pattern: &str) -> Result<Self> {
        Regex::new(&format!("^(?:{pattern})$"))
            .map(Self::Pattern)
            .map_err(|e| Error::invalid_argument(format!("invalid pattern '{pattern}': {e}")))
    }

    /// Creates a matcher predicate.
    pub fn matcher<F>(f: F) -> Self
    where
        F: Fn(Option<&str>) -> bool + Send + Sync + 'static,
    {
        Self::Matcher(Arc::new(f))
    }

    /// Returns the string when this is an equality predicate.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Equals(s) => Some(s),
            _ => None,
        }
    }

    /// Checks an actual value against this predicate.
    #[must_use]
    pub fn matches(&self, actual: Option<&str>) -> bool {
        match self {
            Self::Equals(expected) => actual == Some(expected.as_str()),
            Self::Pattern(regex) => actual.is_some_and(|v| regex.is_match(v)),
            Self::Matcher(f) => f(actual),
        }
    }
}

impl fmt::Debug for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals(s) => write!(f, "{s:?}"),
            Self::Pattern(r) => write!(f, "/{}/", r.as_str()),
            Self::Matcher(_) => f.write_str("<matcher>"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        Self::Equals(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        Self::Equals(s)
    }
}

impl From<Regex> for AttributeValue {
    fn from(r: Regex) -> Self {
        Self::Pattern(r)
    }
}

// ============================================================================
// AttributePredicates
// ============================================================================

/// Ordered set of attribute predicates, keyed by attribute name.
///
/// Iteration is sorted by key so selector folding is deterministic.
#[derive(Debug, Clone, Default)]
pub struct AttributePredicates {
    entries: BTreeMap<String, AttributeValue>,
}

impl AttributePredicates {
    /// Creates an empty predicate set.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate, replacing any previous one for the key.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Adds a predicate in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Returns the predicate for a key.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.entries.get(key)
    }

    /// Returns the string value for a key, if it is an equality predicate.
    #[inline]
    #[must_use]
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(AttributeValue::as_str)
    }

    /// Number of predicates.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no predicates.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates predicates in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributeValue> {
        self.entries.iter()
    }

    /// Keeps only the predicates for which `f` returns `true`.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&String, &mut AttributeValue) -> bool,
    {
        self.entries.retain(f);
    }
}

impl<'a> IntoIterator for &'a AttributePredicates {
    type Item = (&'a String, &'a AttributeValue);
    type IntoIter = btree_map::Iter<'a, String, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for AttributePredicates
where
    K: Into<String>,
    V: Into<AttributeValue>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs
            .into_iter()
            .fold(Self::new(), |acc, (k, v)| acc.with(k, v))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_matches_exactly() {
        let value = AttributeValue::from("submit");
        assert!(value.matches(Some("submit")));
        assert!(!value.matches(Some("submit ")));
        assert!(!value.matches(None));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let value = AttributeValue::pattern("Sub.*").unwrap();
        assert!(value.matches(Some("Submit")));
        assert!(!value.matches(Some("Resubmit")));
        assert!(!value.matches(None));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = AttributeValue::pattern("(unclosed").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_matcher_sees_absence() {
        let value = AttributeValue::matcher(|v| v.is_none());
        assert!(value.matches(None));
        assert!(!value.matches(Some("")));
    }

    #[test]
    fn test_predicates_sorted_by_key() {
        let preds = AttributePredicates::from([("type", "text"), ("name", "q"), ("id", "x")]);
        let keys: Vec<_> = preds.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "name", "type"]);
    }

    #[test]
    fn test_string_value() {
        let preds = AttributePredicates::new()
            .with("id", "x")
            .with("text", AttributeValue::pattern("a+").unwrap());
        assert_eq!(preds.string_value("id"), Some("x"));
        assert_eq!(preds.string_value("text"), None);
        assert_eq!(preds.string_value("missing"), None);
    }
}
