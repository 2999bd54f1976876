//! Template call arguments.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Ordered arguments passed to a content template.
///
/// Two argument lists are the same for caching purposes iff their canonical
/// JSON serializations are equal. Object keys are serialized sorted, so key
/// order never matters; `1` and `1.0` are different arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateArgs(Vec<Value>);

impl TemplateArgs {
    /// No arguments.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of arguments.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no arguments.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Argument at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Iterates arguments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Keyword argument `key`.
    ///
    /// Keyword arguments travel as a JSON object in the last position.
    #[must_use]
    pub fn named(&self, key: &str) -> Option<&Value> {
        self.0.last()?.as_object()?.get(key)
    }

    /// Adds keyword argument `key`, starting a trailing object if the last
    /// argument is not one.
    #[must_use]
    pub fn with_named(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        match self.0.last_mut() {
            Some(Value::Object(map)) => {
                map.insert(key.into(), value.into());
            }
            _ => {
                let mut map = serde_json::Map::new();
                map.insert(key.into(), value.into());
                self.0.push(Value::Object(map));
            }
        }
        self
    }

    /// Canonical key used by template caches.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn cache_key(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }
}

impl fmt::Display for TemplateArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, arg) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str("]")
    }
}

impl From<()> for TemplateArgs {
    fn from((): ()) -> Self {
        Self::new()
    }
}

impl From<Vec<Value>> for TemplateArgs {
    fn from(args: Vec<Value>) -> Self {
        Self(args)
    }
}

impl From<Value> for TemplateArgs {
    fn from(arg: Value) -> Self {
        Self(vec![arg])
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for TemplateArgs {
    fn from(args: [T; N]) -> Self {
        Self(args.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a TemplateArgs {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_conversions() {
        assert!(TemplateArgs::from(()).is_empty());
        assert_eq!(TemplateArgs::from(["a", "b"]).len(), 2);
        assert_eq!(TemplateArgs::from(json!(3)).get(0), Some(&json!(3)));
    }

    #[test]
    fn test_cache_key_ignores_object_key_order() {
        let a = TemplateArgs::from([json!({"b": 1, "a": 2})]);
        let b = TemplateArgs::from([json!({"a": 2, "b": 1})]);
        assert_eq!(a.cache_key().unwrap(), b.cache_key().unwrap());
    }

    #[test]
    fn test_cache_key_is_positional() {
        let a = TemplateArgs::from([1, 2]);
        let b = TemplateArgs::from([2, 1]);
        assert_ne!(a.cache_key().unwrap(), b.cache_key().unwrap());
    }

    #[test]
    fn test_cache_key_distinguishes_types() {
        let int = TemplateArgs::from([json!(1)]);
        let text = TemplateArgs::from([json!("1")]);
        assert_ne!(int.cache_key().unwrap(), text.cache_key().unwrap());
    }

    #[test]
    fn test_named_arguments_read_trailing_object() {
        let args = TemplateArgs::from([json!(2)])
            .with_named("lang", "en")
            .with_named("strict", true);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get(1), Some(&json!({"lang": "en", "strict": true})));
        assert_eq!(args.named("lang"), Some(&json!("en")));
        assert_eq!(args.named("missing"), None);

        assert_eq!(TemplateArgs::from([json!("en")]).named("lang"), None);
        assert_eq!(TemplateArgs::new().named("lang"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TemplateArgs::from([json!(1), json!("x")]).to_string(), "[1, \"x\"]");
        assert_eq!(TemplateArgs::new().to_string(), "[]");
    }
}
