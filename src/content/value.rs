//! Resolved content.

use std::ops::Deref;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::navigator::NavigatorHandle;
use crate::waiting::Truthy;

use super::args::TemplateArgs;

// ============================================================================
// FactoryOutput
// ============================================================================

/// What a content factory produces.
#[derive(Debug, Clone)]
pub enum FactoryOutput {
    /// Matched elements.
    Navigator(NavigatorHandle),
    /// Any other value.
    Value(Value),
}

impl From<NavigatorHandle> for FactoryOutput {
    fn from(navigator: NavigatorHandle) -> Self {
        Self::Navigator(navigator)
    }
}

impl From<Value> for FactoryOutput {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

// ============================================================================
// TemplateDerivedContent
// ============================================================================

/// Elements produced by a content template, remembering where they came from.
///
/// Dereferences to the underlying [`NavigatorHandle`].
#[derive(Debug, Clone)]
pub struct TemplateDerivedContent {
    template: String,
    args: TemplateArgs,
    navigator: NavigatorHandle,
}

impl TemplateDerivedContent {
    pub(crate) fn new(template: String, args: TemplateArgs, navigator: NavigatorHandle) -> Self {
        Self {
            template,
            args,
            navigator,
        }
    }

    /// Description of the producing template.
    #[inline]
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Arguments the template was resolved with.
    #[inline]
    #[must_use]
    pub fn args(&self) -> &TemplateArgs {
        &self.args
    }

    /// Matched elements.
    #[inline]
    #[must_use]
    pub fn navigator(&self) -> &NavigatorHandle {
        &self.navigator
    }

    /// Fails unless at least one element matched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RequiredContentNotPresent`] when empty.
    pub fn require(&self) -> Result<&Self> {
        if self.navigator.is_empty() {
            return Err(Error::required_content_not_present(
                &self.template,
                self.args.to_string(),
            ));
        }
        Ok(self)
    }
}

impl Deref for TemplateDerivedContent {
    type Target = NavigatorHandle;

    fn deref(&self) -> &Self::Target {
        &self.navigator
    }
}

// ============================================================================
// Content
// ============================================================================

/// Result of resolving a content template.
#[derive(Debug, Clone)]
pub enum Content {
    /// Elements from a navigator-producing factory.
    Navigator(TemplateDerivedContent),
    /// A plain value. `Null` means absent.
    Value(Value),
}

impl Content {
    /// Returns `true` for a non-empty navigator or a non-null value.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::Navigator(content) => !content.is_empty(),
            Self::Value(value) => !value.is_null(),
        }
    }

    /// The navigator, for navigator content.
    #[must_use]
    pub fn navigator(&self) -> Option<&NavigatorHandle> {
        match self {
            Self::Navigator(content) => Some(content.navigator()),
            Self::Value(_) => None,
        }
    }

    /// The template-derived content, for navigator content.
    #[must_use]
    pub fn as_template_content(&self) -> Option<&TemplateDerivedContent> {
        match self {
            Self::Navigator(content) => Some(content),
            Self::Value(_) => None,
        }
    }

    /// The value, for value content.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Navigator(_) => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl Truthy for Content {
    fn is_truthy(&self) -> bool {
        self.is_present()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn derived(navigator: NavigatorHandle) -> TemplateDerivedContent {
        TemplateDerivedContent::new(
            "content template 'rows' defined by ResultsPage".into(),
            TemplateArgs::from([2]),
            navigator,
        )
    }

    #[test]
    fn test_presence() {
        assert!(!Content::Navigator(derived(NavigatorHandle::empty())).is_present());
        assert!(!Content::Value(Value::Null).is_present());
        assert!(Content::Value(json!(false)).is_present());
        assert!(Content::Value(json!("")).is_present());
    }

    #[test]
    fn test_require_names_template_and_args() {
        let content = derived(NavigatorHandle::empty());
        let err = content.require().unwrap_err();
        match err {
            Error::RequiredContentNotPresent { template, args } => {
                assert!(template.contains("'rows'"));
                assert_eq!(args, "[2]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_accessors() {
        let content = Content::Value(json!(7));
        assert_eq!(content.value(), Some(&json!(7)));
        assert!(content.navigator().is_none());
        assert!(content.as_template_content().is_none());
    }
}
