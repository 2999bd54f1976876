//! What a content factory gets to work with.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::locator::{AttributePredicates, Locator, SelectorQuery};
use crate::navigator::NavigatorHandle;
use crate::page::Page;

use super::args::TemplateArgs;
use super::value::Content;

/// Explicit context handed to a content factory: the page being resolved
/// and the call arguments. Finds go through the page's locator.
#[derive(Debug, Clone)]
pub struct ContentContext {
    page: Page,
    args: TemplateArgs,
}

impl ContentContext {
    pub(crate) fn new(page: Page, args: TemplateArgs) -> Self {
        Self { page, args }
    }

    /// Page the template belongs to.
    #[inline]
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Call arguments.
    #[inline]
    #[must_use]
    pub fn args(&self) -> &TemplateArgs {
        &self.args
    }

    /// Argument at `index`.
    #[inline]
    #[must_use]
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// String argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if it is missing or not a string.
    pub fn arg_str(&self, index: usize) -> Result<&str> {
        self.arg(index)
            .and_then(Value::as_str)
            .ok_or_else(|| self.bad_arg(index, "a string"))
    }

    /// Non-negative integer argument at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if it is missing or not a
    /// non-negative integer.
    pub fn arg_index(&self, index: usize) -> Result<usize> {
        self.arg(index)
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| self.bad_arg(index, "a non-negative integer"))
    }

    /// Keyword argument `key`, read from a trailing object argument.
    #[inline]
    #[must_use]
    pub fn arg_named(&self, key: &str) -> Option<&Value> {
        self.args.named(key)
    }

    fn bad_arg(&self, index: usize, expected: &str) -> Error {
        Error::invalid_argument(format!(
            "argument {index} of {} should be {expected}",
            self.args
        ))
    }

    /// Resolves another template of the same page.
    pub async fn content(
        &self,
        name: &str,
        args: impl Into<TemplateArgs> + Send,
    ) -> Result<Arc<Content>> {
        self.page.content(name, args).await
    }
}

#[async_trait]
impl Locator for ContentContext {
    async fn find_by(&self, query: SelectorQuery) -> Result<NavigatorHandle> {
        self.page.find_by(query).await
    }

    async fn find_matching(
        &self,
        attributes: AttributePredicates,
        selector: &str,
    ) -> Result<NavigatorHandle> {
        self.page.find_matching(attributes, selector).await
    }
}
