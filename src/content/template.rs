//! Content templates and their resolution.
//!
//! Resolving a template:
//!
//! 1. With `cache` set, a previous result for equal arguments is returned
//!    as the same [`Arc`], without calling the factory or the driver.
//! 2. Otherwise the factory runs once, or under a [`WaitEngine`] until it
//!    produces present content when `wait` is set.
//! 3. With `required` set, absent content fails with
//!    [`Error::RequiredContentNotPresent`] and a wait timeout propagates.
//!    Without it, a timeout yields the last value observed, or
//!    `Value::Null` when no attempt produced one.
//!
//! [`WaitEngine`]: crate::WaitEngine

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::page::{Page, PageClass};
use crate::waiting::{WaitFailure, WaitSpec};

use super::args::TemplateArgs;
use super::context::ContentContext;
use super::value::{Content, FactoryOutput, TemplateDerivedContent};

// ============================================================================
// Types
// ============================================================================

/// Type-erased content factory.
pub type ContentFactory =
    Arc<dyn Fn(ContentContext) -> BoxFuture<'static, Result<FactoryOutput>> + Send + Sync>;

// ============================================================================
// TemplateParams
// ============================================================================

/// Options attached to a content declaration.
///
/// | Option | Default |
/// |--------|---------|
/// | `required` | `true` |
/// | `cache` | `false` |
/// | `wait` | none |
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateParams {
    required: bool,
    cache: bool,
    wait: Option<WaitSpec>,
}

impl Default for TemplateParams {
    fn default() -> Self {
        Self {
            required: true,
            cache: false,
            wait: None,
        }
    }
}

impl TemplateParams {
    /// Default options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether absent content is an error.
    #[inline]
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Whether results are cached per argument list.
    #[inline]
    #[must_use]
    pub fn cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    /// Waits for the content to be present.
    #[inline]
    #[must_use]
    pub fn wait(mut self, wait: impl Into<WaitSpec>) -> Self {
        self.wait = Some(wait.into());
        self
    }

    /// Returns `true` if absent content is an error.
    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns `true` if results are cached.
    #[inline]
    #[must_use]
    pub fn is_cached(&self) -> bool {
        self.cache
    }

    /// How to wait, if at all.
    #[inline]
    #[must_use]
    pub fn wait_spec(&self) -> Option<&WaitSpec> {
        self.wait.as_ref()
    }
}

// ============================================================================
// ContentTemplate
// ============================================================================

/// A named content accessor of one bound page.
pub struct ContentTemplate {
    name: String,
    owner: &'static PageClass,
    params: TemplateParams,
    factory: ContentFactory,
    cache: Mutex<FxHashMap<String, Arc<Content>>>,
}

impl fmt::Debug for ContentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentTemplate")
            .field("name", &self.name)
            .field("owner", &self.owner.name())
            .field("params", &self.params)
            .field("cached_entries", &self.cache.lock().len())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for ContentTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "content template '{}' defined by {}",
            self.name,
            self.owner.name()
        )
    }
}

impl ContentTemplate {
    pub(crate) fn new(
        name: String,
        owner: &'static PageClass,
        params: TemplateParams,
        factory: ContentFactory,
    ) -> Self {
        Self {
            name,
            owner,
            params,
            factory,
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Template name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Page class that declared the template.
    #[inline]
    #[must_use]
    pub fn owner(&self) -> &'static PageClass {
        self.owner
    }

    /// Declared options.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &TemplateParams {
        &self.params
    }

    /// Resolves the template against `page`.
    ///
    /// # Errors
    ///
    /// - [`Error::RequiredContentNotPresent`] if required content is absent
    /// - [`Error::WaitTimeout`] if a required wait ran out
    /// - [`Error::InvalidConfiguration`] for an unknown wait preset
    /// - anything the factory or driver returns, unmodified
    pub async fn resolve(&self, page: &Page, args: TemplateArgs) -> Result<Arc<Content>> {
        if !self.params.cache {
            return self.create(page, args).await.map(Arc::new);
        }

        let key = args.cache_key()?;
        let cached = self.cache.lock().get(&key).cloned();
        if let Some(content) = cached {
            trace!(template = %self.name, %key, "Content cache hit");
            return Ok(content);
        }

        debug!(template = %self.name, %key, "Content cache miss");
        let content = Arc::new(self.create(page, args).await?);
        let stored = Arc::clone(self.cache.lock().entry(key).or_insert(content));
        Ok(stored)
    }

    async fn create(&self, page: &Page, args: TemplateArgs) -> Result<Content> {
        let content = match &self.params.wait {
            None => self.invoke(page, &args).await?,
            Some(spec) => {
                let engine = page.config().wait_for(spec)?;
                let args_ref = &args;
                match engine.run(move || self.invoke(page, args_ref)).await {
                    Ok(content) => content,
                    Err(WaitFailure::TimedOut(timeout)) if !self.params.required => {
                        debug!(
                            template = %self.name,
                            attempts = timeout.attempts,
                            "Optional content wait timed out"
                        );
                        timeout.last_value.unwrap_or(Content::Value(Value::Null))
                    }
                    Err(failure) => return Err(failure.into()),
                }
            }
        };

        if self.params.required && !content.is_present() {
            return Err(Error::required_content_not_present(
                self.to_string(),
                args.to_string(),
            ));
        }

        Ok(content)
    }

    async fn invoke(&self, page: &Page, args: &TemplateArgs) -> Result<Content> {
        let context = ContentContext::new(page.clone(), args.clone());
        let output = (self.factory)(context).await?;

        Ok(match output {
            FactoryOutput::Navigator(navigator) => Content::Navigator(
                TemplateDerivedContent::new(self.to_string(), args.clone(), navigator),
            ),
            FactoryOutput::Value(value) => Content::Value(value),
        })
    }
}
