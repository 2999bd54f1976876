//! Page objects.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PageClass`] | Static class metadata: name, parent, URL, content declarations |
//! | [`Page`] | A page class bound to a browser session |
//! | [`ContentContainer`] | Named content access, implemented by pages and the browser |
//!
//! A [`Page`] only exists bound to a session: it is created by
//! [`Browser::at`](crate::Browser::at) or [`Browser::to`](crate::Browser::to),
//! which build its [`TemplateRegistry`] once. Template caches live and die
//! with the page.

// ============================================================================
// Submodules
// ============================================================================

mod class;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Configuration;
use crate::content::{Content, TemplateArgs, TemplateRegistry};
use crate::driver::Driver;
use crate::error::{Error, Result};
use crate::locator::{AttributePredicates, Locator, LocatorResolver, SelectorQuery};
use crate::navigator::{NavigatorFactory, NavigatorHandle};
use crate::waiting::{Truthy, WaitSpec};

pub use class::{ContentDeclaration, PAGE, PageClass};

// ============================================================================
// ContentContainer
// ============================================================================

/// Access to named content.
#[async_trait]
pub trait ContentContainer: Send + Sync {
    /// Resolves the content template `name` with `args`.
    async fn content(&self, name: &str, args: TemplateArgs) -> Result<Arc<Content>>;

    /// Returns `true` if content `name` is declared.
    fn has_content(&self, name: &str) -> bool;

    /// Declared content names, sorted.
    fn content_names(&self) -> Vec<String>;
}

// ============================================================================
// Page
// ============================================================================

/// A page class bound to a browser session.
///
/// Cheap to clone; clones share templates and caches.
#[derive(Clone)]
pub struct Page {
    inner: Arc<PageInner>,
}

struct PageInner {
    class: &'static PageClass,
    config: Arc<Configuration>,
    locator: LocatorResolver,
    registry: TemplateRegistry,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("class", &self.inner.class.name())
            .field("content", &self.inner.registry.names())
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Binds `class` to a session, collecting content up to [`PAGE`].
    pub(crate) fn bind(
        class: &'static PageClass,
        driver: Arc<dyn Driver>,
        config: Arc<Configuration>,
        navigator_factory: Arc<dyn NavigatorFactory>,
    ) -> Result<Self> {
        let registry = TemplateRegistry::build(class, &PAGE)?;
        debug!(page = %class, templates = registry.len(), "Bound page");

        Ok(Self {
            inner: Arc::new(PageInner {
                class,
                config,
                locator: LocatorResolver::new(driver, navigator_factory),
                registry,
            }),
        })
    }

    /// Page class.
    #[inline]
    #[must_use]
    pub fn class(&self) -> &'static PageClass {
        self.inner.class
    }

    /// Session configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.inner.config
    }

    /// Content templates of this page.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &TemplateRegistry {
        &self.inner.registry
    }

    /// Resolves the content template `name` with `args`.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownContent`] if no template is named `name`
    /// - anything the template resolution returns
    pub async fn content(
        &self,
        name: &str,
        args: impl Into<TemplateArgs> + Send,
    ) -> Result<Arc<Content>> {
        let template = self
            .inner
            .registry
            .get(name)
            .ok_or_else(|| Error::unknown_content(self.inner.class.name(), name))?;
        template.resolve(self, args.into()).await
    }

    /// Returns `true` if content `name` is declared.
    #[inline]
    #[must_use]
    pub fn has_content(&self, name: &str) -> bool {
        self.inner.registry.contains(name)
    }

    /// Declared content names, sorted.
    #[must_use]
    pub fn content_names(&self) -> Vec<String> {
        self.inner.registry.names()
    }

    /// Polls `op` with the budget named by `spec` until it is truthy.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] for an unknown preset
    /// - [`Error::WaitTimeout`] if the budget runs out
    /// - any non-transient error from `op`
    pub async fn wait_for<T, F, Fut>(&self, spec: &WaitSpec, op: F) -> Result<T>
    where
        T: Truthy + fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.inner.config.wait_for(spec)?.wait_for(op).await
    }
}

#[async_trait]
impl Locator for Page {
    async fn find_by(&self, query: SelectorQuery) -> Result<NavigatorHandle> {
        self.inner.locator.find_by(query).await
    }

    async fn find_matching(
        &self,
        attributes: AttributePredicates,
        selector: &str,
    ) -> Result<NavigatorHandle> {
        self.inner.locator.find_matching(attributes, selector).await
    }
}

#[async_trait]
impl ContentContainer for Page {
    async fn content(&self, name: &str, args: TemplateArgs) -> Result<Arc<Content>> {
        Page::content(self, name, args).await
    }

    fn has_content(&self, name: &str) -> bool {
        Page::has_content(self, name)
    }

    fn content_names(&self) -> Vec<String> {
        Page::content_names(self)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::content::{ContentDsl, FactoryOutput, TemplateParams};
    use crate::driver::memory::{MemoryDriver, MemoryNode};
    use crate::navigator::BrowserBackedNavigatorFactory;

    fn declare(dsl: &mut ContentDsl) {
        dsl.content("heading", TemplateParams::new(), |ctx| async move {
            Ok(ctx.find("h1").await?.into())
        })
        .content("missing", TemplateParams::new(), |ctx| async move {
            Ok(ctx.find("h2").await?.into())
        })
        .content("optional", TemplateParams::new().required(false), |ctx| async move {
            Ok(ctx.find("h2").await?.into())
        })
        .content("counted", TemplateParams::new().cache(true), |ctx| async move {
            Ok(FactoryOutput::Value(json!(ctx.args().len())))
        })
        .content("echo", TemplateParams::new(), |ctx| async move {
            Ok(FactoryOutput::Value(json!(ctx.arg_str(0)?)))
        })
        .content("greeting", TemplateParams::new(), |ctx| async move {
            let lang = ctx.arg_named("lang").and_then(|v| v.as_str()).unwrap_or("en");
            let text = if lang == "fr" { "Bonjour" } else { "Hello" };
            Ok(FactoryOutput::Value(json!(format!("{text} {}", ctx.arg_str(0)?))))
        });
    }

    static HOME: PageClass = PageClass::new("HomePage").content(declare);

    fn bind() -> Page {
        let driver = Arc::new(MemoryDriver::with_document([
            MemoryNode::new("h1").with_text("Welcome")
        ]));
        Page::bind(
            &HOME,
            driver,
            Arc::new(Configuration::default()),
            Arc::new(BrowserBackedNavigatorFactory::default()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_content_resolves_navigator() {
        let page = bind();
        let heading = page.content("heading", ()).await.unwrap();
        let navigator = heading.navigator().unwrap();
        assert_eq!(navigator.text().await.unwrap().as_deref(), Some("Welcome"));
    }

    #[tokio::test]
    async fn test_unknown_content() {
        let err = bind().content("nope", ()).await.unwrap_err();
        match err {
            Error::UnknownContent { page, name } => {
                assert_eq!(page, "HomePage");
                assert_eq!(name, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_required_vs_optional_empty() {
        let page = bind();
        let err = page.content("missing", ()).await.unwrap_err();
        assert!(matches!(err, Error::RequiredContentNotPresent { .. }));
        assert!(err.to_string().contains("content template 'missing' defined by HomePage"));

        let optional = page.content("optional", ()).await.unwrap();
        assert!(optional.navigator().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_per_page() {
        let first = bind();
        let a = first.content("counted", [1]).await.unwrap();
        let b = first.content("counted", [1]).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let c = bind().content("counted", [1]).await.unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn test_argument_errors_propagate() {
        let page = bind();
        assert_eq!(
            page.content("echo", ["hi"]).await.unwrap().value(),
            Some(&json!("hi"))
        );
        let err = page.content("echo", [1]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_keyword_arguments() {
        let page = bind();
        let plain = page.content("greeting", ["Ana"]).await.unwrap();
        assert_eq!(plain.value(), Some(&json!("Hello Ana")));

        let args = TemplateArgs::from(["Ana"]).with_named("lang", "fr");
        let french = page.content("greeting", args).await.unwrap();
        assert_eq!(french.value(), Some(&json!("Bonjour Ana")));
    }

    #[tokio::test]
    async fn test_container_forwarding() {
        let page = bind();
        let container: &dyn ContentContainer = &page;
        assert!(container.has_content("heading"));
        assert_eq!(
            container.content_names(),
            vec!["counted", "echo", "greeting", "heading", "missing", "optional"]
        );
        let heading = container.content("heading", TemplateArgs::new()).await.unwrap();
        assert!(heading.is_present());
    }
}
