//! Browser session.
//!
//! A [`Browser`] owns one driver session, the session [`Configuration`] and
//! the current [`Page`]. Content and find calls made on the browser are
//! forwarded to whichever page is current at call time.
//!
//! # Example
//!
//! ```ignore
//! use kebab::{Browser, Configuration, ContentContainer};
//!
//! let browser = Browser::new(driver, Configuration::builder()
//!     .base_url("http://localhost:8080/")
//!     .build()?)?;
//!
//! browser.to(&LOGIN, [("next", "/home")]).await?;
//! let form = browser.content("form", ().into()).await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod navigation;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::config::Configuration;
use crate::content::{Content, TemplateArgs};
use crate::driver::Driver;
use crate::error::Result;
use crate::locator::{AttributePredicates, Locator, SelectorQuery};
use crate::navigator::{NavigatorFactory, NavigatorHandle};
use crate::page::{ContentContainer, PAGE, Page, PageClass};
use crate::waiting::{Truthy, WaitSpec};

// ============================================================================
// Browser
// ============================================================================

/// Owner of one driver session and its current page.
///
/// Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct Browser {
    inner: Arc<BrowserInner>,
}

struct BrowserInner {
    driver: Arc<dyn Driver>,
    config: Arc<Configuration>,
    navigator_factory: Arc<dyn NavigatorFactory>,
    page: RwLock<Page>,
}

impl fmt::Debug for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Browser")
            .field("driver", &self.inner.driver)
            .field("page", &self.page().class().name())
            .finish_non_exhaustive()
    }
}

impl Browser {
    /// Creates a session over `driver`, starting on the root [`PAGE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    /// if a navigator factory override has the wrong type.
    pub fn new(driver: Arc<dyn Driver>, config: Configuration) -> Result<Self> {
        let config = Arc::new(config);
        let navigator_factory = config.create_navigator_factory()?;
        let page = Page::bind(
            &PAGE,
            Arc::clone(&driver),
            Arc::clone(&config),
            Arc::clone(&navigator_factory),
        )?;

        Ok(Self {
            inner: Arc::new(BrowserInner {
                driver,
                config,
                navigator_factory,
                page: RwLock::new(page),
            }),
        })
    }

    /// Session configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &Configuration {
        &self.inner.config
    }

    /// Driver behind the session.
    #[inline]
    #[must_use]
    pub fn driver(&self) -> &Arc<dyn Driver> {
        &self.inner.driver
    }

    /// Navigator factory resolved from configuration.
    #[inline]
    #[must_use]
    pub fn navigator_factory(&self) -> &Arc<dyn NavigatorFactory> {
        &self.inner.navigator_factory
    }

    /// The current page.
    #[must_use]
    pub fn page(&self) -> Page {
        self.inner.page.read().clone()
    }

    /// Makes a freshly bound `class` the current page, without navigating.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// `class` does not descend from [`PAGE`].
    pub fn at(&self, class: &'static PageClass) -> Result<Page> {
        let page = Page::bind(
            class,
            Arc::clone(&self.inner.driver),
            Arc::clone(&self.inner.config),
            Arc::clone(&self.inner.navigator_factory),
        )?;
        *self.inner.page.write() = page.clone();
        debug!(page = %class, "Current page changed");
        Ok(page)
    }

    /// Polls `op` with the budget named by `spec` until it is truthy.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration) for an unknown preset
    /// - [`Error::WaitTimeout`](crate::Error::WaitTimeout) if the budget runs out
    /// - any non-transient error from `op`
    pub async fn wait_for<T, F, Fut>(&self, spec: &WaitSpec, op: F) -> Result<T>
    where
        T: Truthy + fmt::Debug,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.inner.config.wait_for(spec)?.wait_for(op).await
    }

    /// Ends the driver session.
    pub async fn quit(&self) -> Result<()> {
        debug!("Quitting browser session");
        self.inner.driver.quit().await
    }
}

// ============================================================================
// Forwarding
// ============================================================================

#[async_trait]
impl ContentContainer for Browser {
    async fn content(&self, name: &str, args: TemplateArgs) -> Result<Arc<Content>> {
        let page = self.page();
        page.content(name, args).await
    }

    fn has_content(&self, name: &str) -> bool {
        self.inner.page.read().has_content(name)
    }

    fn content_names(&self) -> Vec<String> {
        self.inner.page.read().content_names()
    }
}

#[async_trait]
impl Locator for Browser {
    async fn find_by(&self, query: SelectorQuery) -> Result<NavigatorHandle> {
        let page = self.page();
        page.find_by(query).await
    }

    async fn find_matching(
        &self,
        attributes: AttributePredicates,
        selector: &str,
    ) -> Result<NavigatorHandle> {
        let page = self.page();
        page.find_matching(attributes, selector).await
    }
}

// ============================================================================
// Tests
// ============================================================================
