//! Browser navigation methods.

use std::fmt;
use std::future::Future;

use tracing::debug;
use url::{ParseError, Url};

use crate::error::{Error, Result};
use crate::page::{Page, PageClass};

use super::Browser;

// ============================================================================
// Browser - Navigation
// ============================================================================

impl Browser {
    /// Computes the URL for `path` with `params` appended as query pairs.
    ///
    /// Absolute URLs are kept as they are; anything else is resolved against
    /// the configured base URL. An empty `path` is the base URL itself.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`] if `path` is relative and no base URL is set
    /// - [`Error::Url`] if `path` does not parse
    pub fn calculate_uri<I, K, V>(&self, path: &str, params: I) -> Result<Url>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        let mut url = match Url::parse(path) {
            Ok(url) => url,
            Err(ParseError::RelativeUrlWithoutBase) => {
                let base = self.config().base_url().ok_or_else(|| {
                    Error::invalid_configuration(format!(
                        "cannot resolve '{path}' without a baseUrl"
                    ))
                })?;
                base.join(path)?
            }
            Err(e) => return Err(e.into()),
        };

        let mut params = params.into_iter().peekable();
        if params.peek().is_some() {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key.as_ref(), &value.to_string());
            }
        }

        Ok(url)
    }

    /// Sends the browser to `path`.
    ///
    /// The page is refreshed instead when the computed URL is the current one.
    ///
    /// # Errors
    ///
    /// Returns URL composition errors and driver errors.
    pub async fn go<I, K, V>(&self, path: &str, params: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        let url = self.calculate_uri(path, params)?;
        let current = self.driver().current_url().await?;

        if current == url.as_str() {
            debug!(url = %url, "Refreshing current page");
            self.driver().refresh().await
        } else {
            debug!(url = %url, "Navigating");
            self.driver().navigate(url.as_str()).await
        }
    }

    /// Navigates to the URL of `class` and makes it the current page.
    ///
    /// # Errors
    ///
    /// Returns navigation errors and page binding errors.
    pub async fn to<I, K, V>(&self, class: &'static PageClass, params: I) -> Result<Page>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
    {
        self.go(class.page_url().unwrap_or_default(), params).await?;
        self.at(class)
    }

    /// Goes to `class` with [`to`](Self::to) and runs `script` against the
    /// bound page, returning what the script returns.
    ///
    /// # Errors
    ///
    /// Returns navigation and binding errors, then whatever `script` returns.
    pub async fn drive<I, K, V, F, Fut, T>(
        &self,
        class: &'static PageClass,
        params: I,
        script: F,
    ) -> Result<T>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: fmt::Display,
        F: FnOnce(Page) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let page = self.to(class, params).await?;
        debug!(page = %class, "Driving page");
        script(page).await
    }
}

// ============================================================================
// Tests
// ============================================================================
