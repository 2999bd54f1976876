//! Locator trait and its driver-backed implementation.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::driver::Driver;
use crate::error::Result;
use crate::navigator::{NavigatorFactory, NavigatorHandle};

use super::attributes::AttributePredicates;
use super::css::optimize_selector;
use super::selector::{MATCH_ALL_SELECTOR, SelectorQuery};

// ============================================================================
// Constants
// ============================================================================

/// Predicate keys that map onto a direct driver query.
const SEMANTIC_KEYS: [&str; 3] = ["id", "class", "name"];

// ============================================================================
// Locator
// ============================================================================

/// Find operations available to page objects.
///
/// Implementors supply [`find_by`](Self::find_by) and
/// [`find_matching`](Self::find_matching); the remaining forms are derived.
#[async_trait]
pub trait Locator: fmt::Debug + Send + Sync {
    /// Issues `query` and wraps the result.
    async fn find_by(&self, query: SelectorQuery) -> Result<NavigatorHandle>;

    /// Finds elements matching `selector` and every predicate in `attributes`.
    async fn find_matching(
        &self,
        attributes: AttributePredicates,
        selector: &str,
    ) -> Result<NavigatorHandle>;

    /// Finds elements matching a CSS selector.
    async fn find(&self, selector: &str) -> Result<NavigatorHandle> {
        self.find_by(SelectorQuery::css(selector)).await
    }

    /// Finds elements matching every predicate in `attributes`.
    async fn find_with(&self, attributes: AttributePredicates) -> Result<NavigatorHandle> {
        self.find_matching(attributes, MATCH_ALL_SELECTOR).await
    }

    /// Issues `query`, then keeps elements matching `attributes`.
    async fn find_by_matching(
        &self,
        attributes: AttributePredicates,
        query: SelectorQuery,
    ) -> Result<NavigatorHandle> {
        self.find_by(query).await?.filter(&attributes).await
    }

    /// The `index`-th element matching `selector`.
    async fn find_at(&self, selector: &str, index: usize) -> Result<NavigatorHandle> {
        Ok(self.find(selector).await?.at(index))
    }

    /// The elements in `range` among those matching `selector`.
    async fn find_range(&self, selector: &str, range: Range<usize>) -> Result<NavigatorHandle> {
        Ok(self.find(selector).await?.slice(range))
    }

    /// The `index`-th element matching `selector` and `attributes`.
    async fn find_matching_at(
        &self,
        attributes: AttributePredicates,
        selector: &str,
        index: usize,
    ) -> Result<NavigatorHandle> {
        Ok(self.find_matching(attributes, selector).await?.at(index))
    }

    /// The elements in `range` among those matching `selector` and `attributes`.
    async fn find_matching_range(
        &self,
        attributes: AttributePredicates,
        selector: &str,
        range: Range<usize>,
    ) -> Result<NavigatorHandle> {
        Ok(self.find_matching(attributes, selector).await?.slice(range))
    }
}

// ============================================================================
// LocatorResolver
// ============================================================================

/// Locator that queries the driver directly.
///
/// Attribute predicates are turned into as selective a query as possible:
/// a lone `id`/`class`/`name` predicate becomes a direct query, other string
/// predicates are folded into the CSS selector, and whatever is left is
/// applied to the returned elements.
#[derive(Debug, Clone)]
pub struct LocatorResolver {
    driver: Arc<dyn Driver>,
    navigator_factory: Arc<dyn NavigatorFactory>,
}

impl LocatorResolver {
    /// Creates a resolver over `driver`.
    #[must_use]
    pub fn new(driver: Arc<dyn Driver>, navigator_factory: Arc<dyn NavigatorFactory>) -> Self {
        Self {
            driver,
            navigator_factory,
        }
    }

    /// Tries a direct semantic query for a lone `id`, `class` or `name` predicate.
    ///
    /// Class queries match one class token, so they are only used for
    /// single-token values and the exact-value predicate is still checked
    /// on the result.
    async fn find_using_query_if_possible(
        &self,
        attributes: &AttributePredicates,
        selector: &str,
    ) -> Result<Option<NavigatorHandle>> {
        if attributes.len() != 1 || selector != MATCH_ALL_SELECTOR {
            return Ok(None);
        }

        for key in SEMANTIC_KEYS {
            let Some(value) = attributes.string_value(key) else {
                continue;
            };
            let navigator = match key {
                "id" => self.find_by(SelectorQuery::id(value)).await?,
                "name" => self.find_by(SelectorQuery::name(value)).await?,
                _ if is_single_token(value) => {
                    self.find_by(SelectorQuery::class(value))
                        .await?
                        .filter(attributes)
                        .await?
                }
                _ => return Ok(None),
            };
            return Ok(Some(navigator));
        }

        Ok(None)
    }
}

fn is_single_token(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

#[async_trait]
impl Locator for LocatorResolver {
    async fn find_by(&self, query: SelectorQuery) -> Result<NavigatorHandle> {
        debug!(%query, "Issuing query");
        let elements = self.driver.find_elements(&query).await?;
        Ok(self.navigator_factory.create_from_elements(elements))
    }

    async fn find_matching(
        &self,
        mut attributes: AttributePredicates,
        selector: &str,
    ) -> Result<NavigatorHandle> {
        if let Some(navigator) = self
            .find_using_query_if_possible(&attributes, selector)
            .await?
        {
            return Ok(navigator);
        }

        let optimized = optimize_selector(selector, &mut attributes);
        self.find_by(SelectorQuery::css(optimized))
            .await?
            .filter(&attributes)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
