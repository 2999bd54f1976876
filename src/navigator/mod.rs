//! Ordered element result sets.
//!
//! A [`NavigatorHandle`] is what every find operation returns: the matched
//! elements in driver order, possibly none. Handles are immutable and cheap
//! to clone; narrowing operations produce new handles.
//!
//! # Example
//!
//! ```ignore
//! let rows = page.find("tr.result").await?;
//! let first = rows.at(0);
//! let page_two = rows.slice(10..20);
//! let active = rows.filter(&AttributePredicates::from([("text", "Active")])).await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Navigator construction hooks.
pub mod factory;

// ============================================================================
// Imports
// ============================================================================

use std::ops::Range;
use std::sync::Arc;

use futures_util::future::try_join_all;

use crate::driver::Element;
use crate::error::{Error, Result};
use crate::locator::{AttributePredicates, TEXT_KEY};

pub use factory::{
    BrowserBackedNavigatorFactory, DefaultInnerNavigatorFactory, InnerNavigatorFactory,
    NavigatorFactory,
};

// ============================================================================
// NavigatorHandle
// ============================================================================

/// Ordered, possibly empty sequence of matched elements.
#[derive(Debug, Clone, Default)]
pub struct NavigatorHandle {
    elements: Arc<[Element]>,
}

impl NavigatorHandle {
    /// Wraps elements in driver order.
    #[must_use]
    pub fn new(elements: Vec<Element>) -> Self {
        Self {
            elements: elements.into(),
        }
    }

    /// An empty handle.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if nothing matched.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Element> {
        self.elements.get(index)
    }

    /// First element.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// Last element.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&Element> {
        self.elements.last()
    }

    /// Iterates elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// Handle holding only the element at `index`, or empty when out of range.
    #[must_use]
    pub fn at(&self, index: usize) -> Self {
        self.slice(index..index.saturating_add(1))
    }

    /// Handle holding the elements in `range`, clamped to the available ones.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.len());
        let start = range.start.min(end);
        Self::new(self.elements[start..end].to_vec())
    }

    /// Keeps the elements satisfying every predicate, preserving order.
    ///
    /// The `text` key is checked against text content, every other key
    /// against the attribute of that name.
    pub async fn filter(&self, predicates: &AttributePredicates) -> Result<Self> {
        if predicates.is_empty() {
            return Ok(self.clone());
        }

        let mut kept = Vec::with_capacity(self.len());
        for element in self.iter() {
            if element_matches(element, predicates).await? {
                kept.push(Arc::clone(element));
            }
        }
        Ok(Self::new(kept))
    }

    /// Text of the first element.
    pub async fn text(&self) -> Result<Option<String>> {
        match self.first() {
            Some(element) => element.text().await.map(Some),
            None => Ok(None),
        }
    }

    /// Attribute of the first element.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        match self.first() {
            Some(element) => element.attribute(name).await,
            None => Ok(None),
        }
    }

    /// Text of every element, in order.
    pub async fn texts(&self) -> Result<Vec<String>> {
        try_join_all(self.iter().map(|e| e.text())).await
    }

    /// Clicks the first element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ElementNotFound`] when the handle is empty.
    pub async fn click(&self) -> Result<()> {
        let element = self
            .first()
            .ok_or_else(|| Error::element_not_found("click on empty navigator"))?;
        element.click().await
    }
}

async fn element_matches(element: &Element, predicates: &AttributePredicates) -> Result<bool> {
    for (key, expected) in predicates {
        let actual = if key == TEXT_KEY {
            Some(element.text().await?)
        } else {
            element.attribute(key).await?
        };
        if !expected.matches(actual.as_deref()) {
            return Ok(false);
        }
    }
    Ok(true)
}

impl<'a> IntoIterator for &'a NavigatorHandle {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl From<Vec<Element>> for NavigatorHandle {
    fn from(elements: Vec<Element>) -> Self {
        Self::new(elements)
    }
}

// ============================================================================
// Tests
// ============================================================================
