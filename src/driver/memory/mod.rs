//! In-memory driver.
//!
//! Holds a flat document of [`MemoryNode`]s and answers
//! [`SelectorQuery`]s against it. Every issued query is recorded, which lets
//! tests assert exactly what the locator sent to the driver. Nodes can be
//! scheduled to appear only after a number of queries, to exercise waiting.
//!
//! # Example
//!
//! ```ignore
//! use kebab::driver::memory::{MemoryDriver, MemoryNode};
//!
//! let driver = MemoryDriver::new();
//! driver.insert(MemoryNode::new("h1").with_text("Welcome"));
//! driver.insert_after_queries(2, MemoryNode::new("div").with_attribute("id", "late"));
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod css;

// ============================================================================
// Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::SelectorQuery;

use super::{Driver, Element, ElementHandle};

// ============================================================================
// MemoryNode
// ============================================================================

/// Element description stored in the in-memory document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
}

impl MemoryNode {
    /// Creates a node with the given tag name.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            text: String::new(),
        }
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Tag name.
    #[inline]
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value.
    #[inline]
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Text content.
    #[inline]
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` if the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

// ============================================================================
// MemoryElement
// ============================================================================

/// Element handle backed by a [`MemoryNode`].
pub struct MemoryElement {
    id: ElementId,
    node: MemoryNode,
    clicks: AtomicUsize,
    detached: AtomicBool,
}

impl fmt::Debug for MemoryElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryElement")
            .field("id", &self.id)
            .field("tag", &self.node.tag)
            .finish_non_exhaustive()
    }
}

impl MemoryElement {
    /// The node this element was created from.
    #[inline]
    #[must_use]
    pub fn node(&self) -> &MemoryNode {
        &self.node
    }

    /// Number of times this element was clicked.
    #[inline]
    #[must_use]
    pub fn click_count(&self) -> usize {
        self.clicks.load(Ordering::Relaxed)
    }

    fn ensure_attached(&self) -> Result<()> {
        if self.detached.load(Ordering::Relaxed) {
            return Err(Error::stale_element(self.id.clone()));
        }
        Ok(())
    }
}

#[async_trait]
impl ElementHandle for MemoryElement {
    fn id(&self) -> &ElementId {
        &self.id
    }

    async fn text(&self) -> Result<String> {
        self.ensure_attached()?;
        Ok(self.node.text.clone())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.ensure_attached()?;
        Ok(self.node.attribute(name).map(str::to_string))
    }

    async fn click(&self) -> Result<()> {
        self.ensure_attached()?;
        self.clicks.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

// ============================================================================
// MemoryDriver
// ============================================================================

struct Stored {
    element: Arc<MemoryElement>,
    visible_after: usize,
}

#[derive(Default)]
struct MemoryState {
    nodes: Vec<Stored>,
    next_id: usize,
    url: String,
    navigations: Vec<String>,
    refreshes: usize,
    issued: usize,
    queries: Vec<SelectorQuery>,
    recording_off: bool,
}

/// Driver answering queries from an in-memory document.
#[derive(Default)]
pub struct MemoryDriver {
    state: Mutex<MemoryState>,
}

impl fmt::Debug for MemoryDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryDriver")
            .field("nodes", &state.nodes.len())
            .field("url", &state.url)
            .field("queries", &state.issued)
            .finish()
    }
}

impl MemoryDriver {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a document containing `nodes` in order.
    #[must_use]
    pub fn with_document(nodes: impl IntoIterator<Item = MemoryNode>) -> Self {
        let driver = Self::new();
        for node in nodes {
            driver.insert(node);
        }
        driver
    }

    /// Appends a node to the document.
    pub fn insert(&self, node: MemoryNode) -> ElementId {
        self.insert_after_queries(0, node)
    }

    /// Appends a node that stays invisible for the next `queries` queries.
    pub fn insert_after_queries(&self, queries: usize, node: MemoryNode) -> ElementId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = ElementId::new(format!("mem-{}", state.next_id));
        let visible_after = state.issued + queries;
        state.nodes.push(Stored {
            element: Arc::new(MemoryElement {
                id: id.clone(),
                node,
                clicks: AtomicUsize::new(0),
                detached: AtomicBool::new(false),
            }),
            visible_after,
        });
        id
    }

    /// Removes a node. Handles already returned for it become stale.
    pub fn remove(&self, id: &ElementId) -> bool {
        let mut state = self.state.lock();
        let Some(pos) = state.nodes.iter().position(|s| s.element.id() == id) else {
            return false;
        };
        let stored = state.nodes.remove(pos);
        stored.element.detached.store(true, Ordering::Relaxed);
        true
    }

    /// Returns the element for `id`, if it is still in the document.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<Arc<MemoryElement>> {
        self.state
            .lock()
            .nodes
            .iter()
            .find(|s| s.element.id() == id)
            .map(|s| Arc::clone(&s.element))
    }

    /// Every recorded query, oldest first.
    #[must_use]
    pub fn queries(&self) -> Vec<SelectorQuery> {
        self.state.lock().queries.clone()
    }

    /// Number of queries issued so far, recorded or not.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.state.lock().issued
    }

    /// Turns the query log on or off. Queries are still counted.
    pub fn set_recording(&self, enabled: bool) {
        self.state.lock().recording_off = !enabled;
    }

    /// Empties the query log.
    pub fn clear_queries(&self) {
        self.state.lock().queries.clear();
    }

    /// Every URL navigated to, oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }

    /// Number of refreshes.
    #[must_use]
    pub fn refresh_count(&self) -> usize {
        self.state.lock().refreshes
    }
}

fn node_matches(query: &SelectorQuery, css: Option<&css::CompoundSelector>, node: &MemoryNode) -> bool {
    match (query, css) {
        (_, Some(selector)) => selector.matches(node),
        (SelectorQuery::ById(id), None) => node.attribute("id") == Some(id.as_str()),
        (SelectorQuery::ByClass(class), None) => node.has_class(class),
        (SelectorQuery::ByName(name), None) => node.attribute("name") == Some(name.as_str()),
        (SelectorQuery::ByCss(_), None) => false,
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn find_elements(&self, query: &SelectorQuery) -> Result<Vec<Element>> {
        let mut state = self.state.lock();
        state.issued += 1;
        if !state.recording_off {
            state.queries.push(query.clone());
        }
        let issued = state.issued;

        let compiled = match query {
            SelectorQuery::ByCss(selector) => Some(css::parse(selector)?),
            _ => None,
        };

        let mut found: Vec<Element> = Vec::new();
        for stored in state.nodes.iter().filter(|s| issued > s.visible_after) {
            if node_matches(query, compiled.as_ref(), &stored.element.node) {
                found.push(Arc::clone(&stored.element) as Element);
            }
        }

        trace!(%query, matched = found.len(), "Memory query");
        Ok(found)
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().url.clone())
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock();
        state.url = url.to_string();
        state.navigations.push(url.to_string());
        Ok(())
    }

    async fn refresh(&self) -> Result<()> {
        self.state.lock().refreshes += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> MemoryDriver {
        MemoryDriver::with_document([
            MemoryNode::new("form").with_attribute("id", "login"),
            MemoryNode::new("input")
                .with_attribute("name", "user")
                .with_attribute("class", "field wide"),
            MemoryNode::new("input")
                .with_attribute("name", "pass")
                .with_attribute("class", "field"),
        ])
    }

    #[tokio::test]
    async fn test_semantic_queries() {
        let driver = document();
        assert_eq!(driver.find_elements(&SelectorQuery::id("login")).await.unwrap().len(), 1);
        assert_eq!(driver.find_elements(&SelectorQuery::class("field")).await.unwrap().len(), 2);
        assert_eq!(driver.find_elements(&SelectorQuery::name("pass")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_css_query_preserves_order() {
        let driver = document();
        let found = driver.find_elements(&SelectorQuery::css("input")).await.unwrap();
        let names: Vec<_> = futures_util::future::try_join_all(
            found.iter().map(|e| e.attribute("name")),
        )
        .await
        .unwrap();
        assert_eq!(names, vec![Some("user".to_string()), Some("pass".to_string())]);
    }

    #[tokio::test]
    async fn test_invalid_selector_reported() {
        let driver = document();
        let err = driver.find_elements(&SelectorQuery::css("input >")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidSelector { .. }));
        assert_eq!(driver.query_count(), 1);
    }

    #[tokio::test]
    async fn test_delayed_node() {
        let driver = MemoryDriver::new();
        driver.insert_after_queries(2, MemoryNode::new("p"));
        let query = SelectorQuery::css("p");
        assert!(driver.find_elements(&query).await.unwrap().is_empty());
        assert!(driver.find_elements(&query).await.unwrap().is_empty());
        assert_eq!(driver.find_elements(&query).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_recording_toggle_keeps_counting() {
        let driver = MemoryDriver::new();
        driver.insert_after_queries(2, MemoryNode::new("p"));
        let query = SelectorQuery::css("p");

        driver.find_elements(&query).await.unwrap();
        driver.set_recording(false);
        driver.find_elements(&query).await.unwrap();
        assert_eq!(driver.queries(), vec![query.clone()]);
        assert_eq!(driver.query_count(), 2);
        assert_eq!(driver.find_elements(&query).await.unwrap().len(), 1);

        driver.clear_queries();
        assert!(driver.queries().is_empty());
        assert_eq!(driver.query_count(), 3);
    }

    #[tokio::test]
    async fn test_removed_element_is_stale() {
        let driver = document();
        let found = driver.find_elements(&SelectorQuery::id("login")).await.unwrap();
        assert!(driver.remove(found[0].id()));
        let err = found[0].text().await.unwrap_err();
        assert!(matches!(err, Error::StaleElement { .. }));
    }

    #[tokio::test]
    async fn test_navigation_log() {
        let driver = MemoryDriver::new();
        driver.navigate("http://localhost/a").await.unwrap();
        driver.refresh().await.unwrap();
        assert_eq!(driver.current_url().await.unwrap(), "http://localhost/a");
        assert_eq!(driver.navigations(), vec!["http://localhost/a".to_string()]);
        assert_eq!(driver.refresh_count(), 1);
    }
}
