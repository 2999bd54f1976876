//! Navigator construction hooks.
//!
//! The locator hands raw driver elements to a [`NavigatorFactory`], which
//! delegates the wrapping itself to an [`InnerNavigatorFactory`]. Both can be
//! replaced through [`Configuration`](crate::Configuration) overrides.

use std::fmt;
use std::sync::Arc;

use crate::driver::Element;

use super::NavigatorHandle;

// ============================================================================
// Traits
// ============================================================================

/// Turns driver elements into a [`NavigatorHandle`].
pub trait InnerNavigatorFactory: fmt::Debug + Send + Sync {
    /// Wraps `elements`.
    fn create_navigator(&self, elements: Vec<Element>) -> NavigatorHandle;
}

/// Produces the navigators a browser session hands out.
pub trait NavigatorFactory: fmt::Debug + Send + Sync {
    /// The empty navigator used as a starting point.
    fn base(&self) -> NavigatorHandle {
        NavigatorHandle::empty()
    }

    /// Wraps elements returned by a driver query.
    fn create_from_elements(&self, elements: Vec<Element>) -> NavigatorHandle;
}

// ============================================================================
// Defaults
// ============================================================================

/// Keeps driver order unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultInnerNavigatorFactory;

impl InnerNavigatorFactory for DefaultInnerNavigatorFactory {
    fn create_navigator(&self, elements: Vec<Element>) -> NavigatorHandle {
        NavigatorHandle::new(elements)
    }
}

/// Factory bound to one browser session.
#[derive(Debug, Clone)]
pub struct BrowserBackedNavigatorFactory {
    inner: Arc<dyn InnerNavigatorFactory>,
}

impl BrowserBackedNavigatorFactory {
    /// Creates a factory delegating to `inner`.
    #[must_use]
    pub fn new(inner: Arc<dyn InnerNavigatorFactory>) -> Self {
        Self { inner }
    }

    /// The inner factory.
    #[must_use]
    pub fn inner(&self) -> &Arc<dyn InnerNavigatorFactory> {
        &self.inner
    }
}

impl Default for BrowserBackedNavigatorFactory {
    fn default() -> Self {
        Self::new(Arc::new(DefaultInnerNavigatorFactory))
    }
}

impl NavigatorFactory for BrowserBackedNavigatorFactory {
    fn create_from_elements(&self, elements: Vec<Element>) -> NavigatorHandle {
        self.inner.create_navigator(elements)
    }
}

// ============================================================================
// Tests
// ============================================================================
