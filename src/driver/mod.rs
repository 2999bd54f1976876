//! Driver collaborator interface.
//!
//! The remote browser is reached through two traits:
//!
//! | Trait | Description |
//! |-------|-------------|
//! | [`Driver`] | Issues [`SelectorQuery`]s and navigates the session |
//! | [`ElementHandle`] | Reads and acts on one matched element |
//!
//! Anything that can answer these calls (a WebDriver client, a CDP bridge,
//! the bundled [`memory::MemoryDriver`]) can back a [`Browser`](crate::Browser).

// ============================================================================
// Submodules
// ============================================================================

/// In-memory driver for tests and demos.
pub mod memory;

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::identifiers::ElementId;
use crate::locator::SelectorQuery;

// ============================================================================
// Types
// ============================================================================

/// Shared reference to a driver element.
pub type Element = Arc<dyn ElementHandle>;

// ============================================================================
// ElementHandle
// ============================================================================

/// A live element reference owned by the driver session.
#[async_trait]
pub trait ElementHandle: fmt::Debug + Send + Sync {
    /// Driver reference for this element.
    fn id(&self) -> &ElementId;

    /// Visible text content.
    async fn text(&self) -> Result<String>;

    /// Attribute value, `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Clicks the element.
    async fn click(&self) -> Result<()>;
}

// ============================================================================
// Driver
// ============================================================================

/// Remote browser session as seen by the page-object layer.
///
/// Only [`find_elements`](Self::find_elements) is mandatory. Navigation
/// methods default to [`Error::UnsupportedOperation`] so a find-only driver
/// can still back content resolution.
#[async_trait]
pub trait Driver: fmt::Debug + Send + Sync {
    /// Returns every element matching `query`, in document order.
    ///
    /// An empty result is not an error. A selector the driver cannot parse
    /// must be reported as [`Error::InvalidSelector`].
    async fn find_elements(&self, query: &SelectorQuery) -> Result<Vec<Element>>;

    /// Current page URL.
    async fn current_url(&self) -> Result<String> {
        Err(Error::unsupported_operation("current_url"))
    }

    /// Loads `url`.
    async fn navigate(&self, url: &str) -> Result<()> {
        let _ = url;
        Err(Error::unsupported_operation("navigate"))
    }

    /// Reloads the current page.
    async fn refresh(&self) -> Result<()> {
        Err(Error::unsupported_operation("refresh"))
    }

    /// Ends the session.
    async fn quit(&self) -> Result<()> {
        Ok(())
    }
}
