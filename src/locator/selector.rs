//! Selector queries understood by the driver.
//!
//! # Example
//!
//! ```ignore
//! use kebab::SelectorQuery;
//!
//! // CSS selector (default)
//! let query = SelectorQuery::css("form.login input[name=\"user\"]");
//!
//! // Direct semantic queries
//! let query = SelectorQuery::id("login-form");
//! let query = SelectorQuery::class("btn-primary");
//! let query = SelectorQuery::name("email");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// CSS universal selector, used when a find has no explicit selector.
pub const MATCH_ALL_SELECTOR: &str = "*";

// ============================================================================
// SelectorQuery Enum
// ============================================================================

/// A tagged query issued against the driver.
///
/// Exactly one query is issued per resolution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum SelectorQuery {
    /// Element id attribute equality.
    #[serde(rename = "id")]
    ById(String),

    /// Single class name, matched against the element's class list.
    #[serde(rename = "class")]
    ByClass(String),

    /// Name attribute equality.
    #[serde(rename = "name")]
    ByName(String),

    /// CSS selector.
    #[serde(rename = "css")]
    ByCss(String),
}

impl SelectorQuery {
    /// Creates a CSS selector query.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::ByCss(selector.into())
    }

    /// Creates an id query.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::ById(id.into())
    }

    /// Creates a class name query.
    #[inline]
    pub fn class(class: impl Into<String>) -> Self {
        Self::ByClass(class.into())
    }

    /// Creates a name attribute query.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::ById(_) => "id",
            Self::ByClass(_) => "class",
            Self::ByName(_) => "name",
            Self::ByCss(_) => "css",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::ById(v) | Self::ByClass(v) | Self::ByName(v) | Self::ByCss(v) => v,
        }
    }
}

impl fmt::Display for SelectorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.strategy(), self.value())
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for SelectorQuery {
    /// Converts a string to CSS selector (default).
    fn from(s: &str) -> Self {
        Self::ByCss(s.to_string())
    }
}

impl From<String> for SelectorQuery {
    /// Converts a string to CSS selector (default).
    fn from(s: String) -> Self {
        Self::ByCss(s)
    }
}

// ============================================================================
// Tests
// ============================================================================
