//! Element location.
//!
//! | Module | Description |
//! |--------|-------------|
//! | `selector` | [`SelectorQuery`], the query sent to the driver |
//! | `attributes` | [`AttributePredicates`] and [`AttributeValue`] |
//! | `css` | CSS escaping and attribute folding |
//! | `resolver` | [`Locator`] trait and [`LocatorResolver`] |
//!
//! # Example
//!
//! ```ignore
//! use kebab::{AttributePredicates, Locator};
//!
//! // Folded into `input[name="q"]`, `text` checked afterwards
//! let search = locator
//!     .find_matching(AttributePredicates::from([("name", "q"), ("text", "")]), "input")
//!     .await?;
//! ```

// ============================================================================
// Submodules
// ============================================================================

mod attributes;
pub mod css;
mod resolver;
mod selector;

// ============================================================================
// Re-exports
// ============================================================================

pub use attributes::{AttributePredicates, AttributeValue, MatcherFn, TEXT_KEY};
pub use css::optimize_selector;
pub use resolver::{Locator, LocatorResolver};
pub use selector::{MATCH_ALL_SELECTOR, SelectorQuery};
