//! Error types for Kebab.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use kebab::{Result, TemplateArgs};
//!
//! async fn example(page: &Page) -> Result<()> {
//!     let heading = page.content("heading", ()).await?;
//!     println!("{:?}", heading.navigator());
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Arguments | [`Error::InvalidArgument`], [`Error::UnknownContent`] |
//! | Configuration | [`Error::InvalidConfiguration`] |
//! | Content | [`Error::RequiredContentNotPresent`], [`Error::WaitTimeout`] |
//! | Driver | [`Error::ElementNotFound`], [`Error::InvalidSelector`], [`Error::StaleElement`], [`Error::UnsupportedOperation`], [`Error::Driver`] |
//! | External | [`Error::Json`], [`Error::Url`] |
//!
//! Only [`Error::ElementNotFound`] is transient: the wait engine retries it,
//! everything else propagates to the caller unmodified.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::ElementId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Argument Errors
    // ========================================================================
    /// Invalid argument.
    ///
    /// Returned for malformed page class bounds, non-positive wait intervals
    /// and malformed predicate input.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument.
        message: String,
    },

    /// No content template with this name is declared for the page.
    #[error("Unknown content '{name}' on page {page}")]
    UnknownContent {
        /// Page class name.
        page: String,
        /// Requested template name.
        name: String,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when a configured value does not resolve to the expected
    /// capability (navigator factory override, wait preset name, base URL).
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Content Errors
    // ========================================================================
    /// A required content template resolved to empty or absent content.
    #[error("Required {template} is not present (args: {args})")]
    RequiredContentNotPresent {
        /// Template description.
        template: String,
        /// Canonical rendering of the arguments used.
        args: String,
    },

    /// A bounded poll exhausted its budget without success.
    #[error("Wait timed out after {timeout_ms}ms ({attempts} attempts)")]
    WaitTimeout {
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
        /// Number of attempts evaluated.
        attempts: u32,
        /// Debug rendering of the last observed value, if any attempt produced one.
        last_value: Option<String>,
    },

    // ========================================================================
    // Driver Errors
    // ========================================================================
    /// No element matched yet.
    ///
    /// The transient condition retried by the wait engine.
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Query that matched nothing.
        selector: String,
    },

    /// The driver rejected a selector.
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector {
        /// Selector as issued.
        selector: String,
        /// Driver's description of the problem.
        message: String,
    },

    /// Element is stale (no longer in DOM).
    #[error("Stale element: {element_id}")]
    StaleElement {
        /// The stale element's ID.
        element_id: ElementId,
    },

    /// Capability not provided by this implementation.
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation {
        /// The operation that was requested.
        operation: String,
    },

    /// Any other driver failure.
    #[error("Driver error: {message}")]
    Driver {
        /// Description from the driver.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parse error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates an unknown content error.
    #[inline]
    pub fn unknown_content(page: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownContent {
            page: page.into(),
            name: name.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[inline]
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Creates a required content error.
    #[inline]
    pub fn required_content_not_present(
        template: impl Into<String>,
        args: impl Into<String>,
    ) -> Self {
        Self::RequiredContentNotPresent {
            template: template.into(),
            args: args.into(),
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Creates an invalid selector error.
    #[inline]
    pub fn invalid_selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element_id: ElementId) -> Self {
        Self::StaleElement { element_id }
    }

    /// Creates an unsupported operation error.
    #[inline]
    pub fn unsupported_operation(operation: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
        }
    }

    /// Creates a driver error.
    #[inline]
    pub fn driver(message: impl Into<String>) -> Self {
        Self::Driver {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if a wait should treat this error as "not yet".
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::WaitTimeout { .. })
    }

    /// Returns `true` if this is a configuration error.
    #[inline]
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidConfiguration { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
